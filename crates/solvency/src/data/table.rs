//! Indexed table of feature columns.

use std::collections::HashMap;

use ndarray::{Array1, Array2};
use thiserror::Error;

use super::index::RowId;

// =============================================================================
// Errors
// =============================================================================

/// Errors from table construction and column access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// A column's length differs from the number of index entries.
    #[error("column {column} has {got} values, index has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    /// Two columns share a name.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// A requested column does not exist.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A requested column is categorical where numeric values are needed.
    #[error("column {0} is not numeric")]
    NonNumericColumn(String),
}

// =============================================================================
// Columns
// =============================================================================

/// Logical column types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColumnKind {
    /// Numeric values; missing cells are `f64::NAN`.
    #[default]
    Numeric,
    /// Text values; missing cells are `None`.
    Categorical,
}

/// Column storage.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Numeric(Array1<f64>),
    Categorical(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Categorical(_) => ColumnKind::Categorical,
        }
    }
}

/// A named feature column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Create a numeric column.
    pub fn numeric(name: impl Into<String>, values: impl Into<Array1<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values.into()))
    }

    /// Create a categorical column.
    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self::new(name, ColumnData::Categorical(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Numeric values, or `None` for a categorical column.
    pub fn as_numeric(&self) -> Option<&Array1<f64>> {
        match &self.data {
            ColumnData::Numeric(values) => Some(values),
            ColumnData::Categorical(_) => None,
        }
    }

    /// Text values, or `None` for a numeric column.
    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(values) => Some(values),
            ColumnData::Numeric(_) => None,
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// Rows × named columns with one identifier per row.
///
/// Row `i` consists of `index()[i]` and the `i`-th value of every column.
/// Row order is the order of the source records.
///
/// # Example
///
/// ```
/// use solvency::data::{Column, RowId, Table};
///
/// let table = Table::new(
///     vec![RowId::from("A1"), RowId::from("A2")],
///     vec![Column::numeric("x1", vec![0.5, -0.2])],
/// )
/// .unwrap();
///
/// assert_eq!(table.n_rows(), 2);
/// assert_eq!(table.column_names(), vec!["x1"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    index: Vec<RowId>,
    columns: Vec<Column>,
    positions: HashMap<String, usize>,
}

impl Table {
    /// Create a table, checking that every column matches the index length
    /// and that column names are unique.
    pub fn new(index: Vec<RowId>, columns: Vec<Column>) -> Result<Self, TableError> {
        let mut positions = HashMap::with_capacity(columns.len());
        for (pos, column) in columns.iter().enumerate() {
            if column.len() != index.len() {
                return Err(TableError::LengthMismatch {
                    column: column.name.clone(),
                    expected: index.len(),
                    got: column.len(),
                });
            }
            if positions.insert(column.name.clone(), pos).is_some() {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Self {
            index,
            columns,
            positions,
        })
    }

    /// A table with no rows and no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Row identifiers in row order.
    pub fn index(&self) -> &[RowId] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.positions.get(name).map(|&pos| &self.columns[pos])
    }

    /// Position of the first row with the given identifier.
    pub fn row_position(&self, id: &RowId) -> Option<usize> {
        self.index.iter().position(|row| row == id)
    }

    /// Gather numeric columns into a sample-major matrix `[n_rows, names.len()]`.
    ///
    /// Columns appear in the order of `names`; columns not named are ignored.
    ///
    /// # Errors
    ///
    /// [`TableError::MissingColumn`] if a name is absent,
    /// [`TableError::NonNumericColumn`] if a named column is categorical.
    pub fn feature_matrix<S: AsRef<str>>(&self, names: &[S]) -> Result<Array2<f64>, TableError> {
        let mut matrix = Array2::from_elem((self.n_rows(), names.len()), f64::NAN);
        for (j, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let column = self
                .column(name)
                .ok_or_else(|| TableError::MissingColumn(name.to_owned()))?;
            let values = column
                .as_numeric()
                .ok_or_else(|| TableError::NonNumericColumn(name.to_owned()))?;
            matrix.column_mut(j).assign(values);
        }
        Ok(matrix)
    }
}

// =============================================================================
// Tests
// =============================================================================
