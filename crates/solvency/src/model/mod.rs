//! Classifiers and the prediction interface.
//!
//! The runner only depends on [`Predict`]: "given a table, one label per row,
//! in row order". Anything implementing it can be passed to
//! [`predict_table`](crate::predict::predict_table).
//!
//! # Built-in models
//!
//! - [`LogisticModel`]: logistic regression
//! - [`TreeModel`]: single decision tree
//! - [`ForestModel`]: averaging tree ensemble
//!
//! [`Model`] wraps all three and is what the native model format stores.

use std::fmt;

use ndarray::Array1;

use crate::data::Table;

mod error;
mod forest;
mod linear;
mod meta;
mod tree;

pub use error::{ModelError, PredictError};
pub use forest::ForestModel;
pub use linear::LogisticModel;
pub use meta::{ModelMeta, DEFAULT_THRESHOLD};
pub use tree::{Node, NodeId, Tree, TreeModel, TreeValidationError};

/// Predicted class label (`1` = bankrupt, `0` = not bankrupt).
pub type Label = i64;

/// The one capability the runner needs from a model.
pub trait Predict {
    /// Predict one label per table row, in row order.
    fn predict(&self, table: &Table) -> Result<Array1<Label>, PredictError>;
}

impl<P: Predict + ?Sized> Predict for &P {
    fn predict(&self, table: &Table) -> Result<Array1<Label>, PredictError> {
        (**self).predict(table)
    }
}

impl<P: Predict + ?Sized> Predict for Box<P> {
    fn predict(&self, table: &Table) -> Result<Array1<Label>, PredictError> {
        (**self).predict(table)
    }
}

// =============================================================================
// Model Kind
// =============================================================================

/// Model kind identifier stored in the native format header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ModelKind {
    Logistic = 0,
    Tree = 1,
    Forest = 2,
}

impl ModelKind {
    /// Convert from u8, returning None for unknown values.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Logistic),
            1 => Some(Self::Tree),
            2 => Some(Self::Forest),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Logistic => "logistic",
            Self::Tree => "tree",
            Self::Forest => "forest",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Model
// =============================================================================

/// Any built-in model.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Logistic(LogisticModel),
    Tree(TreeModel),
    Forest(ForestModel),
}

impl Model {
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Logistic(_) => ModelKind::Logistic,
            Self::Tree(_) => ModelKind::Tree,
            Self::Forest(_) => ModelKind::Forest,
        }
    }

    pub fn meta(&self) -> &ModelMeta {
        match self {
            Self::Logistic(m) => m.meta(),
            Self::Tree(m) => m.meta(),
            Self::Forest(m) => m.meta(),
        }
    }

    pub fn n_features(&self) -> usize {
        self.meta().n_features()
    }

    /// Positive-class probabilities, one per row.
    pub fn predict_proba(&self, table: &Table) -> Result<Array1<f64>, PredictError> {
        match self {
            Self::Logistic(m) => m.predict_proba(table),
            Self::Tree(m) => m.predict_proba(table),
            Self::Forest(m) => m.predict_proba(table),
        }
    }
}

impl Predict for Model {
    fn predict(&self, table: &Table) -> Result<Array1<Label>, PredictError> {
        match self {
            Self::Logistic(m) => m.predict(table),
            Self::Tree(m) => m.predict(table),
            Self::Forest(m) => m.predict(table),
        }
    }
}

impl From<LogisticModel> for Model {
    fn from(model: LogisticModel) -> Self {
        Self::Logistic(model)
    }
}

impl From<TreeModel> for Model {
    fn from(model: TreeModel) -> Self {
        Self::Tree(model)
    }
}

impl From<ForestModel> for Model {
    fn from(model: ForestModel) -> Self {
        Self::Forest(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, RowId};

    #[test]
    fn model_kind_conversion() {
        assert_eq!(ModelKind::from_u8(0), Some(ModelKind::Logistic));
        assert_eq!(ModelKind::from_u8(1), Some(ModelKind::Tree));
        assert_eq!(ModelKind::from_u8(2), Some(ModelKind::Forest));
        assert_eq!(ModelKind::from_u8(255), None);
        assert_eq!(ModelKind::Forest.to_string(), "forest");
    }

    #[test]
    fn dispatch_through_enum_and_trait_objects() {
        let logistic = LogisticModel::new(ModelMeta::new(["x"]), vec![10.0], -5.0).unwrap();
        let model = Model::from(logistic);
        assert_eq!(model.kind(), ModelKind::Logistic);
        assert_eq!(model.n_features(), 1);

        let table = Table::new(
            vec![RowId::Int(1), RowId::Int(2)],
            vec![Column::numeric("x", vec![0.0, 1.0])],
        )
        .unwrap();

        let boxed: Box<dyn Predict> = Box::new(model.clone());
        assert_eq!(boxed.predict(&table).unwrap().to_vec(), vec![0, 1]);
        assert_eq!((&model).predict(&table).unwrap().to_vec(), vec![0, 1]);
        assert_eq!(model.predict_proba(&table).unwrap().len(), 2);
    }
}
