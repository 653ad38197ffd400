//! Named, indexed label sequence.

use ndarray::Array1;
use serde_json::{json, Value};

use crate::data::RowId;
use crate::model::{Label, PredictError};

/// One label per row, keyed by the row's identifier.
///
/// Position `i` of [`index`](Self::index) and [`values`](Self::values) refer
/// to the same row.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSeries {
    name: String,
    index: Vec<RowId>,
    values: Array1<Label>,
}

impl PredictionSeries {
    /// Pair `values` with `index`. Lengths must match.
    pub fn new(
        name: impl Into<String>,
        index: Vec<RowId>,
        values: Array1<Label>,
    ) -> Result<Self, PredictError> {
        if index.len() != values.len() {
            return Err(PredictError::LengthMismatch {
                expected: index.len(),
                got: values.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            index,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> &[RowId] {
        &self.index
    }

    pub fn values(&self) -> &Array1<Label> {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Label for `id` (first occurrence if identifiers repeat).
    pub fn get(&self, id: &RowId) -> Option<Label> {
        self.index
            .iter()
            .position(|i| i == id)
            .map(|pos| self.values[pos])
    }

    /// `(identifier, label)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&RowId, Label)> + '_ {
        self.index.iter().zip(self.values.iter().copied())
    }

    /// Number of rows labelled `1`.
    pub fn n_positive(&self) -> usize {
        self.values.iter().filter(|&&v| v == 1).count()
    }

    /// `{"name": ..., "index": [...], "data": [...]}`.
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "index": self.index.iter().map(RowId::to_json).collect::<Vec<_>>(),
            "data": self.values.to_vec(),
        })
    }
}
