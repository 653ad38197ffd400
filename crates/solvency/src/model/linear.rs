//! Logistic regression classifier.

use ndarray::{Array1, ArrayView1};

use super::error::{ModelError, PredictError};
use super::meta::ModelMeta;
use super::{Label, Predict};
use crate::data::Table;

#[inline]
pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Logistic regression over named numeric features.
///
/// `p = sigmoid(w · x + b)`; the label is `1` when `p >= threshold`.
/// Missing values (`NaN`) contribute nothing to the margin.
///
/// # Example
///
/// ```
/// use solvency::data::{Column, RowId, Table};
/// use solvency::model::{LogisticModel, ModelMeta, Predict};
///
/// let model = LogisticModel::new(ModelMeta::new(["debt_ratio"]), vec![4.0], -2.0).unwrap();
/// let table = Table::new(
///     vec![RowId::Int(1), RowId::Int(2)],
///     vec![Column::numeric("debt_ratio", vec![0.1, 0.9])],
/// )
/// .unwrap();
///
/// assert_eq!(model.predict(&table).unwrap().to_vec(), vec![0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    meta: ModelMeta,
    weights: Array1<f64>,
    bias: f64,
}

impl LogisticModel {
    /// Create a model, one weight per feature in `meta.feature_names`.
    pub fn new(
        meta: ModelMeta,
        weights: impl Into<Array1<f64>>,
        bias: f64,
    ) -> Result<Self, ModelError> {
        let weights = weights.into();
        meta.validate()?;
        if weights.len() != meta.n_features() {
            return Err(ModelError::WeightCountMismatch {
                expected: meta.n_features(),
                got: weights.len(),
            });
        }
        if !weights.iter().all(|w| w.is_finite()) {
            return Err(ModelError::NonFinite("weights"));
        }
        if !bias.is_finite() {
            return Err(ModelError::NonFinite("bias"));
        }
        Ok(Self { meta, weights, bias })
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Raw margins `w · x + b`, one per row.
    pub fn predict_margin(&self, table: &Table) -> Result<Array1<f64>, PredictError> {
        let mut features = table.feature_matrix(self.meta.feature_names.as_slice())?;
        features.mapv_inplace(|v| if v.is_nan() { 0.0 } else { v });
        Ok(features.dot(&self.weights) + self.bias)
    }

    /// Positive-class probabilities, one per row.
    pub fn predict_proba(&self, table: &Table) -> Result<Array1<f64>, PredictError> {
        Ok(self.predict_margin(table)?.mapv(sigmoid))
    }
}

impl Predict for LogisticModel {
    fn predict(&self, table: &Table) -> Result<Array1<Label>, PredictError> {
        Ok(self.predict_proba(table)?.mapv(|p| self.meta.label(p)))
    }
}
