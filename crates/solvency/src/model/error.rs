//! Model construction and prediction errors.

use thiserror::Error;

use super::tree::TreeValidationError;
use crate::data::TableError;

/// Errors raised while predicting.
///
/// The runner itself never checks that the table carries the model's features;
/// the model reports [`MissingFeature`](Self::MissingFeature) or
/// [`NonNumericFeature`](Self::NonNumericFeature) when it selects them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// The table lacks a column the model was fitted on.
    #[error("model feature {0:?} is missing from the table")]
    MissingFeature(String),

    /// A column the model needs is categorical.
    #[error("model feature {0:?} is not numeric")]
    NonNumericFeature(String),

    /// The model returned a label count different from the row count.
    #[error("model returned {got} labels for {expected} rows")]
    LengthMismatch { expected: usize, got: usize },

    /// Any other failure reported by a [`Predict`](super::Predict) implementation.
    #[error("prediction failed: {0}")]
    Model(String),
}

impl From<TableError> for PredictError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::MissingColumn(name) => Self::MissingFeature(name),
            TableError::NonNumericColumn(name) => Self::NonNumericFeature(name),
            other => Self::Model(other.to_string()),
        }
    }
}

/// Errors raised when a model's parameters are inconsistent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Decision threshold outside `[0, 1]`.
    #[error("threshold must be in [0, 1], got {0}")]
    InvalidThreshold(f64),

    /// Two features share a name.
    #[error("duplicate feature name: {0}")]
    DuplicateFeature(String),

    /// Weight vector does not match the feature count.
    #[error("expected {expected} weights, got {got}")]
    WeightCountMismatch { expected: usize, got: usize },

    /// A weight or bias is NaN or infinite.
    #[error("{0} must be finite")]
    NonFinite(&'static str),

    /// A forest needs at least one tree.
    #[error("forest has no trees")]
    EmptyForest,

    /// A tree failed structural validation.
    #[error("tree {tree}: {source}")]
    Tree {
        tree: usize,
        #[source]
        source: TreeValidationError,
    },
}
