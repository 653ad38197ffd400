//! Top-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::data::io::LoadError;
use crate::io::ReadError;
use crate::model::PredictError;

/// Any failure of [`make_predictions`](crate::make_predictions).
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid loader configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load dataset: {0}")]
    Load(#[from] LoadError),

    #[error("failed to load model: {0}")]
    Read(#[from] ReadError),

    #[error("prediction failed: {0}")]
    Predict(#[from] PredictError),
}
