//! solvency: bankruptcy dataset loading and prediction.
//!
//! Reads gzip-compressed JSON datasets into an indexed [`Table`] and runs a
//! persisted classifier over them, producing one `bankrupt` label per row.
//!
//! # Key Types
//!
//! - [`Table`] - Rows with identifiers and named feature columns
//! - [`LoaderConfig`] - Which keys hold the records and the row identifier
//! - [`Model`] / [`Predict`] - Persisted classifiers and the prediction interface
//! - [`PredictionSeries`] - Labels aligned with the table's identifiers
//!
//! # Loading
//!
//! [`wrangle`] reads `{"<records>": [{"<id>": ..., ...}]}` from a `.json.gz`
//! file. See the [`data`] module for the cell mapping.
//!
//! # Predicting
//!
//! [`make_predictions`] loads a dataset and a model file and returns the
//! labels. Models are stored in the native format described in [`io`].

pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod logger;
pub mod model;
pub mod predict;
pub mod testing;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use config::{ConfigError, DuplicateIds, LoaderConfig};
pub use data::io::{wrangle, LoadError, Loader};
pub use data::{RowId, Table};
pub use error::Error;
pub use io::{ReadError, WriteError};
pub use logger::Verbosity;
pub use model::{Label, Model, ModelKind, Predict, PredictError};
pub use predict::{make_predictions, predict_table, PredictionSeries, SERIES_NAME};
