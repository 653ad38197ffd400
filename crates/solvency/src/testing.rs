//! Test helpers: gzip fixtures and a stub predictor.
//!
//! Public so integration tests and downstream crates can build fixtures
//! without repeating the gzip plumbing.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::Array1;
use serde_json::Value;

use crate::data::Table;
use crate::model::{Label, Predict, PredictError};

/// gzip-compress `data` as a single member.
pub fn gz_bytes(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Serialize `document` to JSON and gzip it.
pub fn gz_json_bytes(document: &Value) -> io::Result<Vec<u8>> {
    let text = serde_json::to_vec(document)?;
    gz_bytes(&text)
}

/// Write `document` to `path` as gzip-compressed JSON.
pub fn write_gz_json(path: impl AsRef<Path>, document: &Value) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut encoder = GzEncoder::new(&mut writer, Compression::default());
    serde_json::to_writer(&mut encoder, document)?;
    encoder.finish()?;
    writer.flush()
}

/// Predictor that returns a fixed label vector regardless of input.
///
/// Useful for checking how callers align labels with rows, including models
/// that return the wrong number of labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLabels(pub Vec<Label>);

impl Predict for FixedLabels {
    fn predict(&self, _table: &Table) -> Result<Array1<Label>, PredictError> {
        Ok(Array1::from(self.0.clone()))
    }
}
