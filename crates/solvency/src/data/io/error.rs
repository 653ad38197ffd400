//! Error types for dataset loading.

use std::io;

use crate::data::{RowId, TableError};

/// Errors that can occur when loading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	#[error("gzip decompression failed: {0}")]
	Decompress(#[source] io::Error),

	#[error("JSON parse error: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("missing required key: {0}")]
	MissingKey(String),

	#[error("record {record} has no {key:?} field")]
	MissingIdentifier { record: usize, key: String },

	#[error("schema validation failed: {0}")]
	Schema(String),

	#[error("unsupported value in record {record}, field {field:?}: expected {expected}, got {got}")]
	UnsupportedValue {
		record: usize,
		field: String,
		expected: &'static str,
		got: String,
	},

	#[error("duplicate identifier {id} at records {first} and {again}")]
	DuplicateId { id: RowId, first: usize, again: usize },

	#[error(transparent)]
	Table(#[from] TableError),
}
