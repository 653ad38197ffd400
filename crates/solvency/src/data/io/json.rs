//! Gzip-compressed JSON dataset loader.
//!
//! # Supported layout
//!
//! ```text
//! { "<records_key>": [ { "<id_key>": <int|string>, "<feature>": <scalar>, ... }, ... ] }
//! ```
//!
//! Cell mapping:
//! - numbers → numeric
//! - booleans → numeric `1.0` / `0.0`
//! - `null` or an absent key → missing (`NaN` / `None`)
//! - strings → categorical
//!
//! A column holding any string becomes categorical; numbers and booleans in
//! such a column keep their JSON text.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use serde_json::{Map, Number, Value};

use super::error::LoadError;
use crate::config::{DuplicateIds, LoaderConfig};
use crate::data::{Column, ColumnData, RowId, Table};
use crate::logger::PipelineLogger;

// =============================================================================
// Public API
// =============================================================================

/// Load a gzip-compressed JSON file into a [`Table`] indexed by `config.id_key`.
///
/// # Example
///
/// ```no_run
/// use solvency::{wrangle, LoaderConfig};
///
/// let table = wrangle("data/taiwan-bankruptcy-data-test.json.gz", &LoaderConfig::company_data())?;
/// println!("{} companies", table.n_rows());
/// # Ok::<(), solvency::data::io::LoadError>(())
/// ```
pub fn wrangle(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<Table, LoadError> {
	Loader::new(config.clone()).load(path)
}

/// Reusable loader for one dataset layout.
#[derive(Debug, Clone, Default)]
pub struct Loader {
	config: LoaderConfig,
	logger: PipelineLogger,
}

impl Loader {
	pub fn new(config: LoaderConfig) -> Self {
		let logger = PipelineLogger::new(config.verbosity);
		Self { config, logger }
	}

	pub fn config(&self) -> &LoaderConfig {
		&self.config
	}

	/// Load a gzip-compressed JSON file.
	///
	/// The file is closed before this returns, whether or not parsing succeeded.
	pub fn load(&self, path: impl AsRef<Path>) -> Result<Table, LoadError> {
		let path = path.as_ref();
		let table = {
			let file = File::open(path)?;
			self.read(BufReader::new(file))?
		};
		self.logger.table_loaded(path, &table);
		Ok(table)
	}

	/// Load from any reader yielding gzip-compressed JSON.
	///
	/// Concatenated gzip members are read as one stream.
	pub fn read<R: Read>(&self, reader: R) -> Result<Table, LoadError> {
		let text = decompress(reader)?;
		self.logger.decompressed(text.len());
		let document: Value = serde_json::from_slice(&text)?;
		self.parse_document(&document)
	}

	/// Build a table from an already parsed JSON document.
	pub fn parse_document(&self, document: &Value) -> Result<Table, LoadError> {
		let root = document.as_object().ok_or_else(|| {
			LoadError::Schema(format!("document root must be an object, got {}", json_type(document)))
		})?;

		let key = &self.config.records_key;
		let records = root
			.get(key)
			.ok_or_else(|| LoadError::MissingKey(key.clone()))?;
		let records = records.as_array().ok_or_else(|| {
			LoadError::Schema(format!("{key:?} must be an array, got {}", json_type(records)))
		})?;

		let mut builder = TableBuilder::new(&self.config.id_key, records.len());
		let mut seen: HashMap<RowId, usize> = HashMap::with_capacity(records.len());

		for (pos, record) in records.iter().enumerate() {
			let record = record.as_object().ok_or_else(|| {
				LoadError::Schema(format!("record {pos} must be an object, got {}", json_type(record)))
			})?;

			let id = self.extract_id(pos, record)?;
			match seen.get(&id) {
				Some(&first) => match self.config.duplicate_ids {
					DuplicateIds::Reject => {
						return Err(LoadError::DuplicateId { id, first, again: pos });
					}
					DuplicateIds::Warn => self.logger.duplicate_id(&id, first, pos),
					DuplicateIds::Keep => {}
				},
				None => {
					seen.insert(id.clone(), pos);
				}
			}

			builder.push(pos, id, record)?;
		}

		builder.finish()
	}

	fn extract_id(&self, pos: usize, record: &Map<String, Value>) -> Result<RowId, LoadError> {
		let key = &self.config.id_key;
		let value = record.get(key).ok_or_else(|| LoadError::MissingIdentifier {
			record: pos,
			key: key.clone(),
		})?;
		RowId::from_json(value).ok_or_else(|| LoadError::UnsupportedValue {
			record: pos,
			field: key.clone(),
			expected: "an integer or string identifier",
			got: describe(value),
		})
	}
}

// =============================================================================
// Internal helpers
// =============================================================================

fn decompress<R: Read>(reader: R) -> Result<Vec<u8>, LoadError> {
	let mut text = Vec::new();
	MultiGzDecoder::new(reader)
		.read_to_end(&mut text)
		.map_err(LoadError::Decompress)?;
	Ok(text)
}

fn json_type(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

fn describe(value: &Value) -> String {
	match value {
		Value::Number(n) => format!("number {n}"),
		other => json_type(other).to_owned(),
	}
}

enum Cell {
	Missing,
	Number(Number),
	Bool(bool),
	Text(String),
}

impl Cell {
	fn from_json(record: usize, field: &str, value: &Value) -> Result<Self, LoadError> {
		match value {
			Value::Null => Ok(Self::Missing),
			Value::Bool(b) => Ok(Self::Bool(*b)),
			Value::Number(n) => Ok(Self::Number(n.clone())),
			Value::String(s) => Ok(Self::Text(s.clone())),
			Value::Array(_) | Value::Object(_) => Err(LoadError::UnsupportedValue {
				record,
				field: field.to_owned(),
				expected: "a scalar",
				got: json_type(value).to_owned(),
			}),
		}
	}

	fn to_f64(&self) -> f64 {
		match self {
			Self::Missing | Self::Text(_) => f64::NAN,
			Self::Number(n) => n.as_f64().unwrap_or(f64::NAN),
			Self::Bool(b) => f64::from(u8::from(*b)),
		}
	}

	fn into_text(self) -> Option<String> {
		match self {
			Self::Missing => None,
			Self::Number(n) => Some(n.to_string()),
			Self::Bool(b) => Some(b.to_string()),
			Self::Text(s) => Some(s),
		}
	}
}

struct ColumnBuilder {
	name: String,
	cells: Vec<Cell>,
}

impl ColumnBuilder {
	fn finish(self) -> Column {
		let is_text = self.cells.iter().any(|c| matches!(c, Cell::Text(_)));
		let data = if is_text {
			ColumnData::Categorical(self.cells.into_iter().map(Cell::into_text).collect())
		} else {
			ColumnData::Numeric(self.cells.iter().map(Cell::to_f64).collect())
		};
		Column::new(self.name, data)
	}
}

/// Accumulates rows column by column; keys are kept in first-seen order.
struct TableBuilder<'a> {
	id_key: &'a str,
	index: Vec<RowId>,
	columns: Vec<ColumnBuilder>,
	positions: HashMap<String, usize>,
}

impl<'a> TableBuilder<'a> {
	fn new(id_key: &'a str, capacity: usize) -> Self {
		Self {
			id_key,
			index: Vec::with_capacity(capacity),
			columns: Vec::new(),
			positions: HashMap::new(),
		}
	}

	fn push(&mut self, pos: usize, id: RowId, record: &Map<String, Value>) -> Result<(), LoadError> {
		let row = self.index.len();

		for (key, value) in record {
			if key == self.id_key {
				continue;
			}
			let cell = Cell::from_json(pos, key, value)?;
			let col = match self.positions.get(key) {
				Some(&col) => col,
				None => {
					let mut cells = Vec::with_capacity(self.index.capacity());
					cells.resize_with(row, || Cell::Missing);
					self.columns.push(ColumnBuilder {
						name: key.clone(),
						cells,
					});
					self.positions.insert(key.clone(), self.columns.len() - 1);
					self.columns.len() - 1
				}
			};
			self.columns[col].cells.push(cell);
		}

		self.index.push(id);
		for column in &mut self.columns {
			if column.cells.len() < self.index.len() {
				column.cells.push(Cell::Missing);
			}
		}
		Ok(())
	}

	fn finish(self) -> Result<Table, LoadError> {
		let columns = self.columns.into_iter().map(ColumnBuilder::finish).collect();
		Ok(Table::new(self.index, columns)?)
	}
}

// =============================================================================
// Tests
// =============================================================================
