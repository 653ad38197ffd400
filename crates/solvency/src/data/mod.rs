//! Tabular data: row identifiers, columns and the gzip JSON loader.
//!
//! # Key Types
//!
//! - [`Table`]: rows × named columns with an identifier per row
//! - [`Column`] / [`ColumnData`]: numeric (`f64`, `NaN` = missing) or categorical
//! - [`RowId`]: integer or string row identifier
//! - [`io::Loader`]: reads `{"<records>": [{"<id>": ..., ...}]}` from `.json.gz`

pub mod io;

mod index;
mod table;

pub use index::RowId;
pub use table::{Column, ColumnData, ColumnKind, Table, TableError};
