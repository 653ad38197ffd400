//! Dataset I/O.
//!
//! Loads gzip-compressed JSON documents holding an array of flat records.
//! The record array key and identifier field come from
//! [`LoaderConfig`](crate::LoaderConfig).

mod error;
mod json;

pub use error::LoadError;
pub use json::{wrangle, Loader};
