//! Verbosity-gated pipeline logging.
//!
//! The library never installs a logger. Messages go through the [`log`] facade
//! and are only emitted when the configured [`Verbosity`] allows them, so a
//! binary that wires up `env_logger` (or anything else) still sees nothing
//! from a `Silent` pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{RowId, Table};
use crate::model::ModelKind;

const TARGET: &str = "solvency";

/// Verbosity level for pipeline output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Only warnings (e.g. duplicate identifiers).
    Warning,
    /// Summary of each pipeline step.
    Info,
    /// Per-step detail.
    Debug,
}

impl Verbosity {
    /// Returns true if messages at `level` should be emitted.
    #[inline]
    pub fn allows(self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self >= level
    }
}

/// Emits pipeline progress at a fixed verbosity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineLogger {
    verbosity: Verbosity,
}

impl PipelineLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub(crate) fn decompressed(&self, n_bytes: usize) {
        if self.verbosity.allows(Verbosity::Debug) {
            log::debug!(target: TARGET, "decompressed {n_bytes} bytes of JSON");
        }
    }

    pub(crate) fn table_loaded(&self, path: &Path, table: &Table) {
        if self.verbosity.allows(Verbosity::Info) {
            log::info!(
                target: TARGET,
                "loaded {} rows x {} columns from {}",
                table.n_rows(),
                table.n_columns(),
                path.display()
            );
        }
    }

    /// Always emitted: only called under `DuplicateIds::Warn`.
    pub(crate) fn duplicate_id(&self, id: &RowId, first: usize, again: usize) {
        log::warn!(
            target: TARGET,
            "identifier {id} appears at records {first} and {again}"
        );
    }

    pub(crate) fn model_loaded(&self, path: &Path, kind: ModelKind, n_features: usize) {
        if self.verbosity.allows(Verbosity::Info) {
            log::info!(
                target: TARGET,
                "loaded {kind} model ({n_features} features) from {}",
                path.display()
            );
        }
    }

    pub(crate) fn predictions(&self, n_rows: usize, n_positive: usize) {
        if self.verbosity.allows(Verbosity::Info) {
            log::info!(
                target: TARGET,
                "predicted {n_rows} rows, {n_positive} labelled bankrupt"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_allows_nothing() {
        for level in [Verbosity::Silent, Verbosity::Warning, Verbosity::Info, Verbosity::Debug] {
            assert!(!Verbosity::Silent.allows(level));
        }
    }

    #[test]
    fn levels_are_cumulative() {
        assert!(Verbosity::Info.allows(Verbosity::Warning));
        assert!(Verbosity::Info.allows(Verbosity::Info));
        assert!(!Verbosity::Info.allows(Verbosity::Debug));
        assert!(Verbosity::Debug.allows(Verbosity::Warning));
    }

    #[test]
    fn nothing_allows_silent_messages() {
        assert!(!Verbosity::Debug.allows(Verbosity::Silent));
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&Verbosity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        let back: Verbosity = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(back, Verbosity::Debug);
    }
}
