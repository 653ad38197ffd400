//! Loader configuration with builder pattern.
//!
//! A [`LoaderConfig`] names the JSON array that holds the records and the
//! record field used as the row identifier. Two presets cover the known dataset
//! layouts; anything else goes through the `bon` builder, which validates at
//! build time.
//!
//! # Example
//!
//! ```
//! use solvency::{DuplicateIds, LoaderConfig};
//!
//! // `{"observations": [{"id": ..., ...}]}`
//! let config = LoaderConfig::observations();
//!
//! // `{"data": [{"company_id": ..., ...}]}`
//! let config = LoaderConfig::company_data();
//!
//! // Custom layout
//! let config = LoaderConfig::builder()
//!     .records_key("firms")
//!     .id_key("ticker")
//!     .duplicate_ids(DuplicateIds::Keep)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.records_key, "firms");
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::logger::Verbosity;

/// Records key of the `observations` dataset layout.
pub const OBSERVATIONS_RECORDS_KEY: &str = "observations";
/// Identifier key of the `observations` dataset layout.
pub const OBSERVATIONS_ID_KEY: &str = "id";
/// Records key of the company dataset layout.
pub const COMPANY_RECORDS_KEY: &str = "data";
/// Identifier key of the company dataset layout.
pub const COMPANY_ID_KEY: &str = "company_id";

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A key name is empty.
    EmptyKey { field: &'static str },
    /// The records key and the identifier key are the same.
    SameKeys(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey { field } => write!(f, "{} must not be empty", field),
            Self::SameKeys(key) => {
                write!(f, "records_key and id_key must differ, both are {:?}", key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// DuplicateIds
// =============================================================================

/// What the loader does when two records share an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateIds {
    /// Fail with [`LoadError::DuplicateId`](crate::data::io::LoadError::DuplicateId).
    #[default]
    Reject,
    /// Keep every row and log a warning per repeated identifier.
    Warn,
    /// Keep every row silently.
    Keep,
}

// =============================================================================
// LoaderConfig
// =============================================================================

/// Configuration for [`Loader`](crate::data::io::Loader).
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct LoaderConfig {
    /// Top-level key whose value is the array of records. Default: `"observations"`.
    #[builder(into, default = String::from(OBSERVATIONS_RECORDS_KEY))]
    pub records_key: String,

    /// Record field holding the row identifier. Default: `"id"`.
    #[builder(into, default = String::from(OBSERVATIONS_ID_KEY))]
    pub id_key: String,

    /// Duplicate identifier policy. Default: `Reject`.
    #[builder(default)]
    pub duplicate_ids: DuplicateIds,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: loader_config_builder::IsComplete> LoaderConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either key is empty or both keys are equal.
    pub fn build(self) -> Result<LoaderConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl LoaderConfig {
    /// Layout `{"observations": [{"id": ..., ...}]}`.
    pub fn observations() -> Self {
        Self {
            records_key: OBSERVATIONS_RECORDS_KEY.into(),
            id_key: OBSERVATIONS_ID_KEY.into(),
            duplicate_ids: DuplicateIds::default(),
            verbosity: Verbosity::default(),
        }
    }

    /// Layout `{"data": [{"company_id": ..., ...}]}`.
    pub fn company_data() -> Self {
        Self {
            records_key: COMPANY_RECORDS_KEY.into(),
            id_key: COMPANY_ID_KEY.into(),
            duplicate_ids: DuplicateIds::default(),
            verbosity: Verbosity::default(),
        }
    }

    /// Return a copy with a different verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Return a copy with a different duplicate identifier policy.
    pub fn with_duplicate_ids(mut self, policy: DuplicateIds) -> Self {
        self.duplicate_ids = policy;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.records_key.is_empty() {
            return Err(ConfigError::EmptyKey { field: "records_key" });
        }
        if self.id_key.is_empty() {
            return Err(ConfigError::EmptyKey { field: "id_key" });
        }
        if self.records_key == self.id_key {
            return Err(ConfigError::SameKeys(self.id_key.clone()));
        }
        Ok(())
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::observations()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LoaderConfig::builder().build().unwrap();
        assert_eq!(config, LoaderConfig::default());
        assert_eq!(config.records_key, "observations");
        assert_eq!(config.id_key, "id");
        assert_eq!(config.duplicate_ids, DuplicateIds::Reject);
        assert_eq!(config.verbosity, Verbosity::Silent);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(LoaderConfig::observations().validate().is_ok());

        let company = LoaderConfig::company_data();
        assert!(company.validate().is_ok());
        assert_eq!(company.records_key, "data");
        assert_eq!(company.id_key, "company_id");
    }

    #[test]
    fn test_empty_records_key() {
        let result = LoaderConfig::builder().records_key("").build();
        assert_eq!(result, Err(ConfigError::EmptyKey { field: "records_key" }));
    }

    #[test]
    fn test_empty_id_key() {
        let result = LoaderConfig::builder().id_key("").build();
        assert_eq!(result, Err(ConfigError::EmptyKey { field: "id_key" }));
    }

    #[test]
    fn test_same_keys() {
        let result = LoaderConfig::builder()
            .records_key("rows")
            .id_key("rows")
            .build();
        assert!(matches!(result, Err(ConfigError::SameKeys(ref k)) if k == "rows"));
    }

    #[test]
    fn test_with_helpers() {
        let config = LoaderConfig::company_data()
            .with_verbosity(Verbosity::Info)
            .with_duplicate_ids(DuplicateIds::Warn);
        assert_eq!(config.verbosity, Verbosity::Info);
        assert_eq!(config.duplicate_ids, DuplicateIds::Warn);
        assert_eq!(config.id_key, "company_id");
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::EmptyKey { field: "id_key" };
        assert_eq!(err.to_string(), "id_key must not be empty");
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = LoaderConfig::company_data().with_duplicate_ids(DuplicateIds::Keep);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"keep\""));
        let back: LoaderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
