//! Model metadata.
//!
//! Shared metadata for the built-in classifiers.

use std::collections::HashSet;

use super::error::ModelError;
use super::Label;

/// Default probability threshold for the positive (bankrupt) label.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Shared metadata for all model types.
///
/// Contains the names of the features the model was fitted on (in the order its
/// parameters refer to them) and the decision threshold that turns a
/// probability into a label.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMeta {
    /// Feature names, in parameter order.
    pub feature_names: Vec<String>,
    /// Probability at or above which a row is labelled `1`.
    pub threshold: f64,
    /// Free-form key-value attributes (e.g. training provenance).
    pub attributes: Vec<(String, String)>,
}

impl ModelMeta {
    /// Create metadata with the default threshold.
    pub fn new<I, S>(feature_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            feature_names: feature_names.into_iter().map(Into::into).collect(),
            threshold: DEFAULT_THRESHOLD,
            attributes: Vec::new(),
        }
    }

    /// Set the decision threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Look up an attribute (first match).
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Label for a positive-class probability. `NaN` maps to `0`.
    #[inline]
    pub fn label(&self, probability: f64) -> Label {
        Label::from(probability >= self.threshold)
    }

    /// Check the threshold range and feature name uniqueness.
    pub fn validate(&self) -> Result<(), ModelError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ModelError::InvalidThreshold(self.threshold));
        }
        let mut seen = HashSet::with_capacity(self.feature_names.len());
        for name in &self.feature_names {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::DuplicateFeature(name.clone()));
            }
        }
        Ok(())
    }
}
