//! Payload structures for the model formats.
//!
//! These mirror the runtime model types but are plain data, so the same
//! structs serve the binary (Postcard) and JSON (serde_json) encodings.

use serde::{Deserialize, Serialize};

use crate::model::ModelKind;

// ============================================================================
// Top-Level Payload
// ============================================================================

/// Version-tagged payload enum for forward compatibility.
///
/// New format versions add new variants rather than modifying existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    V1(PayloadV1),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadV1 {
    pub metadata: MetadataPayload,
    pub model: ModelPayload,
}

// ============================================================================
// Metadata
// ============================================================================

/// Metadata common to all model kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataPayload {
    /// Must equal `feature_names.len()`.
    pub num_features: u32,
    pub feature_names: Vec<String>,
    pub threshold: f64,
    pub attributes: Vec<(String, String)>,
}

// ============================================================================
// Model Payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelPayload {
    Logistic(LogisticPayload),
    Tree(TreePayload),
    Forest(ForestPayload),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticPayload {
    /// One weight per feature, in feature order.
    pub weights: Vec<f64>,
    pub bias: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestPayload {
    pub trees: Vec<TreePayload>,
}

/// Single decision tree, one entry per node in every array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreePayload {
    pub num_nodes: u32,
    pub split_features: Vec<u32>,
    pub thresholds: Vec<f64>,
    pub left_children: Vec<u32>,
    pub right_children: Vec<u32>,
    pub default_left: Vec<bool>,
    pub is_leaf: Vec<bool>,
    /// Positive-class probability at leaves, 0.0 at splits.
    pub leaf_values: Vec<f64>,
}

impl ModelPayload {
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Logistic(_) => ModelKind::Logistic,
            Self::Tree(_) => ModelKind::Tree,
            Self::Forest(_) => ModelKind::Forest,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
