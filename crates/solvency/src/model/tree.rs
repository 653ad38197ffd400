//! Decision tree classifier.

use ndarray::{Array1, ArrayView1};
use thiserror::Error;

use super::error::{ModelError, PredictError};
use super::meta::ModelMeta;
use super::{Label, Predict};
use crate::data::Table;

/// Node index within a tree (0 = root).
pub type NodeId = u32;

/// Structural invariant violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeValidationError {
    #[error("tree has no nodes")]
    EmptyTree,

    #[error("node arrays disagree in length: {field} has {got}, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("node {node}: {side} child {child} out of bounds ({n_nodes} nodes)")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },

    #[error("node {node} points to itself")]
    SelfLoop { node: NodeId },

    #[error("cycle detected at node {node}")]
    CycleDetected { node: NodeId },

    #[error("node {node} is reachable from more than one parent")]
    DuplicateVisit { node: NodeId },

    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: NodeId },

    #[error("node {node} splits on feature {feature}, model has {n_features}")]
    FeatureOutOfBounds {
        node: NodeId,
        feature: u32,
        n_features: usize,
    },

    #[error("node {node} has a NaN threshold")]
    NanThreshold { node: NodeId },

    #[error("leaf {node} value {value} is not a probability")]
    LeafOutOfRange { node: NodeId, value: f64 },
}

/// One node, for building trees by hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    /// Go left when `x[feature] < threshold`; `NaN` goes `default_left`.
    Split {
        feature: u32,
        threshold: f64,
        left: NodeId,
        right: NodeId,
        default_left: bool,
    },
    /// Positive-class probability.
    Leaf { value: f64 },
}

/// Structure-of-Arrays tree storage.
///
/// Leaves hold the positive-class probability. Child indices are local to
/// this tree. Every constructed tree has passed structural validation, so
/// traversal always terminates at a leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    split_features: Box<[u32]>,
    thresholds: Box<[f64]>,
    left_children: Box<[NodeId]>,
    right_children: Box<[NodeId]>,
    default_left: Box<[bool]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f64]>,
}

impl Tree {
    /// Create a tree from parallel arrays (one entry per node).
    ///
    /// Split fields of leaves and leaf values of splits are ignored.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        split_features: Vec<u32>,
        thresholds: Vec<f64>,
        left_children: Vec<NodeId>,
        right_children: Vec<NodeId>,
        default_left: Vec<bool>,
        is_leaf: Vec<bool>,
        leaf_values: Vec<f64>,
    ) -> Result<Self, TreeValidationError> {
        let n_nodes = is_leaf.len();
        for (field, len) in [
            ("split_features", split_features.len()),
            ("thresholds", thresholds.len()),
            ("left_children", left_children.len()),
            ("right_children", right_children.len()),
            ("default_left", default_left.len()),
            ("leaf_values", leaf_values.len()),
        ] {
            if len != n_nodes {
                return Err(TreeValidationError::LengthMismatch {
                    field,
                    expected: n_nodes,
                    got: len,
                });
            }
        }

        let tree = Self {
            split_features: split_features.into_boxed_slice(),
            thresholds: thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            default_left: default_left.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: leaf_values.into_boxed_slice(),
        };
        tree.validate()?;
        Ok(tree)
    }

    /// Create a tree from a node list; `nodes[0]` is the root.
    pub fn from_nodes(nodes: &[Node]) -> Result<Self, TreeValidationError> {
        let n = nodes.len();
        let mut split_features = Vec::with_capacity(n);
        let mut thresholds = Vec::with_capacity(n);
        let mut left_children = Vec::with_capacity(n);
        let mut right_children = Vec::with_capacity(n);
        let mut default_left = Vec::with_capacity(n);
        let mut is_leaf = Vec::with_capacity(n);
        let mut leaf_values = Vec::with_capacity(n);

        for node in nodes {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left: dl,
                } => {
                    split_features.push(feature);
                    thresholds.push(threshold);
                    left_children.push(left);
                    right_children.push(right);
                    default_left.push(dl);
                    is_leaf.push(false);
                    leaf_values.push(0.0);
                }
                Node::Leaf { value } => {
                    split_features.push(0);
                    thresholds.push(0.0);
                    left_children.push(0);
                    right_children.push(0);
                    default_left.push(false);
                    is_leaf.push(true);
                    leaf_values.push(value);
                }
            }
        }

        Self::new(
            split_features,
            thresholds,
            left_children,
            right_children,
            default_left,
            is_leaf,
            leaf_values,
        )
    }

    /// A single-leaf tree predicting `value` for every row.
    pub fn constant(value: f64) -> Result<Self, TreeValidationError> {
        Self::from_nodes(&[Node::Leaf { value }])
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    pub fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    pub fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    #[inline]
    pub fn leaf_value(&self, node: NodeId) -> f64 {
        self.leaf_values[node as usize]
    }

    pub fn split_features(&self) -> &[u32] {
        &self.split_features
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn left_children(&self) -> &[NodeId] {
        &self.left_children
    }

    pub fn right_children(&self) -> &[NodeId] {
        &self.right_children
    }

    pub fn default_left(&self) -> &[bool] {
        &self.default_left
    }

    pub fn leaves(&self) -> &[bool] {
        &self.is_leaf
    }

    pub fn leaf_values(&self) -> &[f64] {
        &self.leaf_values
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate structural invariants: non-empty, children in bounds, no
    /// cycles or shared children, every node reachable, probabilities in
    /// `[0, 1]`.
    fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        // Iterative DFS with color marking.
        // 0 = unvisited, 1 = visiting, 2 = done
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(NodeId, u8)> = vec![(0, 0)];

        while let Some((node, phase)) = stack.pop() {
            let node_usize = node as usize;

            match phase {
                0 => {
                    match color[node_usize] {
                        0 => {}
                        1 => return Err(TreeValidationError::CycleDetected { node }),
                        _ => return Err(TreeValidationError::DuplicateVisit { node }),
                    }

                    color[node_usize] = 1;
                    stack.push((node, 1));

                    if self.is_leaf(node) {
                        let value = self.leaf_value(node);
                        if !(0.0..=1.0).contains(&value) {
                            return Err(TreeValidationError::LeafOutOfRange { node, value });
                        }
                        continue;
                    }

                    if self.thresholds[node_usize].is_nan() {
                        return Err(TreeValidationError::NanThreshold { node });
                    }

                    let left = self.left_child(node);
                    let right = self.right_child(node);
                    if left == node || right == node {
                        return Err(TreeValidationError::SelfLoop { node });
                    }
                    for (side, child) in [("left", left), ("right", right)] {
                        if child as usize >= n_nodes {
                            return Err(TreeValidationError::ChildOutOfBounds {
                                node,
                                side,
                                child,
                                n_nodes,
                            });
                        }
                    }

                    stack.push((right, 0));
                    stack.push((left, 0));
                }
                _ => {
                    color[node_usize] = 2;
                }
            }
        }

        if let Some(node) = color.iter().position(|&c| c == 0) {
            return Err(TreeValidationError::UnreachableNode { node: node as NodeId });
        }

        Ok(())
    }

    /// Check that every split refers to a feature below `n_features`.
    pub fn check_features(&self, n_features: usize) -> Result<(), TreeValidationError> {
        for node in 0..self.n_nodes() {
            let feature = self.split_features[node];
            if !self.is_leaf[node] && feature as usize >= n_features {
                return Err(TreeValidationError::FeatureOutOfBounds {
                    node: node as NodeId,
                    feature,
                    n_features,
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Traverse to the leaf for one row of features.
    pub fn traverse_to_leaf(&self, row: ArrayView1<'_, f64>) -> NodeId {
        let mut node: NodeId = 0;
        while !self.is_leaf(node) {
            let i = node as usize;
            let value = row[self.split_features[i] as usize];
            let go_left = if value.is_nan() {
                self.default_left[i]
            } else {
                value < self.thresholds[i]
            };
            node = if go_left {
                self.left_children[i]
            } else {
                self.right_children[i]
            };
        }
        node
    }

    /// Positive-class probability for one row.
    #[inline]
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.leaf_value(self.traverse_to_leaf(row))
    }
}

/// A single decision tree over named features.
///
/// The label is `1` when the leaf probability is at or above the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeModel {
    meta: ModelMeta,
    tree: Tree,
}

impl TreeModel {
    pub fn new(meta: ModelMeta, tree: Tree) -> Result<Self, ModelError> {
        meta.validate()?;
        tree.check_features(meta.n_features())
            .map_err(|source| ModelError::Tree { tree: 0, source })?;
        Ok(Self { meta, tree })
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Positive-class probabilities, one per row.
    pub fn predict_proba(&self, table: &Table) -> Result<Array1<f64>, PredictError> {
        let features = table.feature_matrix(self.meta.feature_names.as_slice())?;
        Ok(features
            .outer_iter()
            .map(|row| self.tree.predict_row(row))
            .collect())
    }
}

impl Predict for TreeModel {
    fn predict(&self, table: &Table) -> Result<Array1<Label>, PredictError> {
        Ok(self.predict_proba(table)?.mapv(|p| self.meta.label(p)))
    }
}
