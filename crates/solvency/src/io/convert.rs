//! Conversion between runtime models and payload types.
//!
//! Runtime → payload is infallible. Payload → runtime re-runs every
//! constructor check, so a file that decodes but describes an invalid model
//! is rejected with [`ReadError::Validation`].

use super::native::ReadError;
use super::payload::{
    ForestPayload, LogisticPayload, MetadataPayload, ModelPayload, PayloadV1, TreePayload,
};
use crate::model::{ForestModel, LogisticModel, Model, ModelMeta, Tree, TreeModel};

// ============================================================================
// Model -> Payload
// ============================================================================

impl From<&ModelMeta> for MetadataPayload {
    fn from(meta: &ModelMeta) -> Self {
        Self {
            num_features: meta.n_features() as u32,
            feature_names: meta.feature_names.clone(),
            threshold: meta.threshold,
            attributes: meta.attributes.clone(),
        }
    }
}

impl From<&Tree> for TreePayload {
    fn from(tree: &Tree) -> Self {
        Self {
            num_nodes: tree.n_nodes() as u32,
            split_features: tree.split_features().to_vec(),
            thresholds: tree.thresholds().to_vec(),
            left_children: tree.left_children().to_vec(),
            right_children: tree.right_children().to_vec(),
            default_left: tree.default_left().to_vec(),
            is_leaf: tree.leaves().to_vec(),
            leaf_values: tree.leaf_values().to_vec(),
        }
    }
}

impl From<&Model> for PayloadV1 {
    fn from(model: &Model) -> Self {
        let model_payload = match model {
            Model::Logistic(m) => ModelPayload::Logistic(LogisticPayload {
                weights: m.weights().to_vec(),
                bias: m.bias(),
            }),
            Model::Tree(m) => ModelPayload::Tree(TreePayload::from(m.tree())),
            Model::Forest(m) => ModelPayload::Forest(ForestPayload {
                trees: m.trees().iter().map(TreePayload::from).collect(),
            }),
        };
        Self {
            metadata: MetadataPayload::from(model.meta()),
            model: model_payload,
        }
    }
}

// ============================================================================
// Payload -> Model
// ============================================================================

fn invalid(err: impl std::fmt::Display) -> ReadError {
    ReadError::Validation(err.to_string())
}

impl TryFrom<MetadataPayload> for ModelMeta {
    type Error = ReadError;

    fn try_from(payload: MetadataPayload) -> Result<Self, Self::Error> {
        if payload.num_features as usize != payload.feature_names.len() {
            return Err(ReadError::Validation(format!(
                "metadata declares {} features but names {}",
                payload.num_features,
                payload.feature_names.len()
            )));
        }
        Ok(ModelMeta {
            feature_names: payload.feature_names,
            threshold: payload.threshold,
            attributes: payload.attributes,
        })
    }
}

impl TryFrom<TreePayload> for Tree {
    type Error = ReadError;

    fn try_from(payload: TreePayload) -> Result<Self, Self::Error> {
        if payload.num_nodes as usize != payload.is_leaf.len() {
            return Err(ReadError::Validation(format!(
                "tree declares {} nodes but stores {}",
                payload.num_nodes,
                payload.is_leaf.len()
            )));
        }
        Tree::new(
            payload.split_features,
            payload.thresholds,
            payload.left_children,
            payload.right_children,
            payload.default_left,
            payload.is_leaf,
            payload.leaf_values,
        )
        .map_err(invalid)
    }
}

impl TryFrom<PayloadV1> for Model {
    type Error = ReadError;

    fn try_from(payload: PayloadV1) -> Result<Self, Self::Error> {
        let meta = ModelMeta::try_from(payload.metadata)?;
        let model = match payload.model {
            ModelPayload::Logistic(p) => {
                Model::Logistic(LogisticModel::new(meta, p.weights, p.bias).map_err(invalid)?)
            }
            ModelPayload::Tree(p) => {
                Model::Tree(TreeModel::new(meta, Tree::try_from(p)?).map_err(invalid)?)
            }
            ModelPayload::Forest(p) => {
                let trees = p
                    .trees
                    .into_iter()
                    .map(Tree::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Model::Forest(ForestModel::new(meta, trees).map_err(invalid)?)
            }
        };
        Ok(model)
    }
}
