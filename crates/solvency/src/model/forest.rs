//! Averaging tree ensemble.

use ndarray::Array1;

use super::error::{ModelError, PredictError};
use super::meta::ModelMeta;
use super::tree::Tree;
use super::{Label, Predict};
use crate::data::Table;

/// Ensemble of [`Tree`]s over one feature list.
///
/// The positive-class probability is the mean of the trees' leaf
/// probabilities, as in a random forest classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestModel {
    meta: ModelMeta,
    trees: Vec<Tree>,
}

impl ForestModel {
    pub fn new(meta: ModelMeta, trees: Vec<Tree>) -> Result<Self, ModelError> {
        meta.validate()?;
        if trees.is_empty() {
            return Err(ModelError::EmptyForest);
        }
        for (i, tree) in trees.iter().enumerate() {
            tree.check_features(meta.n_features())
                .map_err(|source| ModelError::Tree { tree: i, source })?;
        }
        Ok(Self { meta, trees })
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean positive-class probability, one per row.
    pub fn predict_proba(&self, table: &Table) -> Result<Array1<f64>, PredictError> {
        let features = table.feature_matrix(self.meta.feature_names.as_slice())?;
        let n_trees = self.trees.len() as f64;
        Ok(features
            .outer_iter()
            .map(|row| {
                let sum: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
                sum / n_trees
            })
            .collect())
    }
}

impl Predict for ForestModel {
    fn predict(&self, table: &Table) -> Result<Array1<Label>, PredictError> {
        Ok(self.predict_proba(table)?.mapv(|p| self.meta.label(p)))
    }
}
