//! Ensemble of boosted trees.

use std::collections::BTreeSet;

use ndarray::Array1;

use crate::data::FeatureSource;
use crate::utils::Parallelism;

use super::tree::{Tree, TreeValidationError};

/// Structural validation errors for [`Ensemble`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnsembleValidationError {
    #[error("learning rate must be positive and finite, got {0}")]
    InvalidLearningRate(f64),
    #[error("tree {tree_idx}: {error}")]
    InvalidTree {
        tree_idx: usize,
        error: TreeValidationError,
    },
}

/// Ordered trees plus the learning rate that scales each of them.
///
/// `score(row) = Σ learning_rate × tree(row)` in insertion order. An empty
/// ensemble scores every row as `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    trees: Vec<Tree>,
    learning_rate: f64,
    categorical_features: BTreeSet<String>,
}

impl Ensemble {
    /// Create an empty ensemble.
    pub fn new(learning_rate: f64) -> Self {
        Self {
            trees: Vec::new(),
            learning_rate,
            categorical_features: BTreeSet::new(),
        }
    }

    /// Declare the features split by category equality.
    pub fn with_categorical_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Append an accepted tree.
    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    #[inline]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    #[inline]
    pub fn categorical_features(&self) -> &BTreeSet<String> {
        &self.categorical_features
    }

    #[inline]
    pub fn is_categorical(&self, feature: &str) -> bool {
        self.categorical_features.contains(feature)
    }

    #[inline]
    pub fn tree(&self, idx: usize) -> &Tree {
        &self.trees[idx]
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Score one row.
    pub fn predict_row<S: FeatureSource + ?Sized>(&self, row: &S) -> f64 {
        self.trees
            .iter()
            .fold(0.0, |acc, tree| acc + self.learning_rate * tree.predict_row(row))
    }

    /// Score a batch of rows.
    pub fn predict<S: FeatureSource>(&self, rows: &[S]) -> Array1<f64> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }

    /// Score a batch of rows, splitting the rows across the rayon pool when
    /// `parallelism` allows it.
    pub fn predict_par<S: FeatureSource + Sync>(
        &self,
        rows: &[S],
        parallelism: Parallelism,
    ) -> Array1<f64> {
        Array1::from(parallelism.maybe_par_map(rows, |row| self.predict_row(row)))
    }

    /// Validate every tree against the categorical declaration.
    pub fn validate(&self) -> Result<(), EnsembleValidationError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(EnsembleValidationError::InvalidLearningRate(self.learning_rate));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(&self.categorical_features)
                .map_err(|e| EnsembleValidationError::InvalidTree { tree_idx: i, error: e })?;
        }
        Ok(())
    }
}
