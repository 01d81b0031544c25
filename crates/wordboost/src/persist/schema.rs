//! Schema types for ensemble serialization.
//!
//! Schema types are decoupled from the runtime [`Ensemble`](crate::repr::Ensemble)
//! so the on-disk format can evolve behind a version number. Trees are stored
//! as flat per-node arrays in preorder; node `0` is the root and a child index
//! of `0` marks a leaf.

use serde::{Deserialize, Serialize};

/// Current schema version written by this crate.
pub const SCHEMA_VERSION: u32 = 1;

/// Category labels of categorical splits, keyed by node index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CategoriesSchema {
    pub node_indices: Vec<u32>,
    pub categories: Vec<String>,
}

impl CategoriesSchema {
    pub fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }
}

/// One tree in structure-of-arrays layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSchema {
    pub num_nodes: u32,
    /// Split feature per node, empty for leaves.
    pub split_features: Vec<String>,
    /// Numeric threshold per node, `0.0` for leaves and categorical splits.
    pub thresholds: Vec<f64>,
    pub children_left: Vec<u32>,
    pub children_right: Vec<u32>,
    /// Leaf value per node, `0.0` for internal nodes.
    pub leaf_values: Vec<f64>,
    #[serde(default, skip_serializing_if = "CategoriesSchema::is_empty")]
    pub categories: CategoriesSchema,
}

/// Full ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleSchema {
    pub learning_rate: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categorical_features: Vec<String>,
    pub trees: Vec<TreeSchema>,
}

impl EnsembleSchema {
    /// Model type string.
    pub const MODEL_TYPE: &'static str = "wordboost_ensemble";
}

/// Top-level document: version, type tag and payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEnvelope {
    pub schema_version: u32,
    pub model_type: String,
    pub model: EnsembleSchema,
}

impl ModelEnvelope {
    pub fn new(model: EnsembleSchema) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            model_type: EnsembleSchema::MODEL_TYPE.to_string(),
            model,
        }
    }
}
