//! Regression tree and its structural validation.

use std::collections::BTreeSet;

use ndarray::Array1;

use crate::data::FeatureSource;

use super::node::{Split, SplitType, TreeNode};

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeValidationError {
    /// A leaf holds NaN or infinity.
    #[error("leaf value {value} is not finite")]
    NonFiniteLeaf { value: f64 },
    /// A numeric threshold is NaN or infinity.
    #[error("threshold {threshold} on `{feature}` is not finite")]
    NonFiniteThreshold { feature: String, threshold: f64 },
    /// The split kind disagrees with the model's categorical declaration.
    #[error("`{feature}` is split as {found:?} but declared {declared:?}")]
    SplitTypeMismatch {
        feature: String,
        found: SplitType,
        declared: SplitType,
    },
}

// ============================================================================
// Tree
// ============================================================================

/// A regression tree owning its nodes by value.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    root: TreeNode,
}

impl Tree {
    pub fn new(root: TreeNode) -> Self {
        Self { root }
    }

    #[inline]
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Feature used by the root split, `None` for a leaf-only tree.
    pub fn root_feature(&self) -> Option<&str> {
        match &self.root {
            TreeNode::Branch(b) => Some(b.feature.as_str()),
            TreeNode::Leaf { .. } => None,
        }
    }

    /// Split of the root, `None` for a leaf-only tree.
    pub fn root_split(&self) -> Option<&Split> {
        match &self.root {
            TreeNode::Branch(b) => Some(&b.split),
            TreeNode::Leaf { .. } => None,
        }
    }

    /// Walk from the root to a leaf and return its value.
    #[inline]
    pub fn predict_row<S: FeatureSource + ?Sized>(&self, row: &S) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Branch(b) => {
                    node = if b.split.goes_left(&b.feature, row) {
                        &b.left
                    } else {
                        &b.right
                    };
                }
            }
        }
    }

    pub fn predict<S: FeatureSource>(&self, rows: &[S]) -> Array1<f64> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }

    /// Number of levels of branches on the longest path (0 for a single leaf).
    pub fn depth(&self) -> usize {
        fn depth_of(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Branch(b) => 1 + depth_of(&b.left).max(depth_of(&b.right)),
            }
        }
        depth_of(&self.root)
    }

    /// Leaf values in left-to-right order.
    pub fn leaf_values(&self) -> Vec<f64> {
        let mut out = Vec::new();
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                TreeNode::Leaf { value } => out.push(*value),
                TreeNode::Branch(b) => {
                    stack.push(&b.right);
                    stack.push(&b.left);
                }
            }
        }
        out
    }

    #[inline]
    pub fn n_leaves(&self) -> usize {
        self.leaf_values().len()
    }

    /// Check finite values and that every split kind matches `categorical`.
    pub fn validate(&self, categorical: &BTreeSet<String>) -> Result<(), TreeValidationError> {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(TreeValidationError::NonFiniteLeaf { value: *value });
                    }
                }
                TreeNode::Branch(b) => {
                    let declared = if categorical.contains(&b.feature) {
                        SplitType::Categorical
                    } else {
                        SplitType::Numeric
                    };
                    let found = b.split.split_type();
                    if found != declared {
                        return Err(TreeValidationError::SplitTypeMismatch {
                            feature: b.feature.clone(),
                            found,
                            declared,
                        });
                    }
                    if let Split::Numeric { threshold } = b.split {
                        if !threshold.is_finite() {
                            return Err(TreeValidationError::NonFiniteThreshold {
                                feature: b.feature.clone(),
                                threshold,
                            });
                        }
                    }
                    stack.push(&b.right);
                    stack.push(&b.left);
                }
            }
        }
        Ok(())
    }
}
