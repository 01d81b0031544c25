//! Conversion between runtime types and schema types.
//!
//! Runtime to schema is infallible (`From`); schema to runtime checks the
//! array layout and returns [`PersistError::Validation`] on malformed input.

use std::collections::HashMap;

use super::error::PersistError;
use super::schema::{CategoriesSchema, EnsembleSchema, TreeSchema};
use crate::repr::{Ensemble, Split, Tree, TreeNode};

// =============================================================================
// Tree
// =============================================================================

impl TreeSchema {
    fn empty() -> Self {
        Self {
            num_nodes: 0,
            split_features: Vec::new(),
            thresholds: Vec::new(),
            children_left: Vec::new(),
            children_right: Vec::new(),
            leaf_values: Vec::new(),
            categories: CategoriesSchema::default(),
        }
    }

    fn push_node(&mut self) -> usize {
        let idx = self.split_features.len();
        self.split_features.push(String::new());
        self.thresholds.push(0.0);
        self.children_left.push(0);
        self.children_right.push(0);
        self.leaf_values.push(0.0);
        self.num_nodes += 1;
        idx
    }
}

impl From<&Tree> for TreeSchema {
    fn from(tree: &Tree) -> Self {
        let mut schema = TreeSchema::empty();
        let mut stack: Vec<(&TreeNode, Option<(usize, bool)>)> = vec![(tree.root(), None)];

        while let Some((node, parent)) = stack.pop() {
            let idx = schema.push_node();
            match parent {
                Some((p, true)) => schema.children_left[p] = idx as u32,
                Some((p, false)) => schema.children_right[p] = idx as u32,
                None => {}
            }
            match node {
                TreeNode::Leaf { value } => schema.leaf_values[idx] = *value,
                TreeNode::Branch(b) => {
                    schema.split_features[idx] = b.feature.clone();
                    match &b.split {
                        Split::Numeric { threshold } => schema.thresholds[idx] = *threshold,
                        Split::Categorical { category } => {
                            schema.categories.node_indices.push(idx as u32);
                            schema.categories.categories.push(category.clone());
                        }
                    }
                    stack.push((&b.right, Some((idx, false))));
                    stack.push((&b.left, Some((idx, true))));
                }
            }
        }
        schema
    }
}

impl TryFrom<TreeSchema> for Tree {
    type Error = PersistError;

    fn try_from(schema: TreeSchema) -> Result<Self, Self::Error> {
        let n = schema.num_nodes as usize;
        if n == 0 {
            return Err(PersistError::Validation("tree has no nodes".into()));
        }
        let lengths = [
            schema.split_features.len(),
            schema.thresholds.len(),
            schema.children_left.len(),
            schema.children_right.len(),
            schema.leaf_values.len(),
        ];
        if lengths.iter().any(|&len| len != n) {
            return Err(PersistError::Validation(format!(
                "node arrays have lengths {lengths:?}, expected {n}"
            )));
        }
        if schema.categories.node_indices.len() != schema.categories.categories.len() {
            return Err(PersistError::Validation(
                "category node indices and labels differ in length".into(),
            ));
        }
        let categories: HashMap<usize, &str> = schema
            .categories
            .node_indices
            .iter()
            .zip(&schema.categories.categories)
            .map(|(&idx, cat)| (idx as usize, cat.as_str()))
            .collect();

        build_node(&schema, &categories, 0).map(Tree::new)
    }
}

fn build_node(
    schema: &TreeSchema,
    categories: &HashMap<usize, &str>,
    idx: usize,
) -> Result<TreeNode, PersistError> {
    let n = schema.num_nodes as usize;
    let (left, right) = (
        schema.children_left[idx] as usize,
        schema.children_right[idx] as usize,
    );
    if left == 0 && right == 0 {
        return Ok(TreeNode::leaf(schema.leaf_values[idx]));
    }
    // Children follow their parent in preorder; this also rules out cycles.
    for child in [left, right] {
        if child <= idx || child >= n {
            return Err(PersistError::Validation(format!(
                "node {idx} has invalid child index {child}"
            )));
        }
    }

    let feature = &schema.split_features[idx];
    if feature.is_empty() {
        return Err(PersistError::Validation(format!("node {idx} has no split feature")));
    }
    let split = match categories.get(&idx) {
        Some(category) => Split::Categorical { category: (*category).to_string() },
        None => Split::Numeric { threshold: schema.thresholds[idx] },
    };
    Ok(TreeNode::branch(
        feature.clone(),
        split,
        build_node(schema, categories, left)?,
        build_node(schema, categories, right)?,
    ))
}

// =============================================================================
// Ensemble
// =============================================================================

impl From<&Ensemble> for EnsembleSchema {
    fn from(ensemble: &Ensemble) -> Self {
        Self {
            learning_rate: ensemble.learning_rate(),
            categorical_features: ensemble.categorical_features().iter().cloned().collect(),
            trees: ensemble.trees().map(TreeSchema::from).collect(),
        }
    }
}

impl TryFrom<EnsembleSchema> for Ensemble {
    type Error = PersistError;

    fn try_from(schema: EnsembleSchema) -> Result<Self, Self::Error> {
        let mut ensemble = Ensemble::new(schema.learning_rate)
            .with_categorical_features(schema.categorical_features);
        for tree in schema.trees {
            ensemble.push_tree(Tree::try_from(tree)?);
        }
        ensemble.validate()?;
        Ok(ensemble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::EnsembleValidationError;

    fn mixed_tree() -> Tree {
        Tree::new(TreeNode::branch(
            "x",
            Split::Numeric { threshold: 1.5 },
            TreeNode::branch(
                "pos",
                Split::Categorical { category: "noun".into() },
                TreeNode::leaf(1.0),
                TreeNode::leaf(2.0),
            ),
            TreeNode::leaf(3.0),
        ))
    }

    #[test]
    fn tree_layout_is_preorder() {
        let schema = TreeSchema::from(&mixed_tree());
        assert_eq!(schema.num_nodes, 5);
        assert_eq!(schema.split_features, vec!["x", "pos", "", "", ""]);
        assert_eq!(schema.children_left, vec![1, 2, 0, 0, 0]);
        assert_eq!(schema.children_right, vec![4, 3, 0, 0, 0]);
        assert_eq!(schema.leaf_values, vec![0.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(schema.categories.node_indices, vec![1]);

        assert_eq!(Tree::try_from(schema).unwrap(), mixed_tree());
    }

    #[test]
    fn backward_child_is_rejected() {
        let mut schema = TreeSchema::from(&mixed_tree());
        schema.children_left[1] = 0;
        schema.children_right[1] = 1;
        assert!(matches!(Tree::try_from(schema), Err(PersistError::Validation(_))));
    }

    #[test]
    fn ragged_arrays_are_rejected() {
        let mut schema = TreeSchema::from(&mixed_tree());
        schema.leaf_values.pop();
        assert!(matches!(Tree::try_from(schema), Err(PersistError::Validation(_))));
    }

    #[test]
    fn undeclared_categorical_split_is_rejected() {
        let mut ensemble = Ensemble::new(0.1);
        ensemble.push_tree(mixed_tree());
        let err = Ensemble::try_from(EnsembleSchema::from(&ensemble)).unwrap_err();
        assert!(matches!(
            err,
            PersistError::InvalidEnsemble(EnsembleValidationError::InvalidTree { tree_idx: 0, .. })
        ));

        let mut declared = Ensemble::new(0.1).with_categorical_features(["pos"]);
        declared.push_tree(mixed_tree());
        let restored = Ensemble::try_from(EnsembleSchema::from(&declared)).unwrap();
        assert_eq!(restored, declared);
    }
}
