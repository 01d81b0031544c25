//! Tree node types.

use crate::data::FeatureSource;

/// Type of split in a decision tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitType {
    /// Numeric split: go left if value <= threshold
    #[default]
    Numeric,
    /// Categorical split: go left if value == category
    Categorical,
}

/// Split descriptor of a branch.
#[derive(Debug, Clone, PartialEq)]
pub enum Split {
    Numeric { threshold: f64 },
    Categorical { category: String },
}

impl Split {
    #[inline]
    pub fn split_type(&self) -> SplitType {
        match self {
            Self::Numeric { .. } => SplitType::Numeric,
            Self::Categorical { .. } => SplitType::Categorical,
        }
    }

    /// Decide the direction for a row's value of `feature`.
    #[inline]
    pub fn goes_left<S: FeatureSource + ?Sized>(&self, feature: &str, row: &S) -> bool {
        match self {
            Self::Numeric { threshold } => row.numeric(feature) <= *threshold,
            Self::Categorical { category } => row.category(feature) == category.as_str(),
        }
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric { threshold } => write!(f, "<= {threshold}"),
            Self::Categorical { category } => write!(f, "== {category:?}"),
        }
    }
}

/// Interior node: one feature, one split, two exclusively owned children.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub feature: String,
    pub split: Split,
    pub left: TreeNode,
    pub right: TreeNode,
}

/// A regression tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Branch(Box<Branch>),
    Leaf { value: f64 },
}

impl TreeNode {
    #[inline]
    pub fn leaf(value: f64) -> Self {
        Self::Leaf { value }
    }

    #[inline]
    pub fn branch(feature: impl Into<String>, split: Split, left: TreeNode, right: TreeNode) -> Self {
        Self::Branch(Box::new(Branch {
            feature: feature.into(),
            split,
            left,
            right,
        }))
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }
}
