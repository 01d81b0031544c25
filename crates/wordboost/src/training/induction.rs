//! Randomized tree induction.
//!
//! Each node picks one split feature uniformly at random from the retained
//! columns and one split point uniformly at random (extremely randomized
//! trees). No gain is evaluated: the boosting loop's accept/reject gate is
//! the only quality filter.
//!
//! - Categorical feature: a random observed category; equal rows go left.
//! - Numeric feature: rows sorted by value, a random index `k` in
//!   `[1, len - 1]`, threshold = midpoint of sorted values `k - 1` and `k`;
//!   rows with `value <= threshold` go left.
//!
//! A side becomes a leaf (mean target of its rows, `0.0` for no rows) when it
//! holds at most one row or the depth budget is exhausted.

use std::collections::HashSet;

use ndarray::ArrayView1;
use rand::Rng;

use crate::data::{ColumnValues, FeatureColumn, TrainingSet};
use crate::repr::{Split, Tree, TreeNode};

/// Grows randomized regression trees against a residual target.
pub struct TreeInducer<'s, 'a> {
    set: &'s TrainingSet<'a>,
    targets: ArrayView1<'s, f64>,
}

impl<'s, 'a> TreeInducer<'s, 'a> {
    /// `targets` must have one entry per row of `set`.
    pub fn new(set: &'s TrainingSet<'a>, targets: ArrayView1<'s, f64>) -> Self {
        debug_assert_eq!(set.n_rows(), targets.len());
        Self { set, targets }
    }

    /// Grow a tree of `depth` levels over all rows.
    ///
    /// `excluded` is removed from the candidate features of the root only;
    /// deeper levels may split on it again.
    pub fn grow<R: Rng>(&self, depth: usize, excluded: Option<&str>, rng: &mut R) -> Tree {
        let rows: Vec<usize> = (0..self.set.n_rows()).collect();
        Tree::new(self.grow_node(rows, depth, excluded, rng))
    }

    fn grow_node<R: Rng>(
        &self,
        rows: Vec<usize>,
        depth: usize,
        excluded: Option<&str>,
        rng: &mut R,
    ) -> TreeNode {
        let candidates: Vec<&FeatureColumn> = self
            .set
            .columns()
            .iter()
            .filter(|c| Some(c.name.as_str()) != excluded)
            .collect();

        if depth == 0 || rows.is_empty() || candidates.is_empty() {
            return TreeNode::leaf(self.mean(&rows));
        }

        let column = candidates[rng.gen_range(0..candidates.len())];
        let (split, left, right) = match &column.values {
            ColumnValues::Categorical(values) => Self::categorical_split(values, rows, rng),
            ColumnValues::Numeric(values) => Self::numeric_split(values.view(), rows, rng),
        };

        let left = self.grow_child(left, depth, rng);
        let right = self.grow_child(right, depth, rng);
        TreeNode::branch(column.name.clone(), split, left, right)
    }

    fn grow_child<R: Rng>(&self, rows: Vec<usize>, depth: usize, rng: &mut R) -> TreeNode {
        if rows.len() <= 1 || depth <= 1 {
            TreeNode::leaf(self.mean(&rows))
        } else {
            self.grow_node(rows, depth - 1, None, rng)
        }
    }

    fn categorical_split<R: Rng>(
        values: &[String],
        rows: Vec<usize>,
        rng: &mut R,
    ) -> (Split, Vec<usize>, Vec<usize>) {
        // Distinct categories in first-seen order keeps the draw reproducible.
        let mut seen = HashSet::new();
        let distinct: Vec<&str> = rows
            .iter()
            .map(|&r| values[r].as_str())
            .filter(|v| seen.insert(*v))
            .collect();

        let category = distinct[rng.gen_range(0..distinct.len())].to_string();
        let (left, right): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&r| values[r] == category);
        (Split::Categorical { category }, left, right)
    }

    fn numeric_split<R: Rng>(
        values: ArrayView1<f64>,
        mut rows: Vec<usize>,
        rng: &mut R,
    ) -> (Split, Vec<usize>, Vec<usize>) {
        rows.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        let threshold = if rows.len() < 2 {
            values[rows[0]]
        } else {
            let k = rng.gen_range(1..rows.len());
            values[rows[k - 1]] / 2.0 + values[rows[k]] / 2.0
        };

        let (left, right): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&r| values[r] <= threshold);
        (Split::Numeric { threshold }, left, right)
    }

    fn mean(&self, rows: &[usize]) -> f64 {
        if rows.is_empty() {
            return 0.0;
        }
        rows.iter().map(|&r| self.targets[r]).sum::<f64>() / rows.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FeatureVector, TrainingSample};
    use crate::repr::Branch;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::collections::HashSet as Set;

    fn samples() -> Vec<TrainingSample> {
        (0..20)
            .map(|i| {
                let x = i as f64;
                let g = ["a", "b", "c"][i % 3];
                let base = if i < 10 { 0.0 } else { 1.0 };
                TrainingSample::new(
                    FeatureVector::new().with("x", x).with("z", (i * 7 % 11) as f64).with("g", g),
                    base + 0.1 * (i % 3) as f64,
                )
            })
            .collect()
    }

    /// Every leaf must hold the mean target of the rows that reach it.
    fn assert_leaf_purity(tree: &Tree, samples: &[TrainingSample]) {
        fn walk(node: &TreeNode, rows: Vec<usize>, samples: &[TrainingSample]) {
            match node {
                TreeNode::Leaf { value } => {
                    let mean = if rows.is_empty() {
                        0.0
                    } else {
                        rows.iter().map(|&r| samples[r].label).sum::<f64>() / rows.len() as f64
                    };
                    assert_abs_diff_eq!(*value, mean, epsilon = 1e-12);
                }
                TreeNode::Branch(b) => {
                    let Branch { feature, split, left, right } = b.as_ref();
                    let (l, r): (Vec<usize>, Vec<usize>) = rows
                        .into_iter()
                        .partition(|&i| split.goes_left(feature, &samples[i].features));
                    walk(left, l, samples);
                    walk(right, r, samples);
                }
            }
        }
        walk(tree.root(), (0..samples.len()).collect(), samples);
    }

    #[test]
    fn leaves_hold_partition_means() {
        let samples = samples();
        let categorical: Set<String> = ["g".to_string()].into();
        let set = TrainingSet::new(&samples, &categorical).unwrap();

        for seed in 0..20 {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let inducer = TreeInducer::new(&set, set.targets().view());
            let tree = inducer.grow(4, None, &mut rng);
            assert!(tree.depth() <= 4);
            assert_leaf_purity(&tree, &samples);
        }
    }

    #[test]
    fn same_seed_same_tree() {
        let samples = samples();
        let set = TrainingSet::new(&samples, &Set::new()).unwrap();
        let inducer = TreeInducer::new(&set, set.targets().view());

        let a = inducer.grow(3, None, &mut Xoshiro256PlusPlus::seed_from_u64(7));
        let b = inducer.grow(3, None, &mut Xoshiro256PlusPlus::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn excluded_feature_never_at_root() {
        let samples = samples();
        let set = TrainingSet::new(&samples, &Set::new()).unwrap();
        let inducer = TreeInducer::new(&set, set.targets().view());

        for seed in 0..30 {
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
            let tree = inducer.grow(2, Some("x"), &mut rng);
            assert_ne!(tree.root_feature(), Some("x"));
        }
    }

    #[test]
    fn depth_one_is_a_stump() {
        let samples = samples();
        let set = TrainingSet::new(&samples, &Set::new()).unwrap();
        let inducer = TreeInducer::new(&set, set.targets().view());
        let tree = inducer.grow(1, None, &mut Xoshiro256PlusPlus::seed_from_u64(1));
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn no_candidates_gives_mean_leaf() {
        let samples = vec![
            TrainingSample::new(FeatureVector::new().with("x", 1.0), 1.0),
            TrainingSample::new(FeatureVector::new().with("x", 1.0), 3.0),
        ];
        let set = TrainingSet::new(&samples, &Set::new()).unwrap();
        assert!(set.columns().is_empty());

        let inducer = TreeInducer::new(&set, set.targets().view());
        let tree = inducer.grow(3, None, &mut Xoshiro256PlusPlus::seed_from_u64(0));
        assert_eq!(tree.root(), &TreeNode::leaf(2.0));
    }

    #[test]
    fn numeric_threshold_is_a_midpoint() {
        let samples: Vec<TrainingSample> = [1.0, 2.0, 10.0, 11.0]
            .iter()
            .map(|&x| TrainingSample::new(FeatureVector::new().with("x", x), 0.0))
            .collect();
        let set = TrainingSet::new(&samples, &Set::new()).unwrap();
        let inducer = TreeInducer::new(&set, set.targets().view());

        for seed in 0..16 {
            let tree = inducer.grow(1, None, &mut Xoshiro256PlusPlus::seed_from_u64(seed));
            match tree.root_split() {
                Some(Split::Numeric { threshold }) => {
                    assert!([1.5, 6.0, 10.5].contains(threshold), "threshold {threshold}");
                }
                other => panic!("unexpected split {other:?}"),
            }
        }
    }

    #[test]
    fn threshold_between_huge_values_stays_finite() {
        let samples: Vec<TrainingSample> = [0.75 * f64::MAX, f64::MAX]
            .iter()
            .map(|&x| TrainingSample::new(FeatureVector::new().with("x", x), x.signum()))
            .collect();
        let set = TrainingSet::new(&samples, &Set::new()).unwrap();
        let inducer = TreeInducer::new(&set, set.targets().view());

        let tree = inducer.grow(1, None, &mut Xoshiro256PlusPlus::seed_from_u64(0));
        match tree.root_split() {
            Some(Split::Numeric { threshold }) => {
                assert!(threshold.is_finite());
                assert!(*threshold >= 0.75 * f64::MAX && *threshold < f64::MAX);
            }
            other => panic!("unexpected split {other:?}"),
        }
        assert!(tree.validate(&Default::default()).is_ok());
    }

    #[test]
    fn categorical_split_uses_observed_category() {
        let samples = samples();
        let categorical: Set<String> = ["g".to_string()].into();
        let set = TrainingSet::new(&samples, &categorical).unwrap();
        let inducer = TreeInducer::new(&set, set.targets().view());

        for seed in 0..30 {
            let tree = inducer.grow(1, None, &mut Xoshiro256PlusPlus::seed_from_u64(seed));
            if let Some(Split::Categorical { category }) = tree.root_split() {
                assert!(["a", "b", "c"].contains(&category.as_str()));
            }
        }
    }
}
