//! Boosting trainer.
//!
//! Fits randomized trees to the residuals of the current ensemble output and
//! keeps a tree only if it lowers the training loss. Use
//! [`BoostTrainer::train`] to grow an [`Ensemble`] in place.

use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::data::{DatasetError, TrainingSet};
use crate::model::ConfigError;
use crate::repr::Ensemble;

use super::history::{StepRecord, TrainingHistory};
use super::induction::TreeInducer;
use super::logger::{TrainingLogger, Verbosity};
use super::metrics::{MetricFn, Rmse};

// =============================================================================
// TrainError
// =============================================================================

/// Errors that prevent training from starting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// =============================================================================
// BoostParams
// =============================================================================

/// Parameters for a boosting run.
///
/// The learning rate lives on the [`Ensemble`] being trained so that every
/// tree in it is scaled by the same factor.
#[derive(Clone, Debug)]
pub struct BoostParams {
    /// Number of boosting steps (candidate trees) to try.
    pub n_steps: usize,
    /// Levels per tree; 1 is a stump.
    pub tree_depth: usize,
    /// Random seed for feature and split-point draws.
    pub seed: u64,
    /// Verbosity level for training output.
    pub verbosity: Verbosity,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            n_steps: 1000,
            tree_depth: 2,
            seed: 42,
            verbosity: Verbosity::default(),
        }
    }
}

// =============================================================================
// BoostTrainer
// =============================================================================

/// Residual-fitting trainer with a per-step accept/reject gate.
pub struct BoostTrainer<M: MetricFn = Rmse> {
    metric: M,
    params: BoostParams,
}

impl BoostTrainer<Rmse> {
    /// Trainer gated on RMSE.
    pub fn with_params(params: BoostParams) -> Self {
        Self::new(Rmse, params)
    }
}

impl<M: MetricFn> BoostTrainer<M> {
    pub fn new(metric: M, params: BoostParams) -> Self {
        Self { metric, params }
    }

    pub fn params(&self) -> &BoostParams {
        &self.params
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Train with an RNG seeded from the params.
    pub fn train(
        &self,
        set: &TrainingSet<'_>,
        ensemble: &mut Ensemble,
    ) -> Result<TrainingHistory, TrainError> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.params.seed);
        self.train_with_rng(set, ensemble, &mut rng)
    }

    /// Append accepted trees to `ensemble`.
    ///
    /// Each step:
    /// 1. residual = target - current output
    /// 2. grow a tree on the residuals, excluding the previous step's root
    ///    feature from the root candidates (kept even if that step was
    ///    rejected)
    /// 3. candidate = current + learning_rate × tree
    /// 4. accept iff there is no recorded loss yet or the candidate loss is
    ///    strictly better than the best one seen in this call
    pub fn train_with_rng<R: Rng>(
        &self,
        set: &TrainingSet<'_>,
        ensemble: &mut Ensemble,
        rng: &mut R,
    ) -> Result<TrainingHistory, TrainError> {
        if self.params.tree_depth == 0 {
            return Err(ConfigError::InvalidTreeDepth(self.params.tree_depth).into());
        }

        let learning_rate = ensemble.learning_rate();
        let targets = set.targets();

        let mut logger = TrainingLogger::new(self.params.verbosity);
        logger.start_training(self.params.n_steps, set.n_rows(), set.columns().len());
        for feature in set.dropped_features() {
            logger.log_dropped_feature(feature);
        }

        let mut history = TrainingHistory::new(set.dropped_features().to_vec());
        let mut current: Array1<f64> = set
            .samples()
            .iter()
            .map(|s| ensemble.predict_row(&s.features))
            .collect();

        let mut excluded: Option<String> = None;
        // Each call accepts its first step unconditionally, resumed or not.
        let mut best_loss: Option<f64> = None;

        for step in 0..self.params.n_steps {
            let residuals = targets - &current;
            let tree = TreeInducer::new(set, residuals.view()).grow(
                self.params.tree_depth,
                excluded.as_deref(),
                rng,
            );
            if tree.root().is_leaf() {
                logger.log_leaf_only_tree(step);
            }

            let candidate: Array1<f64> = set
                .samples()
                .iter()
                .zip(current.iter())
                .map(|(s, &out)| out + learning_rate * tree.predict_row(&s.features))
                .collect();
            let loss = self.metric.compute(candidate.view(), targets.view());

            excluded = tree.root_feature().map(str::to_owned);

            let accepted = best_loss.map_or(true, |best| self.metric.is_improvement(loss, best));
            let record = StepRecord {
                step,
                loss,
                accepted,
                feature: excluded.clone(),
                split: tree.root_split().cloned(),
            };
            logger.log_step(&record);
            history.push(record);

            if accepted {
                ensemble.push_tree(tree);
                current = candidate;
                best_loss = Some(loss);
            }
        }

        logger.finish_training(&history);
        Ok(history)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FeatureVector, TrainingSample};
    use approx::assert_abs_diff_eq;
    use std::collections::HashSet;

    fn params(n_steps: usize, tree_depth: usize, seed: u64) -> BoostParams {
        BoostParams { n_steps, tree_depth, seed, ..Default::default() }
    }

    fn linear_samples(n: usize) -> Vec<TrainingSample> {
        (0..n)
            .map(|i| {
                let x = i as f64 / 10.0;
                let z = ((i * 13) % 7) as f64;
                TrainingSample::new(FeatureVector::new().with("x", x).with("z", z), x + 0.5)
            })
            .collect()
    }

    #[test]
    fn ensemble_never_exceeds_n_steps() {
        let samples = linear_samples(50);
        let set = TrainingSet::new(&samples, &HashSet::new()).unwrap();
        let mut ensemble = Ensemble::new(0.3);

        let history = BoostTrainer::with_params(params(40, 3, 1))
            .train(&set, &mut ensemble)
            .unwrap();

        assert!(ensemble.n_trees() <= 40);
        assert_eq!(ensemble.n_trees(), history.n_accepted());
        assert_eq!(history.steps().len(), 40);
    }

    #[test]
    fn accepted_losses_are_non_increasing() {
        let samples = linear_samples(60);
        let set = TrainingSet::new(&samples, &HashSet::new()).unwrap();
        let mut ensemble = Ensemble::new(0.1);

        let history = BoostTrainer::with_params(params(100, 2, 9))
            .train(&set, &mut ensemble)
            .unwrap();

        let losses = history.accepted_losses();
        assert!(!losses.is_empty());
        assert!(losses.windows(2).all(|w| w[1] < w[0]));
        assert!(history.steps()[0].accepted);
    }

    #[test]
    fn final_loss_matches_ensemble_predictions() {
        let samples = linear_samples(30);
        let set = TrainingSet::new(&samples, &HashSet::new()).unwrap();
        let mut ensemble = Ensemble::new(0.2);

        let history = BoostTrainer::with_params(params(25, 2, 3))
            .train(&set, &mut ensemble)
            .unwrap();

        let preds: Vec<FeatureVector> = samples.iter().map(|s| s.features.clone()).collect();
        let loss = Rmse.compute(ensemble.predict(&preds).view(), set.targets().view());
        assert_abs_diff_eq!(loss, history.best_loss().unwrap(), epsilon = 1e-9);
    }

    #[test]
    fn root_feature_alternates_between_two_features() {
        // With two features, the exclusion rule forces alternation at the root.
        let samples = linear_samples(40);
        let set = TrainingSet::new(&samples, &HashSet::new()).unwrap();
        let mut ensemble = Ensemble::new(0.1);

        let history = BoostTrainer::with_params(params(20, 2, 5))
            .train(&set, &mut ensemble)
            .unwrap();

        for pair in history.steps().windows(2) {
            assert_ne!(pair[0].feature, pair[1].feature);
        }
    }

    #[test]
    fn constant_features_give_global_mean() {
        let samples: Vec<TrainingSample> = [0.0, 1.0, 1.0, 0.0]
            .iter()
            .map(|&y| TrainingSample::new(FeatureVector::new().with("c", 7.0), y))
            .collect();
        let set = TrainingSet::new(&samples, &HashSet::new()).unwrap();
        let mut ensemble = Ensemble::new(1.0);

        let history = BoostTrainer::with_params(params(5, 3, 0))
            .train(&set, &mut ensemble)
            .unwrap();

        assert_eq!(history.dropped_features(), &["c".to_string()]);
        assert_eq!(ensemble.n_trees(), 1);
        assert_abs_diff_eq!(ensemble.predict_row(&FeatureVector::new()), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn resumed_call_accepts_its_first_step() {
        let samples: Vec<TrainingSample> = [(1.0, 0.0), (2.0, 0.0), (10.0, 5.0), (11.0, 5.0)]
            .iter()
            .map(|&(x, y)| TrainingSample::new(FeatureVector::new().with("x", x), y))
            .collect();
        let set = TrainingSet::new(&samples, &HashSet::new()).unwrap();

        for seed in 0..8 {
            let mut ensemble = Ensemble::new(1.0);
            let trainer = BoostTrainer::with_params(params(1, 1, seed));
            trainer.train(&set, &mut ensemble).unwrap();
            assert_eq!(ensemble.n_trees(), 1);

            let resumed = trainer.train(&set, &mut ensemble).unwrap();
            assert!(resumed.steps()[0].accepted, "seed {seed}");
            assert_eq!(ensemble.n_trees(), 2);
        }
    }

    #[test]
    fn zero_steps_leaves_ensemble_untouched() {
        let samples = linear_samples(5);
        let set = TrainingSet::new(&samples, &HashSet::new()).unwrap();
        let mut ensemble = Ensemble::new(0.07);

        let history = BoostTrainer::with_params(params(0, 2, 0))
            .train(&set, &mut ensemble)
            .unwrap();
        assert!(ensemble.is_empty());
        assert!(history.steps().is_empty());
        assert_eq!(history.best_loss(), None);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let samples = linear_samples(5);
        let set = TrainingSet::new(&samples, &HashSet::new()).unwrap();
        let mut ensemble = Ensemble::new(0.07);

        let err = BoostTrainer::with_params(params(3, 0, 0))
            .train(&set, &mut ensemble)
            .unwrap_err();
        assert!(matches!(err, TrainError::Config(ConfigError::InvalidTreeDepth(0))));
    }
}
