//! High-level booster: train once, score many.

use std::collections::HashSet;

use ndarray::Array1;

use crate::data::{FeatureSource, FeatureVector, TrainingSample, TrainingSet};
use crate::repr::Ensemble;
use crate::training::{BoostTrainer, TrainError, TrainingHistory};
use crate::utils::{run_with_threads, Parallelism};

use super::BoostConfig;

/// Trained scoring model: an [`Ensemble`] plus the config that produced it.
///
/// The ensemble is a self-contained value; clone it or move it to another
/// thread freely.
#[derive(Debug, Clone)]
pub struct Booster {
    ensemble: Ensemble,
    config: BoostConfig,
}

impl Booster {
    /// An untrained booster (scores every row as `0.0`).
    pub fn new(config: BoostConfig) -> Self {
        let ensemble = Ensemble::new(config.learning_rate)
            .with_categorical_features(config.categorical_features.iter().cloned());
        Self { ensemble, config }
    }

    /// Wrap an existing ensemble, e.g. one loaded from disk.
    pub fn from_ensemble(ensemble: Ensemble) -> Self {
        let config = BoostConfig {
            learning_rate: ensemble.learning_rate(),
            categorical_features: ensemble.categorical_features().iter().cloned().collect(),
            ..BoostConfig::default()
        };
        Self { ensemble, config }
    }

    /// Train a new booster on labelled samples.
    pub fn train(
        samples: &[TrainingSample],
        config: BoostConfig,
    ) -> Result<(Self, TrainingHistory), TrainError> {
        config.validate()?;
        let mut booster = Self::new(config);
        let history = booster.continue_training(samples)?;
        Ok((booster, history))
    }

    /// Train on flat records whose label sits under `target_name`.
    pub fn train_records<I>(
        records: I,
        target_name: &str,
        config: BoostConfig,
    ) -> Result<(Self, TrainingHistory), TrainError>
    where
        I: IntoIterator<Item = FeatureVector>,
    {
        let samples = TrainingSample::from_records(records, target_name)?;
        Self::train(&samples, config)
    }

    /// Run another `n_steps` of boosting on top of the current ensemble.
    pub fn continue_training(
        &mut self,
        samples: &[TrainingSample],
    ) -> Result<TrainingHistory, TrainError> {
        let categorical: HashSet<String> =
            self.ensemble.categorical_features().iter().cloned().collect();
        let set = TrainingSet::new(samples, &categorical)?;
        let trainer = BoostTrainer::with_params(self.config.to_trainer_params());
        trainer.train(&set, &mut self.ensemble)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn ensemble(&self) -> &Ensemble {
        &self.ensemble
    }

    pub fn into_ensemble(self) -> Ensemble {
        self.ensemble
    }

    pub fn config(&self) -> &BoostConfig {
        &self.config
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Confidence for one row.
    #[inline]
    pub fn predict_single<S: FeatureSource + ?Sized>(&self, row: &S) -> f64 {
        self.ensemble.predict_row(row)
    }

    /// Confidences for a batch of rows.
    pub fn predict<S: FeatureSource>(&self, rows: &[S]) -> Array1<f64> {
        self.ensemble.predict(rows)
    }

    /// Batch prediction on the current rayon pool.
    pub fn predict_par<S: FeatureSource + Sync>(
        &self,
        rows: &[S],
        parallelism: Parallelism,
    ) -> Array1<f64> {
        self.ensemble.predict_par(rows, parallelism)
    }

    /// Batch prediction on a dedicated pool.
    ///
    /// `n_threads`: 0 = auto, 1 = sequential, >1 = exact count.
    pub fn predict_with_threads<S: FeatureSource + Sync>(
        &self,
        rows: &[S],
        n_threads: usize,
    ) -> Array1<f64> {
        run_with_threads(n_threads, |parallelism| {
            self.ensemble.predict_par(rows, parallelism)
        })
    }
}
