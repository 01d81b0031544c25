//! Training progress logging.
//!
//! [`TrainingLogger`] emits `tracing` events gated by a [`Verbosity`] level,
//! so a silent trainer costs nothing beyond a comparison.

use std::time::Instant;

use super::history::{StepRecord, TrainingHistory};

/// Verbosity level for training output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Dropped features and degenerate trees.
    Warning,
    /// Per-step progress.
    Info,
    /// Rejected steps as well.
    Debug,
}

/// Structured logger for a single training run.
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    started: Option<Instant>,
    n_steps: usize,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity, started: None, n_steps: 0 }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn start_training(&mut self, n_steps: usize, n_rows: usize, n_features: usize) {
        self.started = Some(Instant::now());
        self.n_steps = n_steps;
        if self.verbosity >= Verbosity::Info {
            tracing::info!(n_steps, n_rows, n_features, "starting boosting");
        }
    }

    pub fn log_dropped_feature(&self, feature: &str) {
        if self.verbosity >= Verbosity::Warning {
            tracing::warn!(feature, "dropping constant feature");
        }
    }

    pub fn log_leaf_only_tree(&self, step: usize) {
        if self.verbosity >= Verbosity::Warning {
            tracing::warn!(step, "no candidate features, tree is a single leaf");
        }
    }

    /// Accepted steps at `Info`, rejected ones at `Debug`.
    pub fn log_step(&self, record: &StepRecord) {
        let level = if record.accepted { Verbosity::Info } else { Verbosity::Debug };
        if self.verbosity < level {
            return;
        }
        let feature = record.feature.as_deref().unwrap_or("-");
        let split = record
            .split
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        if record.accepted {
            tracing::info!(step = record.step, loss = record.loss, feature, %split, "step accepted");
        } else {
            tracing::debug!(step = record.step, loss = record.loss, feature, %split, "step rejected");
        }
    }

    pub fn finish_training(&self, history: &TrainingHistory) {
        if self.verbosity < Verbosity::Info {
            return;
        }
        let elapsed_ms = self
            .started
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);
        tracing::info!(
            n_steps = self.n_steps,
            accepted = history.n_accepted(),
            best_loss = history.best_loss().unwrap_or(f64::NAN),
            elapsed_ms,
            "boosting finished"
        );
    }
}
