//! Per-step record of a boosting run.

use crate::repr::Split;

/// Outcome of one boosting step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub step: usize,
    /// Loss of the candidate output, whether or not it was accepted.
    pub loss: f64,
    pub accepted: bool,
    /// Root split feature of the candidate tree.
    pub feature: Option<String>,
    pub split: Option<Split>,
}

/// Everything a training call observed, in step order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    steps: Vec<StepRecord>,
    dropped_features: Vec<String>,
}

impl TrainingHistory {
    pub(crate) fn new(dropped_features: Vec<String>) -> Self {
        Self { steps: Vec::new(), dropped_features }
    }

    pub(crate) fn push(&mut self, record: StepRecord) {
        self.steps.push(record);
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Features pruned as constant before the first step.
    pub fn dropped_features(&self) -> &[String] {
        &self.dropped_features
    }

    pub fn n_accepted(&self) -> usize {
        self.steps.iter().filter(|s| s.accepted).count()
    }

    /// Losses of accepted steps; non-increasing by construction.
    pub fn accepted_losses(&self) -> Vec<f64> {
        self.steps
            .iter()
            .filter(|s| s.accepted)
            .map(|s| s.loss)
            .collect()
    }

    /// Loss of the last accepted step.
    pub fn best_loss(&self) -> Option<f64> {
        self.steps.iter().rev().find(|s| s.accepted).map(|s| s.loss)
    }
}
