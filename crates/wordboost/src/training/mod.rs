//! Training infrastructure for the randomized booster.
//!
//! - [`TreeInducer`]: randomized regression-tree induction
//! - [`BoostTrainer`], [`BoostParams`]: residual boosting with an accept/reject gate
//! - [`MetricFn`], [`Rmse`]: the loss used by the gate
//! - [`TrainingHistory`], [`StepRecord`]: what each step did
//! - [`TrainingLogger`], [`Verbosity`]: structured logging

mod history;
mod induction;
mod logger;
mod metrics;
mod trainer;

pub use history::{StepRecord, TrainingHistory};
pub use induction::TreeInducer;
pub use logger::{TrainingLogger, Verbosity};
pub use metrics::{MetricFn, Rmse};
pub use trainer::{BoostParams, BoostTrainer, TrainError};
