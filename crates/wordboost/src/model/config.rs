//! High-level booster configuration with builder pattern.
//!
//! # Example
//!
//! ```
//! use wordboost::model::BoostConfig;
//! use wordboost::training::Verbosity;
//!
//! // All defaults
//! let config = BoostConfig::builder().build().unwrap();
//! assert_eq!(config.learning_rate, 0.07);
//!
//! let config = BoostConfig::builder()
//!     .n_steps(200)
//!     .tree_depth(4)
//!     .categorical_features(vec!["gender".to_string()])
//!     .verbosity(Verbosity::Info)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.tree_depth, 4);
//! ```

use bon::Builder;

use crate::training::{BoostParams, Verbosity};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Learning rate must be positive and finite.
    #[error("learning_rate must be positive, got {0}")]
    InvalidLearningRate(f64),

    /// Trees need at least one level.
    #[error("tree_depth must be at least 1, got {0}")]
    InvalidTreeDepth(usize),
}

// =============================================================================
// BoostConfig
// =============================================================================

/// Configuration for training a [`Booster`](super::Booster).
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct BoostConfig {
    /// Shrinkage applied to every tree. Default: 0.07.
    #[builder(default = 0.07)]
    pub learning_rate: f64,

    /// Number of boosting steps. Default: 1000.
    #[builder(default = 1000)]
    pub n_steps: usize,

    /// Levels per tree. Default: 2.
    #[builder(default = 2)]
    pub tree_depth: usize,

    /// Features split by category equality instead of a threshold.
    #[builder(default)]
    pub categorical_features: Vec<String>,

    /// Random seed. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: boost_config_builder::IsComplete> BoostConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// - `learning_rate <= 0` or non-finite
    /// - `tree_depth == 0`
    pub fn build(self) -> Result<BoostConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl BoostConfig {
    /// Settings used to score word-alignment candidates: deep trees over
    /// the alignment-quality features.
    pub fn for_alignment() -> Self {
        Self::builder()
            .n_steps(1000)
            .tree_depth(12)
            .build()
            .expect("alignment preset is valid")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        if self.tree_depth == 0 {
            return Err(ConfigError::InvalidTreeDepth(self.tree_depth));
        }
        Ok(())
    }

    /// Convert to trainer params.
    pub fn to_trainer_params(&self) -> BoostParams {
        BoostParams {
            n_steps: self.n_steps,
            tree_depth: self.tree_depth,
            seed: self.seed,
            verbosity: self.verbosity,
        }
    }
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self::builder().build().expect("default config is valid")
    }
}

// =============================================================================
// Tests
// =============================================================================
