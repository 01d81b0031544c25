//! wordboost: confidence scoring and n-gram grouping for word alignment.
//!
//! Two components, used leaves first:
//!
//! - a randomized gradient-boosted regression-tree [`Booster`] that turns
//!   alignment-quality feature vectors into confidences, and
//! - a link [`Grouper`](align::Grouper) that turns token-to-token confidences
//!   into many-to-many alignment groups bounded by a maximum n-gram size.
//!
//! # Key Types
//!
//! - [`Booster`] / [`BoostConfig`] - Train and score
//! - [`TrainingSample`] / [`FeatureVector`] - Training data
//! - [`align::Grouper`] / [`align::AlignmentGroup`] - Link grouping
//! - [`align::NgramAligner`] - Scoring plus grouping for one sentence pair
//!
//! # Training
//!
//! ```
//! use wordboost::{BoostConfig, Booster, FeatureVector, TrainingSample};
//!
//! let samples: Vec<TrainingSample> = (0..20)
//!     .map(|i| {
//!         let features = FeatureVector::new().with("ratio", i as f64);
//!         TrainingSample::new(features, if i < 10 { 0.0 } else { 1.0 })
//!     })
//!     .collect();
//!
//! let config = BoostConfig::builder()
//!     .learning_rate(0.5)
//!     .n_steps(50)
//!     .build()
//!     .unwrap();
//! let (booster, history) = Booster::train(&samples, config).unwrap();
//!
//! assert!(history.n_accepted() > 0);
//! let low = booster.predict_single(&FeatureVector::new().with("ratio", 2.0));
//! let high = booster.predict_single(&FeatureVector::new().with("ratio", 18.0));
//! assert!(high > low);
//! ```

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod align;
pub mod data;
pub mod model;
pub mod persist;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// High-level model types
pub use model::{BoostConfig, Booster, ConfigError};

// Training types
pub use training::{MetricFn, Rmse, TrainError, TrainingHistory, Verbosity};

// Data types
pub use data::{DatasetError, FeatureValue, FeatureVector, TrainingSample, FEATURE_ORDER};

// Grouping types
pub use align::{AlignmentGroup, Grouper, GroupingError, NgramAligner, ScoredLink, Token};

// Shared utilities
pub use utils::{run_with_threads, Parallelism};
