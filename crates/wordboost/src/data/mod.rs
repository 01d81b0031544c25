//! Feature vectors, training samples and the columnar training set.

mod dataset;
mod features;

pub use dataset::{
    ColumnValues, DatasetError, FeatureColumn, FeatureType, TrainingSample, TrainingSet,
    DEFAULT_TARGET_NAME,
};
pub use features::{FeatureSource, FeatureValue, FeatureVector, FEATURE_ORDER};
