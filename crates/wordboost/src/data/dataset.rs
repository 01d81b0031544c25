//! Training samples and the columnar training set.
//!
//! [`TrainingSet`] borrows the caller's samples, derives one column per
//! feature and prunes constant features once, up front. Tree induction works
//! on the columns; ensemble prediction during training reads the original
//! [`FeatureVector`]s so earlier trees see exactly what scoring will see.

use std::collections::{BTreeSet, HashSet};

use ndarray::Array1;

use super::features::{FeatureSource, FeatureValue, FeatureVector};

/// Default name of the label field in flat records.
pub const DEFAULT_TARGET_NAME: &str = "output";

// =============================================================================
// DatasetError
// =============================================================================

/// Errors raised while assembling a training set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    /// Training requires at least one sample.
    #[error("training set is empty")]
    Empty,

    /// A record has no value under the target name.
    #[error("row {row} has no target field `{target}`")]
    MissingTarget { row: usize, target: String },

    /// A record's target value is categorical.
    #[error("row {row} has a non-numeric target")]
    NonNumericTarget { row: usize },

    /// A target is NaN or infinite.
    #[error("row {row} has a non-finite target {value}")]
    NonFiniteTarget { row: usize, value: f64 },

    /// A numeric feature is NaN or infinite.
    #[error("row {row} has a non-finite value for feature `{feature}`")]
    NonFiniteFeature { row: usize, feature: String },
}

// =============================================================================
// TrainingSample
// =============================================================================

/// A feature vector plus its regression target (1.0 = correct alignment).
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub features: FeatureVector,
    pub label: f64,
}

impl TrainingSample {
    pub fn new(features: FeatureVector, label: f64) -> Self {
        Self { features, label }
    }

    /// Split a flat record into features and label.
    ///
    /// The target field is removed from the features so it can never be
    /// chosen as a split feature.
    pub fn from_record(
        mut record: FeatureVector,
        target_name: &str,
        row: usize,
    ) -> Result<Self, DatasetError> {
        let label = match record.remove(target_name) {
            Some(FeatureValue::Numeric(v)) => v,
            Some(FeatureValue::Categorical(_)) => {
                return Err(DatasetError::NonNumericTarget { row });
            }
            None => {
                return Err(DatasetError::MissingTarget {
                    row,
                    target: target_name.to_string(),
                });
            }
        };
        Ok(Self::new(record, label))
    }

    /// Convert a batch of flat records.
    pub fn from_records<I>(records: I, target_name: &str) -> Result<Vec<Self>, DatasetError>
    where
        I: IntoIterator<Item = FeatureVector>,
    {
        records
            .into_iter()
            .enumerate()
            .map(|(row, record)| Self::from_record(record, target_name, row))
            .collect()
    }
}

// =============================================================================
// Columns
// =============================================================================

/// Whether a feature is split numerically or by category equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureType {
    Numeric,
    Categorical,
}

/// Column values of one retained feature.
#[derive(Debug, Clone)]
pub enum ColumnValues {
    Numeric(Array1<f64>),
    Categorical(Vec<String>),
}

/// A retained (non-constant) feature column.
#[derive(Debug, Clone)]
pub struct FeatureColumn {
    pub name: String,
    pub values: ColumnValues,
}

impl FeatureColumn {
    pub fn feature_type(&self) -> FeatureType {
        match self.values {
            ColumnValues::Numeric(_) => FeatureType::Numeric,
            ColumnValues::Categorical(_) => FeatureType::Categorical,
        }
    }

    /// A categorical column needs two distinct values, a numeric one a
    /// non-zero range.
    fn is_constant(&self) -> bool {
        match &self.values {
            ColumnValues::Categorical(values) => {
                let first = values.first();
                values.iter().all(|v| Some(v) == first)
            }
            ColumnValues::Numeric(values) => {
                let (min, max) = values
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                        (lo.min(v), hi.max(v))
                    });
                values.is_empty() || max == min
            }
        }
    }
}

// =============================================================================
// TrainingSet
// =============================================================================

/// Columnar view of a batch of training samples.
#[derive(Debug, Clone)]
pub struct TrainingSet<'a> {
    samples: &'a [TrainingSample],
    targets: Array1<f64>,
    columns: Vec<FeatureColumn>,
    dropped: Vec<String>,
}

impl<'a> TrainingSet<'a> {
    /// Build the columnar set and prune constant features.
    ///
    /// Features named in `categorical` are split by equality; all others
    /// numerically. The feature universe is the union of names across all
    /// samples, in name order.
    pub fn new(
        samples: &'a [TrainingSample],
        categorical: &HashSet<String>,
    ) -> Result<Self, DatasetError> {
        if samples.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut targets = Array1::zeros(samples.len());
        for (row, sample) in samples.iter().enumerate() {
            if !sample.label.is_finite() {
                return Err(DatasetError::NonFiniteTarget { row, value: sample.label });
            }
            targets[row] = sample.label;
        }

        let universe: BTreeSet<&str> = samples
            .iter()
            .flat_map(|s| s.features.names())
            .collect();

        let mut columns = Vec::with_capacity(universe.len());
        let mut dropped = Vec::new();

        for name in universe {
            let values = if categorical.contains(name) {
                ColumnValues::Categorical(
                    samples
                        .iter()
                        .map(|s| s.features.category(name).into_owned())
                        .collect(),
                )
            } else {
                let mut column = Array1::zeros(samples.len());
                for (row, sample) in samples.iter().enumerate() {
                    let v = sample.features.numeric(name);
                    if !v.is_finite() {
                        return Err(DatasetError::NonFiniteFeature {
                            row,
                            feature: name.to_string(),
                        });
                    }
                    column[row] = v;
                }
                ColumnValues::Numeric(column)
            };

            let column = FeatureColumn { name: name.to_string(), values };
            if column.is_constant() {
                dropped.push(column.name);
            } else {
                columns.push(column);
            }
        }

        Ok(Self { samples, targets, columns, dropped })
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn samples(&self) -> &'a [TrainingSample] {
        self.samples
    }

    #[inline]
    pub fn features(&self, row: usize) -> &'a FeatureVector {
        &self.samples[row].features
    }

    #[inline]
    pub fn targets(&self) -> &Array1<f64> {
        &self.targets
    }

    /// Retained (non-constant) feature columns, in name order.
    #[inline]
    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Names of features pruned as constant.
    #[inline]
    pub fn dropped_features(&self) -> &[String] {
        &self.dropped
    }
}
