//! Named feature values and feature vectors.
//!
//! Trees reference features by name, so a [`FeatureVector`] is a sparse
//! name → value map. Missing entries read as numeric `0.0` or as the empty
//! category, never as an error.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Alignment-quality features produced by the suggestion engine, in the
/// order used for outward (positional) serialization.
pub const FEATURE_ORDER: [&str; 23] = [
    "sourceCorpusPermutationsFrequencyRatio",
    "targetCorpusPermutationsFrequencyRatio",
    "sourceAlignmentMemoryFrequencyRatio",
    "targetAlignmentMemoryFrequencyRatio",
    "frequencyRatioCorpusFiltered",
    "frequencyRatioAlignmentMemoryFiltered",
    "sourceCorpusLemmaPermutationsFrequencyRatio",
    "targetCorpusLemmaPermutationsFrequencyRatio",
    "sourceAlignmentMemoryLemmaFrequencyRatio",
    "targetAlignmentMemoryLemmaFrequencyRatio",
    "lemmaFrequencyRatioCorpusFiltered",
    "lemmaFrequencyRatioAlignmentMemoryFiltered",
    "ngramRelativeTokenDistance",
    "alignmentRelativeOccurrence",
    "alignmentPosition",
    "phrasePlausibility",
    "lemmaPhrasePlausibility",
    "ngramLength",
    "characterLength",
    "alignmentOccurrences",
    "lemmaAlignmentOccurrences",
    "uniqueness",
    "lemmaUniqueness",
];

// =============================================================================
// FeatureValue
// =============================================================================

/// A single feature value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Numeric value, compared with `<=` against a threshold.
    Numeric(f64),
    /// Categorical value, compared for equality against a category.
    Categorical(String),
}

impl FeatureValue {
    /// Numeric reading. Categorical values read as `0.0`.
    #[inline]
    pub fn as_numeric(&self) -> f64 {
        match self {
            Self::Numeric(v) => *v,
            Self::Categorical(_) => 0.0,
        }
    }

    /// Categorical reading. Numeric values are rendered in decimal.
    #[inline]
    pub fn as_category(&self) -> Cow<'_, str> {
        match self {
            Self::Numeric(v) => Cow::Owned(v.to_string()),
            Self::Categorical(c) => Cow::Borrowed(c.as_str()),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl From<f32> for FeatureValue {
    fn from(value: f32) -> Self {
        Self::Numeric(value as f64)
    }
}

impl From<i32> for FeatureValue {
    fn from(value: i32) -> Self {
        Self::Numeric(value as f64)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        Self::Categorical(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        Self::Categorical(value)
    }
}

// =============================================================================
// FeatureSource
// =============================================================================

/// Read access to named feature values of one row.
///
/// Trees only ever read rows through this trait, so callers can score their
/// own row types without converting to [`FeatureVector`].
pub trait FeatureSource {
    /// Numeric value of `name`, `0.0` when absent.
    fn numeric(&self, name: &str) -> f64;

    /// Categorical value of `name`, `""` when absent.
    fn category(&self, name: &str) -> Cow<'_, str>;
}

impl<T: FeatureSource + ?Sized> FeatureSource for &T {
    #[inline]
    fn numeric(&self, name: &str) -> f64 {
        (**self).numeric(name)
    }

    #[inline]
    fn category(&self, name: &str) -> Cow<'_, str> {
        (**self).category(name)
    }
}

// =============================================================================
// FeatureVector
// =============================================================================

/// Mapping from feature name to value.
///
/// Backed by a `BTreeMap` so iteration (and therefore the feature universe
/// seen by training) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: BTreeMap<String, FeatureValue>,
}

impl FeatureVector {
    /// Create an empty feature vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the engine's score map, keeping only [`FEATURE_ORDER`]
    /// names and defaulting absent ones to `0.0`.
    pub fn from_scores<'a, I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let scores: BTreeMap<&str, f64> = scores.into_iter().collect();
        FEATURE_ORDER
            .iter()
            .map(|&name| (name, scores.get(name).copied().unwrap_or(0.0)))
            .collect()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Remove a value, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<FeatureValue> {
        self.values.remove(name)
    }

    /// Raw lookup without defaulting.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.values.get(name)
    }

    /// Number of explicitly set features.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over explicitly set features in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Feature names in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Numeric values laid out in [`FEATURE_ORDER`] order.
    pub fn to_ordered(&self) -> Vec<f64> {
        FEATURE_ORDER.iter().map(|name| self.numeric(name)).collect()
    }
}

impl FeatureSource for FeatureVector {
    #[inline]
    fn numeric(&self, name: &str) -> f64 {
        self.values.get(name).map_or(0.0, FeatureValue::as_numeric)
    }

    #[inline]
    fn category(&self, name: &str) -> Cow<'_, str> {
        self.values
            .get(name)
            .map_or(Cow::Borrowed(""), FeatureValue::as_category)
    }
}

impl<K: Into<String>, V: Into<FeatureValue>> FromIterator<(K, V)> for FeatureVector {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_features_read_as_defaults() {
        let fv = FeatureVector::new().with("x", 2.5);
        assert_eq!(fv.numeric("x"), 2.5);
        assert_eq!(fv.numeric("absent"), 0.0);
        assert_eq!(fv.category("absent"), "");
    }

    #[test]
    fn cross_kind_reads() {
        let fv = FeatureVector::new().with("gender", "f").with("age", 3);
        assert_eq!(fv.numeric("gender"), 0.0);
        assert_eq!(fv.category("age"), "3");
        assert_eq!(fv.category("gender"), "f");
    }

    #[test]
    fn from_scores_keeps_only_known_features() {
        let fv = FeatureVector::from_scores([("phrasePlausibility", 0.75), ("confidence", 9.0)]);
        assert_eq!(fv.len(), FEATURE_ORDER.len());
        assert!(fv.get("confidence").is_none());
        assert_eq!(fv.numeric("phrasePlausibility"), 0.75);
        assert_eq!(fv.numeric("uniqueness"), 0.0);
    }

    #[test]
    fn to_ordered_follows_feature_order() {
        let fv = FeatureVector::new()
            .with("lemmaUniqueness", 3.0)
            .with("sourceCorpusPermutationsFrequencyRatio", 1.0);
        let ordered = fv.to_ordered();
        assert_eq!(ordered.len(), FEATURE_ORDER.len());
        assert_eq!(ordered[0], 1.0);
        assert_eq!(ordered[FEATURE_ORDER.len() - 1], 3.0);
        assert!(ordered[1..FEATURE_ORDER.len() - 1].iter().all(|&v| v == 0.0));
    }
}
