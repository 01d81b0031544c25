//! Candidate predictions: scoring, grouping and training-sample harvesting.
//!
//! The collaborator proposes [`CandidatePrediction`]s for a sentence pair,
//! each with a feature vector. A [`ConfidenceScorer`] (usually a trained
//! [`Booster`]) turns the features into confidences, and [`NgramAligner`]
//! feeds the scored 1:1 candidates to the [`Grouper`].

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::{FeatureSource, FeatureVector, TrainingSample};
use crate::model::Booster;
use crate::repr::Ensemble;
use crate::utils::Parallelism;

use super::error::GroupingError;
use super::grouper::{AlignmentGroup, Grouper};
use super::token::{ScoredLink, Side, Token, TokenRef};

/// Fraction of incorrect candidates kept as negative training samples.
pub const DEFAULT_INCORRECT_KEEP_RATIO: f64 = 0.1;

/// A proposed source n-gram to target n-gram correspondence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePrediction {
    pub source: Vec<Token>,
    pub target: Vec<Token>,
    pub features: FeatureVector,
    /// Set by [`ConfidenceScorer::score_predictions`].
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl CandidatePrediction {
    pub fn new(source: Vec<Token>, target: Vec<Token>, features: FeatureVector) -> Self {
        Self { source, target, features, confidence: None }
    }

    /// Exactly one token on each side.
    pub fn is_single_token(&self) -> bool {
        self.source.len() == 1 && self.target.len() == 1
    }

    /// The scored link of a 1:1 prediction.
    pub fn to_link(&self) -> Result<ScoredLink, GroupingError> {
        let (source, target) = match (self.source.as_slice(), self.target.as_slice()) {
            ([s], [t]) => (s, t),
            _ => {
                return Err(GroupingError::MultiTokenPrediction {
                    n_source: self.source.len(),
                    n_target: self.target.len(),
                })
            }
        };
        let confidence = self.confidence.ok_or_else(|| GroupingError::UnscoredPrediction {
            source_token: source.token_ref(),
            target_token: target.token_ref(),
        })?;
        Ok(ScoredLink::new(source.token_ref(), target.token_ref(), confidence))
    }
}

// =============================================================================
// Scoring
// =============================================================================

/// Anything that maps a feature vector to a confidence.
pub trait ConfidenceScorer {
    fn confidence(&self, features: &FeatureVector) -> f64;

    /// Score every prediction, then order them by descending confidence.
    fn score_predictions(&self, predictions: &mut [CandidatePrediction]) {
        for prediction in predictions.iter_mut() {
            prediction.confidence = Some(self.confidence(&prediction.features));
        }
        predictions.sort_by(|a, b| {
            let a = a.confidence.unwrap_or(f64::NEG_INFINITY);
            let b = b.confidence.unwrap_or(f64::NEG_INFINITY);
            b.total_cmp(&a)
        });
    }

    /// Drop multi-token predictions and score the rest.
    fn score_single_token_predictions(
        &self,
        predictions: Vec<CandidatePrediction>,
    ) -> Vec<CandidatePrediction> {
        let mut singles: Vec<CandidatePrediction> = predictions
            .into_iter()
            .filter(CandidatePrediction::is_single_token)
            .collect();
        self.score_predictions(&mut singles);
        singles
    }
}

impl ConfidenceScorer for Booster {
    #[inline]
    fn confidence(&self, features: &FeatureVector) -> f64 {
        self.predict_single(features)
    }
}

impl ConfidenceScorer for Ensemble {
    #[inline]
    fn confidence(&self, features: &FeatureVector) -> f64 {
        self.predict_row(features)
    }
}

impl<T: ConfidenceScorer + ?Sized> ConfidenceScorer for &T {
    #[inline]
    fn confidence(&self, features: &FeatureVector) -> f64 {
        (**self).confidence(features)
    }
}

// =============================================================================
// Grouping
// =============================================================================

/// Group scored 1:1 predictions of one sentence pair.
///
/// Token tables are taken from the predictions themselves. One identity
/// seen at two different positions is a [`GroupingError::DuplicateToken`].
pub fn group_predictions(
    grouper: &Grouper,
    predictions: &[CandidatePrediction],
) -> Result<Vec<AlignmentGroup>, GroupingError> {
    let links = predictions
        .iter()
        .map(CandidatePrediction::to_link)
        .collect::<Result<Vec<_>, _>>()?;

    let source_tokens = unique_tokens(Side::Source, predictions.iter().flat_map(|p| &p.source))?;
    let target_tokens = unique_tokens(Side::Target, predictions.iter().flat_map(|p| &p.target))?;
    grouper.build(&source_tokens, &target_tokens, &links)
}

fn unique_tokens<'t>(
    side: Side,
    tokens: impl Iterator<Item = &'t Token>,
) -> Result<Vec<Token>, GroupingError> {
    let mut positions: HashMap<TokenRef, usize> = HashMap::new();
    let mut unique = Vec::new();
    for token in tokens {
        let key = token.token_ref();
        match positions.get(&key) {
            Some(&position) if position != token.position => {
                return Err(GroupingError::DuplicateToken { side, token: key });
            }
            Some(_) => {}
            None => {
                positions.insert(key, token.position);
                unique.push(token.clone());
            }
        }
    }
    Ok(unique)
}

/// Scorer plus grouper: candidate predictions in, n-gram alignments out.
#[derive(Debug, Clone)]
pub struct NgramAligner<S = Booster> {
    scorer: S,
    grouper: Grouper,
}

impl<S: ConfidenceScorer> NgramAligner<S> {
    pub fn new(scorer: S, grouper: Grouper) -> Self {
        Self { scorer, grouper }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn grouper(&self) -> &Grouper {
        &self.grouper
    }

    /// Align one sentence pair. Multi-token candidates are ignored.
    pub fn align(
        &self,
        candidates: Vec<CandidatePrediction>,
    ) -> Result<Vec<AlignmentGroup>, GroupingError> {
        let scored = self.scorer.score_single_token_predictions(candidates);
        group_predictions(&self.grouper, &scored)
    }

    /// Align independent sentence pairs, in parallel when allowed.
    ///
    /// Results keep the input order. The first failing pair aborts the batch.
    pub fn align_many(
        &self,
        pairs: Vec<Vec<CandidatePrediction>>,
        parallelism: Parallelism,
    ) -> Result<Vec<Vec<AlignmentGroup>>, GroupingError>
    where
        S: Sync,
    {
        parallelism
            .maybe_par_map(pairs, |candidates| self.align(candidates))
            .into_iter()
            .collect()
    }
}

// =============================================================================
// Training data
// =============================================================================

/// Turn judged 1:1 predictions into training samples.
///
/// Correct predictions become label `1.0` samples. Incorrect ones are kept
/// with probability `incorrect_keep_ratio` and labelled `0.0`.
pub fn collect_training_samples<F, R>(
    predictions: &[CandidatePrediction],
    is_correct: F,
    incorrect_keep_ratio: f64,
    rng: &mut R,
) -> Vec<TrainingSample>
where
    F: Fn(&CandidatePrediction) -> bool,
    R: Rng,
{
    predictions
        .iter()
        .filter(|p| p.is_single_token())
        .filter_map(|p| {
            if is_correct(p) {
                Some(TrainingSample::new(p.features.clone(), 1.0))
            } else if rng.gen::<f64>() < incorrect_keep_ratio {
                Some(TrainingSample::new(p.features.clone(), 0.0))
            } else {
                None
            }
        })
        .collect()
}

/// Numeric score of one named feature; handy as a baseline scorer.
#[derive(Debug, Clone)]
pub struct FeatureScorer(pub String);

impl ConfidenceScorer for FeatureScorer {
    fn confidence(&self, features: &FeatureVector) -> f64 {
        features.numeric(&self.0)
    }
}
