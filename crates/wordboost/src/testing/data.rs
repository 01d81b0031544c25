//! Synthetic datasets and sentence pairs.

use rand::prelude::*;

use crate::align::{CandidatePrediction, ScoredLink, Token};
use crate::data::{FeatureVector, TrainingSample};

/// Regression samples over numeric features `f0..f{cols}`.
///
/// The label is a fixed random linear combination of the features plus
/// uniform noise in `[-noise, noise]`.
pub fn synthetic_samples(rows: usize, cols: usize, seed: u64, noise: f64) -> Vec<TrainingSample> {
    let mut rng = StdRng::seed_from_u64(seed);
    let weights: Vec<f64> = (0..cols).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect();

    (0..rows)
        .map(|_| {
            let mut features = FeatureVector::new();
            let mut label = 0.0;
            for (c, w) in weights.iter().enumerate() {
                let x: f64 = rng.gen();
                label += w * x;
                features.insert(format!("f{c}"), x);
            }
            if noise > 0.0 {
                label += (rng.gen::<f64>() * 2.0 - 1.0) * noise;
            }
            TrainingSample::new(features, label)
        })
        .collect()
}

/// Unlabelled rows drawn like [`synthetic_samples`].
pub fn random_feature_vectors(rows: usize, cols: usize, seed: u64) -> Vec<FeatureVector> {
    synthetic_samples(rows, cols, seed, 0.0)
        .into_iter()
        .map(|s| s.features)
        .collect()
}

/// Sentence of `len` tokens `w0 w1 ...` with a repeated word every `repeat`
/// positions, so occurrence counters get exercised.
pub fn sentence(prefix: &str, len: usize, repeat: usize) -> Vec<Token> {
    let words: Vec<String> = (0..len)
        .map(|i| {
            if repeat > 0 && i % repeat == 0 {
                format!("{prefix}_rep")
            } else {
                format!("{prefix}{i}")
            }
        })
        .collect();
    Token::sentence(words.iter().map(String::as_str))
}

/// Random links between two sentences.
///
/// Every source token links to its diagonal partner with high confidence and
/// to `fanout` random targets with uniform confidence.
pub fn random_links(source: &[Token], target: &[Token], fanout: usize, seed: u64) -> Vec<ScoredLink> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut links = Vec::new();
    if target.is_empty() {
        return links;
    }
    for (i, s) in source.iter().enumerate() {
        let diagonal = &target[i.min(target.len() - 1)];
        links.push(ScoredLink::new(s.token_ref(), diagonal.token_ref(), 0.6 + 0.4 * rng.gen::<f64>()));
        for _ in 0..fanout {
            let t = &target[rng.gen_range(0..target.len())];
            links.push(ScoredLink::new(s.token_ref(), t.token_ref(), rng.gen()));
        }
    }
    links
}

/// Every 1:1 candidate between two sentences, with a `diagonal` feature of
/// `1.0` on the diagonal and a random `noise` feature.
pub fn all_pairs_candidates(source: &[Token], target: &[Token], seed: u64) -> Vec<CandidatePrediction> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut candidates = Vec::with_capacity(source.len() * target.len());
    for s in source {
        for t in target {
            let features = FeatureVector::new()
                .with("diagonal", if s.position == t.position { 1.0 } else { 0.0 })
                .with("noise", rng.gen::<f64>());
            candidates.push(CandidatePrediction::new(vec![s.clone()], vec![t.clone()], features));
        }
    }
    candidates
}
