use super::token::{Side, TokenRef};

/// Boundary validation failures of the grouping stage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GroupingError {
    /// A link references a token missing from its sentence's token table.
    #[error("{side} token `{token}` is not in the sentence")]
    UnresolvedToken { side: Side, token: TokenRef },

    /// Two tokens of one sentence share the same identity.
    #[error("{side} token `{token}` appears more than once")]
    DuplicateToken { side: Side, token: TokenRef },

    /// A link confidence is NaN.
    #[error("link `{source_token}` -> `{target_token}` has confidence {confidence}")]
    InvalidConfidence {
        source_token: TokenRef,
        target_token: TokenRef,
        confidence: f64,
    },

    /// A prediction reached grouping without a confidence.
    #[error("prediction `{source_token}` -> `{target_token}` has not been scored")]
    UnscoredPrediction {
        source_token: TokenRef,
        target_token: TokenRef,
    },

    /// Only single-token to single-token predictions can be grouped.
    #[error("prediction has {n_source} source and {n_target} target tokens, expected 1:1")]
    MultiTokenPrediction { n_source: usize, n_target: usize },

    /// The n-gram bound must be at least 1.
    #[error("max_ngram_size must be at least 1")]
    InvalidNgramSize,
}
