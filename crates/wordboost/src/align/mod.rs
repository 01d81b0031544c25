//! Word-alignment grouping.
//!
//! Scored token-to-token links of one sentence pair are assembled into a
//! bipartite [`LinkGraph`], partitioned into connected components by
//! [`determine_groups`], split down towards a maximum n-gram size by
//! [`break_into_groups`] and finally materialised as position-ordered
//! [`AlignmentGroup`]s by the [`Grouper`].
//!
//! The [`pipeline`] module connects this to a confidence scorer.

mod error;
mod graph;
mod grouper;
mod groups;
pub mod pipeline;
mod token;
mod union_find;

pub use error::GroupingError;
pub use graph::{Adjacency, Edge, LinkGraph, NodeSpace};
pub use grouper::{AlignmentGroup, Grouper, DEFAULT_MAX_NGRAM_SIZE};
pub use groups::{break_into_groups, determine_groups, LinkGroup, LINK_VALID_THRESHOLD};
pub use pipeline::{
    collect_training_samples, group_predictions, CandidatePrediction, ConfidenceScorer,
    FeatureScorer, NgramAligner, DEFAULT_INCORRECT_KEEP_RATIO,
};
pub use token::{ScoredLink, Side, Token, TokenRef};
pub use union_find::UnionFind;
