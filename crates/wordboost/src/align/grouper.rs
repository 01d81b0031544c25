//! Scored links in, ordered n-gram alignment groups out.

use serde::{Deserialize, Serialize};

use super::error::GroupingError;
use super::graph::LinkGraph;
use super::groups::{break_into_groups, LinkGroup};
use super::token::{ScoredLink, Token};

/// Default upper bound on the tokens per side of a group.
pub const DEFAULT_MAX_NGRAM_SIZE: usize = 4;

/// A final alignment: source and target tokens in sentence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentGroup {
    pub source_tokens: Vec<Token>,
    pub target_tokens: Vec<Token>,
}

impl AlignmentGroup {
    fn from_link_group(group: &LinkGroup, graph: &LinkGraph) -> Self {
        let mut source_tokens: Vec<Token> = group
            .sources()
            .iter()
            .map(|&id| graph.source_token(id).clone())
            .collect();
        let mut target_tokens: Vec<Token> = group
            .targets()
            .iter()
            .map(|&id| graph.target_token(id).clone())
            .collect();
        source_tokens.sort_by_key(|t| t.position);
        target_tokens.sort_by_key(|t| t.position);
        Self { source_tokens, target_tokens }
    }

    pub fn is_one_to_one(&self) -> bool {
        self.source_tokens.len() == 1 && self.target_tokens.len() == 1
    }

    /// Larger of the two sides.
    pub fn ngram_size(&self) -> usize {
        self.source_tokens.len().max(self.target_tokens.len())
    }

    fn sort_key(&self) -> (usize, usize) {
        let first = |tokens: &[Token]| tokens.first().map_or(usize::MAX, |t| t.position);
        (first(&self.source_tokens), first(&self.target_tokens))
    }
}

/// Builds alignment groups from token-to-token confidences.
///
/// # Example
///
/// ```
/// use wordboost::align::{Grouper, ScoredLink, Token};
///
/// let source = Token::sentence(["das", "Haus"]);
/// let target = Token::sentence(["the", "house"]);
/// let links = vec![
///     ScoredLink::new(source[0].token_ref(), target[0].token_ref(), 0.9),
///     ScoredLink::new(source[1].token_ref(), target[1].token_ref(), 0.8),
/// ];
///
/// let groups = Grouper::default().build(&source, &target, &links).unwrap();
/// assert_eq!(groups.len(), 2);
/// assert!(groups.iter().all(|g| g.is_one_to_one()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grouper {
    max_ngram_size: usize,
}

impl Default for Grouper {
    fn default() -> Self {
        Self { max_ngram_size: DEFAULT_MAX_NGRAM_SIZE }
    }
}

impl Grouper {
    pub fn new(max_ngram_size: usize) -> Result<Self, GroupingError> {
        if max_ngram_size == 0 {
            return Err(GroupingError::InvalidNgramSize);
        }
        Ok(Self { max_ngram_size })
    }

    #[inline]
    pub fn max_ngram_size(&self) -> usize {
        self.max_ngram_size
    }

    /// Group `links` between the two sentences.
    ///
    /// Every link must resolve to a token of its side. Groups come back
    /// ordered by their first source position.
    pub fn build(
        &self,
        source_tokens: &[Token],
        target_tokens: &[Token],
        links: &[ScoredLink],
    ) -> Result<Vec<AlignmentGroup>, GroupingError> {
        let mut graph = LinkGraph::new(source_tokens, target_tokens)?;
        graph.add_links(links)?;
        Ok(self.group_graph(&graph))
    }

    /// Group an already assembled graph.
    pub fn group_graph(&self, graph: &LinkGraph) -> Vec<AlignmentGroup> {
        let groups = break_into_groups(graph.adjacency(), graph.node_space(), self.max_ngram_size);
        let mut out: Vec<AlignmentGroup> = groups
            .iter()
            .map(|group| AlignmentGroup::from_link_group(group, graph))
            .collect();
        out.sort_by_key(AlignmentGroup::sort_key);
        out
    }
}
