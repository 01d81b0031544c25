//! Bipartite link graph over interned tokens.
//!
//! Tokens are interned per side into dense ids. Source and target ids are
//! mapped into disjoint ranges of one union-find arena by [`NodeSpace`], so
//! identical text on both sides never collides.

use std::collections::{BTreeMap, HashMap};

use super::error::GroupingError;
use super::token::{ScoredLink, Side, Token, TokenRef};

/// Outgoing edge of a source token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: usize,
    pub confidence: f64,
}

/// Source id → outgoing edges. Ordered so grouping is deterministic.
pub type Adjacency = BTreeMap<usize, Vec<Edge>>;

/// Layout of source and target ids in the union-find arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpace {
    pub n_sources: usize,
    pub n_targets: usize,
}

impl NodeSpace {
    #[inline]
    pub fn len(&self) -> usize {
        self.n_sources + self.n_targets
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn source_node(&self, source: usize) -> usize {
        source
    }

    #[inline]
    pub fn target_node(&self, target: usize) -> usize {
        self.n_sources + target
    }
}

/// Token tables of one sentence pair plus the scored links between them.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    sources: Vec<Token>,
    targets: Vec<Token>,
    source_ids: HashMap<TokenRef, usize>,
    target_ids: HashMap<TokenRef, usize>,
    adjacency: Adjacency,
}

impl LinkGraph {
    /// Intern both sentences. Token identities must be unique per side.
    pub fn new(source_tokens: &[Token], target_tokens: &[Token]) -> Result<Self, GroupingError> {
        let mut graph = Self::default();
        for token in source_tokens {
            graph.intern(Side::Source, token)?;
        }
        for token in target_tokens {
            graph.intern(Side::Target, token)?;
        }
        Ok(graph)
    }

    fn intern(&mut self, side: Side, token: &Token) -> Result<usize, GroupingError> {
        let (table, ids) = match side {
            Side::Source => (&mut self.sources, &mut self.source_ids),
            Side::Target => (&mut self.targets, &mut self.target_ids),
        };
        let key = token.token_ref();
        if ids.contains_key(&key) {
            return Err(GroupingError::DuplicateToken { side, token: key });
        }
        let id = table.len();
        table.push(token.clone());
        ids.insert(key, id);
        Ok(id)
    }

    fn resolve(&self, side: Side, token: &TokenRef) -> Result<usize, GroupingError> {
        let ids = match side {
            Side::Source => &self.source_ids,
            Side::Target => &self.target_ids,
        };
        ids.get(token)
            .copied()
            .ok_or_else(|| GroupingError::UnresolvedToken { side, token: token.clone() })
    }

    /// Add one scored link; both ends must resolve.
    pub fn add_link(&mut self, link: &ScoredLink) -> Result<(), GroupingError> {
        if link.confidence.is_nan() {
            return Err(GroupingError::InvalidConfidence {
                source_token: link.source.clone(),
                target_token: link.target.clone(),
                confidence: link.confidence,
            });
        }
        let source = self.resolve(Side::Source, &link.source)?;
        let target = self.resolve(Side::Target, &link.target)?;
        self.adjacency
            .entry(source)
            .or_default()
            .push(Edge { target, confidence: link.confidence });
        Ok(())
    }

    pub fn add_links<'l, I>(&mut self, links: I) -> Result<(), GroupingError>
    where
        I: IntoIterator<Item = &'l ScoredLink>,
    {
        links.into_iter().try_for_each(|link| self.add_link(link))
    }

    #[inline]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    #[inline]
    pub fn node_space(&self) -> NodeSpace {
        NodeSpace {
            n_sources: self.sources.len(),
            n_targets: self.targets.len(),
        }
    }

    #[inline]
    pub fn source_token(&self, id: usize) -> &Token {
        &self.sources[id]
    }

    #[inline]
    pub fn target_token(&self, id: usize) -> &Token {
        &self.targets[id]
    }

    pub fn n_links(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}
