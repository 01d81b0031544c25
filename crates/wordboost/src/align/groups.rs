//! Connected-component grouping and size-bounded splitting of link graphs.

use std::collections::{BTreeMap, HashMap};

use super::graph::{Adjacency, Edge, NodeSpace};
use super::union_find::UnionFind;

/// Links strictly above this confidence connect tokens into one group.
pub const LINK_VALID_THRESHOLD: f64 = 0.5;

/// One connected component: member ids per side plus the links kept in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkGroup {
    sources: Vec<usize>,
    targets: Vec<usize>,
    links: Adjacency,
}

impl LinkGroup {
    fn add_links(&mut self, source: usize, edges: Vec<Edge>) {
        self.sources.push(source);
        for edge in &edges {
            if !self.targets.contains(&edge.target) {
                self.targets.push(edge.target);
            }
        }
        self.links.entry(source).or_default().extend(edges);
    }

    /// Source ids, in ascending order.
    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    /// Target ids, in order of first appearance.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    pub fn links(&self) -> &Adjacency {
        &self.links
    }

    pub fn n_links(&self) -> usize {
        self.links.values().map(Vec::len).sum()
    }

    /// Larger of the two sides.
    pub fn ngram_max_size(&self) -> usize {
        self.sources.len().max(self.targets.len())
    }

    /// Both sides have at least two members.
    fn is_many_to_many(&self) -> bool {
        self.sources.len() >= 2 && self.targets.len() >= 2
    }

    /// Weakest link whose source has another outgoing link and whose target
    /// has another incoming link in this group. Ties keep the first seen.
    fn weakest_expendable(&self) -> Option<(usize, usize)> {
        let mut incoming: HashMap<usize, usize> = HashMap::new();
        for edge in self.links.values().flatten() {
            *incoming.entry(edge.target).or_insert(0) += 1;
        }

        let mut weakest: Option<(usize, usize, f64)> = None;
        for (&source, edges) in &self.links {
            if edges.len() < 2 {
                continue;
            }
            for edge in edges {
                if incoming[&edge.target] < 2 {
                    continue;
                }
                if weakest.map_or(true, |(_, _, c)| edge.confidence < c) {
                    weakest = Some((source, edge.target, edge.confidence));
                }
            }
        }
        weakest.map(|(s, t, _)| (s, t))
    }

    /// This group's links minus every `source -> target` edge.
    fn without_link(&self, source: usize, target: usize) -> Adjacency {
        self.links
            .iter()
            .map(|(&s, edges)| {
                let kept = edges
                    .iter()
                    .filter(|e| !(s == source && e.target == target))
                    .copied()
                    .collect();
                (s, kept)
            })
            .collect()
    }

    /// Remove the weakest expendable link and regroup what remains.
    ///
    /// Returns `None` when no link is expendable.
    pub fn split(&self, space: NodeSpace) -> Option<Vec<LinkGroup>> {
        let (source, target) = self.weakest_expendable()?;
        Some(determine_groups(&self.without_link(source, target), space))
    }
}

/// Partition linked tokens into components joined by links above
/// [`LINK_VALID_THRESHOLD`].
///
/// Every link, weak or strong, is kept when both ends land in the same
/// component. Groups come out ordered by their first source id.
pub fn determine_groups(adjacency: &Adjacency, space: NodeSpace) -> Vec<LinkGroup> {
    let mut uf = UnionFind::new(space.len());
    for (&source, edges) in adjacency {
        for edge in edges.iter().filter(|e| e.confidence > LINK_VALID_THRESHOLD) {
            uf.union(space.source_node(source), space.target_node(edge.target));
        }
    }

    let mut groups: Vec<LinkGroup> = Vec::new();
    let mut by_root: BTreeMap<usize, usize> = BTreeMap::new();
    for (&source, edges) in adjacency {
        let root = uf.find(space.source_node(source));
        let kept: Vec<Edge> = edges
            .iter()
            .filter(|e| uf.find(space.target_node(e.target)) == root)
            .copied()
            .collect();
        if kept.is_empty() {
            continue;
        }
        let idx = *by_root.entry(root).or_insert_with(|| {
            groups.push(LinkGroup::default());
            groups.len() - 1
        });
        groups[idx].add_links(source, kept);
    }
    groups
}

/// Group links, then split groups wider than `max_ngram_size` until they fit
/// or contain no expendable link.
pub fn break_into_groups(
    adjacency: &Adjacency,
    space: NodeSpace,
    max_ngram_size: usize,
) -> Vec<LinkGroup> {
    let mut pending = determine_groups(adjacency, space);
    pending.reverse();

    let mut done = Vec::new();
    while let Some(group) = pending.pop() {
        if group.ngram_max_size() <= max_ngram_size || !group.is_many_to_many() {
            done.push(group);
            continue;
        }
        match group.split(space) {
            Some(parts) => {
                tracing::debug!(
                    sources = group.sources.len(),
                    targets = group.targets.len(),
                    parts = parts.len(),
                    "split oversized group"
                );
                pending.extend(parts.into_iter().rev());
            }
            None => {
                tracing::debug!(
                    sources = group.sources.len(),
                    targets = group.targets.len(),
                    "no expendable link, keeping oversized group"
                );
                done.push(group);
            }
        }
    }
    done
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(links: &[(usize, usize, f64)]) -> Adjacency {
        let mut adj = Adjacency::new();
        for &(s, t, confidence) in links {
            adj.entry(s).or_default().push(Edge { target: t, confidence });
        }
        adj
    }

    fn space(n: usize) -> NodeSpace {
        NodeSpace { n_sources: n, n_targets: n }
    }

    #[test]
    fn weak_links_do_not_connect() {
        let adj = adjacency(&[(0, 0, 0.9), (1, 1, 0.9), (0, 1, 0.3)]);
        let groups = determine_groups(&adj, space(2));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].sources(), &[0]);
        assert_eq!(groups[0].n_links(), 1);
    }

    #[test]
    fn weak_link_inside_component_is_readmitted() {
        let adj = adjacency(&[(0, 0, 0.9), (1, 0, 0.8), (1, 1, 0.9), (0, 1, 0.2)]);
        let groups = determine_groups(&adj, space(2));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].n_links(), 4);
    }

    #[test]
    fn link_at_threshold_is_weak() {
        let adj = adjacency(&[(0, 0, LINK_VALID_THRESHOLD)]);
        assert!(determine_groups(&adj, space(1)).is_empty());
    }

    #[test]
    fn split_removes_weakest_expendable() {
        // 2x2 complete, weakest is 0 -> 1
        let adj = adjacency(&[(0, 0, 0.9), (0, 1, 0.6), (1, 0, 0.7), (1, 1, 0.9)]);
        let group = determine_groups(&adj, space(2)).remove(0);
        assert_eq!(group.weakest_expendable(), Some((0, 1)));

        let parts = group.split(space(2)).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].n_links(), 3);
    }

    #[test]
    fn star_has_no_expendable_link() {
        let adj = adjacency(&[(0, 0, 0.9), (0, 1, 0.9), (0, 2, 0.9)]);
        let group = determine_groups(&adj, space(3)).remove(0);
        assert!(group.split(space(3)).is_none());
    }

    #[test]
    fn chain_splits_until_one_sided() {
        // s0-t0-s1-t1-s2, ties broken by first seen: s1 -> t0 goes first
        let adj = adjacency(&[(0, 0, 0.9), (1, 0, 0.9), (1, 1, 0.9), (2, 1, 0.9)]);
        let groups = break_into_groups(&adj, space(3), 1);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].sources(), &[0]);
        assert_eq!(groups[1].sources(), &[1, 2]);
        assert_eq!(groups[1].targets(), &[1]);
        assert!(groups.iter().all(|g| g.ngram_max_size() <= 1 || !g.is_many_to_many()));
    }

    #[test]
    fn one_to_many_is_never_split() {
        let adj = adjacency(&[(0, 0, 0.9), (0, 1, 0.9), (0, 2, 0.9), (0, 3, 0.9)]);
        let groups = break_into_groups(&adj, space(4), 2);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].targets().len(), 4);
    }
}
