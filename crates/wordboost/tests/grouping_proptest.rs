//! Property-based tests for link grouping over arbitrary link sets.

use std::collections::{BTreeMap, HashSet};

use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

use wordboost::align::{
    determine_groups, AlignmentGroup, Grouper, LinkGraph, ScoredLink, Token, TokenRef,
    LINK_VALID_THRESHOLD,
};
use wordboost::testing::{assert_groups_disjoint, assert_groups_ordered};

// =============================================================================
// Arbitrary Sentence Pairs
// =============================================================================

/// Small vocabulary so repeated words (and occurrence counters) are common.
const VOCAB: [&str; 4] = ["a", "b", "c", "d"];

fn arb_sentence() -> impl Strategy<Value = Vec<Token>> {
    prop_vec(0..VOCAB.len(), 1..=8)
        .prop_map(|words| Token::sentence(words.into_iter().map(|w| VOCAB[w])))
}

/// Two sentences and a set of scored links between them, at most one link
/// per token pair.
fn arb_case() -> impl Strategy<Value = (Vec<Token>, Vec<Token>, Vec<ScoredLink>)> {
    (arb_sentence(), arb_sentence()).prop_flat_map(|(source, target)| {
        let (n_source, n_target) = (source.len(), target.len());
        prop_vec((0..n_source, 0..n_target, 0.0..=1.0f64), 0..=24).prop_map(move |raw| {
            let unique: BTreeMap<(usize, usize), f64> =
                raw.into_iter().map(|(s, t, c)| ((s, t), c)).collect();
            let links = unique
                .into_iter()
                .map(|((s, t), c)| ScoredLink::new(source[s].token_ref(), target[t].token_ref(), c))
                .collect();
            (source.clone(), target.clone(), links)
        })
    })
}

fn group_refs(group: &AlignmentGroup) -> (HashSet<TokenRef>, HashSet<TokenRef>) {
    (
        group.source_tokens.iter().map(Token::token_ref).collect(),
        group.target_tokens.iter().map(Token::token_ref).collect(),
    )
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Groups are non-empty, disjoint, ordered and individually connected;
    /// only one-sided groups may exceed the bound.
    #[test]
    fn groups_are_sound((source, target, links) in arb_case(), max in 1usize..=4) {
        let groups = Grouper::new(max).unwrap().build(&source, &target, &links).unwrap();
        assert_groups_ordered(&groups);
        assert_groups_disjoint(&groups);

        for group in &groups {
            prop_assert!(!group.source_tokens.is_empty());
            prop_assert!(!group.target_tokens.is_empty());

            let (sources, targets) = group_refs(group);
            let inner: Vec<ScoredLink> = links
                .iter()
                .filter(|l| sources.contains(&l.source) && targets.contains(&l.target))
                .cloned()
                .collect();
            let mut graph = LinkGraph::new(&group.source_tokens, &group.target_tokens).unwrap();
            graph.add_links(&inner).unwrap();
            let components = determine_groups(graph.adjacency(), graph.node_space());
            prop_assert_eq!(components.len(), 1, "group {:?} is not connected", group);

            if group.ngram_size() > max {
                prop_assert!(
                    group.source_tokens.len() < 2 || group.target_tokens.len() < 2,
                    "reducible group {:?} exceeds {}",
                    group,
                    max
                );
            }
        }

        let keys: Vec<(usize, usize)> = groups
            .iter()
            .map(|g| (g.source_tokens[0].position, g.target_tokens[0].position))
            .collect();
        prop_assert!(keys.windows(2).all(|w| w[0] <= w[1]), "keys {:?}", keys);
    }

    /// A token only lands in a group if one of its links is strong.
    #[test]
    fn grouped_tokens_have_a_strong_link((source, target, links) in arb_case(), max in 1usize..=4) {
        let groups = Grouper::new(max).unwrap().build(&source, &target, &links).unwrap();
        let strong: Vec<&ScoredLink> =
            links.iter().filter(|l| l.confidence > LINK_VALID_THRESHOLD).collect();

        for group in &groups {
            for token in &group.source_tokens {
                let key = token.token_ref();
                prop_assert!(strong.iter().any(|l| l.source == key), "source {:?}", token);
            }
            for token in &group.target_tokens {
                let key = token.token_ref();
                prop_assert!(strong.iter().any(|l| l.target == key), "target {:?}", token);
            }
        }
    }

    /// Grouping is a pure function of its inputs.
    #[test]
    fn grouping_is_deterministic((source, target, links) in arb_case(), max in 1usize..=4) {
        let grouper = Grouper::new(max).unwrap();
        let first = grouper.build(&source, &target, &links).unwrap();
        let second = grouper.build(&source, &target, &links).unwrap();
        prop_assert_eq!(first, second);
    }
}
