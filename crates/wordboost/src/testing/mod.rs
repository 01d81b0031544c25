//! Test utilities shared by unit tests, integration tests and benchmarks.

pub mod data;

use crate::align::AlignmentGroup;

/// Default tolerance for floating point comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Panic unless both sides of every group are in sentence order.
pub fn assert_groups_ordered(groups: &[AlignmentGroup]) {
    for (i, group) in groups.iter().enumerate() {
        let sorted = |positions: Vec<usize>| positions.windows(2).all(|w| w[0] < w[1]);
        assert!(
            sorted(group.source_tokens.iter().map(|t| t.position).collect()),
            "group {i}: source tokens out of order: {:?}",
            group.source_tokens
        );
        assert!(
            sorted(group.target_tokens.iter().map(|t| t.position).collect()),
            "group {i}: target tokens out of order: {:?}",
            group.target_tokens
        );
    }
}

/// Panic unless no token appears in more than one group.
pub fn assert_groups_disjoint(groups: &[AlignmentGroup]) {
    let mut sources = std::collections::HashSet::new();
    let mut targets = std::collections::HashSet::new();
    for group in groups {
        for token in &group.source_tokens {
            assert!(sources.insert(token.token_ref()), "source `{token}` in two groups");
        }
        for token in &group.target_tokens {
            assert!(targets.insert(token.token_ref()), "target `{token}` in two groups");
        }
    }
}
