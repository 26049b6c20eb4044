//! Multiset containment matching
//!
//! Each expected concept is satisfied by at most one identical student
//! concept. Position does not matter; duplicates in the key demand duplicates
//! in the answer.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Matched vs expected item counts for one scoring dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: usize,
    pub expected: usize,
}

impl MatchResult {
    pub fn new(matched: usize, expected: usize) -> Self {
        Self { matched, expected }
    }

    /// Every expected item matched, and there was at least one
    pub fn is_complete(&self) -> bool {
        self.expected > 0 && self.matched >= self.expected
    }

    /// Combine two dimensions
    pub fn combined(&self, other: &MatchResult) -> MatchResult {
        MatchResult {
            matched: self.matched + other.matched,
            expected: self.expected + other.expected,
        }
    }
}

/// Count expected concepts found in the student's concepts, consuming each
/// student concept at most once
pub fn count_block_matches(expected: &[String], student: &[String]) -> usize {
    // Remaining occurrences per student concept
    let mut remaining: FxHashMap<&str, usize> = FxHashMap::default();
    for concept in student {
        *remaining.entry(concept.as_str()).or_insert(0) += 1;
    }

    let mut matched = 0;
    for concept in expected {
        if let Some(count) = remaining.get_mut(concept.as_str()) {
            if *count > 0 {
                *count -= 1;
                matched += 1;
            }
        }
    }

    matched
}

/// `count_block_matches` packaged with the expected total
pub fn match_concepts(expected: &[String], student: &[String]) -> MatchResult {
    MatchResult::new(count_block_matches(expected, student), expected.len())
}
