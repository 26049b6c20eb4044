//! Dual-dimension scoring
//!
//! A key row carries a grammatical field and a classification field.
//! Grammatical is strict: 1.0 only when every expected block matched.
//! Classification is additive: 1.0 per matched block. The row total is capped
//! at the question value.
//!
//! A row whose key has no concepts in either dimension is a trap row: it
//! earns nothing, and is CHEAT when the student wrote anything, NEUTRAL
//! otherwise.

use crate::matching::MatchResult;
use crate::scoring::{QuestionState, ADDITIVE_POINTS_PER_MATCH, STRICT_DIMENSION_POINTS};

/// Scored row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualScore {
    pub grammatical: MatchResult,
    pub classification: MatchResult,
    pub grammatical_points: f64,
    pub classification_points: f64,
    /// Row total after the cap
    pub points: f64,
    pub state: QuestionState,
}

impl DualScore {
    pub fn is_trap(&self) -> bool {
        self.grammatical.expected + self.classification.expected == 0
    }
}

/// Score a row whose student counterpart exists.
///
/// `student_wrote_something`: the student's fields produced any concept.
pub fn score_dual(
    grammatical: MatchResult,
    classification: MatchResult,
    student_wrote_something: bool,
    point_value: f64,
) -> DualScore {
    let combined = grammatical.combined(&classification);

    if combined.expected == 0 {
        let state = if student_wrote_something {
            QuestionState::Cheat
        } else {
            QuestionState::Neutral
        };
        return DualScore {
            grammatical,
            classification,
            grammatical_points: 0.0,
            classification_points: 0.0,
            points: 0.0,
            state,
        };
    }

    let grammatical_points = if grammatical.is_complete() {
        STRICT_DIMENSION_POINTS
    } else {
        0.0
    };
    let classification_points = classification.matched as f64 * ADDITIVE_POINTS_PER_MATCH;

    let points = (grammatical_points + classification_points).min(point_value.max(0.0));

    DualScore {
        grammatical,
        classification,
        grammatical_points,
        classification_points,
        points,
        state: QuestionState::from_counts(combined.matched, combined.expected),
    }
}
