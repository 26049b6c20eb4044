//! Single-dimension scoring of free-text answers

use crate::matching::PhraseMatch;
use crate::scoring::{QuestionState, ScoringPolicy, ADDITIVE_POINTS_PER_MATCH};

/// Points and state for one answered free-text question
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeTextScore {
    pub points: f64,
    pub state: QuestionState,
}

/// Score an answered free-text question.
///
/// Additive: `min(matched, points_possible)`; CORRECT once the match count
/// reaches the question value. Strict: full value only when every key phrase
/// matched. A zero-value question is never CORRECT. `DualDimension` has a
/// single dimension here and scores additively.
///
/// Unanswered questions never reach this function.
pub fn score_free_text(policy: ScoringPolicy, matches: &PhraseMatch, points_possible: f64) -> FreeTextScore {
    let possible = points_possible.max(0.0);

    match policy {
        ScoringPolicy::Strict => {
            let complete = matches.total > 0 && matches.matched >= matches.total;
            let points = if complete { possible } else { 0.0 };
            let state = if complete && possible > 0.0 {
                QuestionState::Correct
            } else if matches.matched == 0 {
                QuestionState::Incorrect
            } else {
                QuestionState::Partial
            };
            FreeTextScore { points, state }
        }
        ScoringPolicy::Additive | ScoringPolicy::DualDimension => {
            let earned = matches.matched as f64 * ADDITIVE_POINTS_PER_MATCH;
            let points = earned.min(possible);
            let state = if possible > 0.0 && earned >= possible {
                QuestionState::Correct
            } else if matches.matched == 0 {
                QuestionState::Incorrect
            } else {
                QuestionState::Partial
            };
            FreeTextScore { points, state }
        }
    }
}
