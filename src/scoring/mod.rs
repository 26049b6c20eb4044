//! Scoring policies and outcome states
//!
//! - `free_text`: single-dimension scoring of a free-text answer
//!   (strict all-or-nothing, or additive one point per matched phrase)
//! - `dual`: grammatical (strict) + classification (additive) rows,
//!   including trap-row detection

pub mod free_text;
pub mod dual;

pub use free_text::{score_free_text, FreeTextScore};
pub use dual::{score_dual, DualScore};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Points for a fully matched strict dimension
pub const STRICT_DIMENSION_POINTS: f64 = 1.0;

/// Points per matched concept in an additive dimension
pub const ADDITIVE_POINTS_PER_MATCH: f64 = 1.0;

/// How matches turn into points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Full credit only when every expected item matched
    Strict,
    /// One point per matched item, capped at the question value
    #[default]
    Additive,
    /// Strict grammatical dimension plus additive classification dimension
    DualDimension,
}

/// Derived state of a graded question.
///
/// Serialized labels are consumed verbatim downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionState {
    Correct,
    Partial,
    Incorrect,
    /// Trap row answered by the student
    Cheat,
    /// Trap row left blank
    Neutral,
    Unanswered,
}

impl QuestionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionState::Correct => "CORRECT",
            QuestionState::Partial => "PARTIAL",
            QuestionState::Incorrect => "INCORRECT",
            QuestionState::Cheat => "CHEAT",
            QuestionState::Neutral => "NEUTRAL",
            QuestionState::Unanswered => "UNANSWERED",
        }
    }

    /// State from combined match counts of an answered, non-trap question
    pub fn from_counts(matched: usize, expected: usize) -> Self {
        if matched >= expected {
            QuestionState::Correct
        } else if matched == 0 {
            QuestionState::Incorrect
        } else {
            QuestionState::Partial
        }
    }
}

impl fmt::Display for QuestionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
