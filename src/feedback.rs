//! Feedback strings and placeholders shown next to each graded question

use crate::matching::MatchResult;
use crate::scoring::{DualScore, QuestionState};

/// Feedback when nothing is missing
pub const CORRECT_MARK: &str = "✓ Correct";

/// Feedback for a question with no submission
pub const NO_ANSWER_FEEDBACK: &str = "No answer submitted.";

/// Feedback for a trap question the student answered anyway
pub const TRAP_ANSWERED_FEEDBACK: &str = "Trap row: no answer was expected, but one was given.";

/// Feedback for a trap question left blank
pub const TRAP_BLANK_FEEDBACK: &str = "Trap row left blank.";

/// Received-text placeholder for a missing dual-dimension field
pub const MISSING_FIELD: &str = "---";

/// Received-text placeholder for a missing free-text answer
pub const NO_ANSWER_FOUND: &str = "(no answer found)";

/// "✓ Correct", or "Missing: a, b" listing key phrases not found
pub fn missing_phrases_feedback(missing: &[String]) -> String {
    if missing.is_empty() {
        CORRECT_MARK.to_string()
    } else {
        format!("Missing: {}", missing.join(", "))
    }
}

/// Feedback for a scored dual-dimension row
pub fn dual_feedback(score: &DualScore) -> String {
    match score.state {
        QuestionState::Cheat => TRAP_ANSWERED_FEEDBACK.to_string(),
        QuestionState::Neutral => TRAP_BLANK_FEEDBACK.to_string(),
        QuestionState::Correct => CORRECT_MARK.to_string(),
        _ => format!(
            "Grammatical: {}; Classification: {}",
            describe_dimension(&score.grammatical),
            describe_dimension(&score.classification)
        ),
    }
}

fn describe_dimension(result: &MatchResult) -> String {
    if result.expected == 0 {
        "nothing expected".to_string()
    } else if result.is_complete() {
        format!("complete ({}/{})", result.matched, result.expected)
    } else {
        format!("{}/{} matched", result.matched, result.expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_dual;

    #[test]
    fn test_missing_phrases_feedback() {
        assert_eq!(missing_phrases_feedback(&[]), CORRECT_MARK);
        let missing = vec!["tercera persona".to_string(), "singular o plural".to_string()];
        assert_eq!(
            missing_phrases_feedback(&missing),
            "Missing: tercera persona, singular o plural"
        );
    }

    #[test]
    fn test_dual_feedback() {
        let partial = score_dual(MatchResult::new(1, 1), MatchResult::new(1, 2), true, 3.0);
        assert_eq!(
            dual_feedback(&partial),
            "Grammatical: complete (1/1); Classification: 1/2 matched"
        );

        let cheat = score_dual(MatchResult::new(0, 0), MatchResult::new(0, 0), true, 1.0);
        assert_eq!(dual_feedback(&cheat), TRAP_ANSWERED_FEEDBACK);

        let correct = score_dual(MatchResult::new(1, 1), MatchResult::new(2, 2), true, 3.0);
        assert_eq!(dual_feedback(&correct), CORRECT_MARK);
    }
}
