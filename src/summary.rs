//! Exam-level aggregation
//!
//! Sums question outcomes into totals and a final grade on the configured
//! scale. Accumulation keeps full precision; rounding happens in `report`.

use crate::model::QuestionOutcome;
use crate::scoring::QuestionState;
use serde::{Deserialize, Serialize};

/// Number of questions per state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateTally {
    pub correct: usize,
    pub partial: usize,
    pub incorrect: usize,
    pub cheat: usize,
    pub neutral: usize,
    pub unanswered: usize,
}

impl StateTally {
    pub fn record(&mut self, state: QuestionState) {
        *self.slot(state) += 1;
    }

    pub fn count(&self, state: QuestionState) -> usize {
        match state {
            QuestionState::Correct => self.correct,
            QuestionState::Partial => self.partial,
            QuestionState::Incorrect => self.incorrect,
            QuestionState::Cheat => self.cheat,
            QuestionState::Neutral => self.neutral,
            QuestionState::Unanswered => self.unanswered,
        }
    }

    fn slot(&mut self, state: QuestionState) -> &mut usize {
        match state {
            QuestionState::Correct => &mut self.correct,
            QuestionState::Partial => &mut self.partial,
            QuestionState::Incorrect => &mut self.incorrect,
            QuestionState::Cheat => &mut self.cheat,
            QuestionState::Neutral => &mut self.neutral,
            QuestionState::Unanswered => &mut self.unanswered,
        }
    }
}

/// Totals over every key question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSummary {
    pub question_count: usize,
    pub total_possible: f64,
    pub total_awarded: f64,
    /// `total_awarded * scale / total_possible`, 0 for an exam worth nothing
    pub final_grade: f64,
    /// Awarded share of the total, 0-100
    pub percentage: f64,
    pub scale: f64,
    pub tally: StateTally,
}

impl ExamSummary {
    pub fn from_outcomes(outcomes: &[QuestionOutcome], scale: f64) -> Self {
        let mut tally = StateTally::default();
        let mut total_possible = 0.0;
        let mut total_awarded = 0.0;

        for outcome in outcomes {
            total_possible += outcome.points_possible;
            total_awarded += outcome.points_awarded;
            tally.record(outcome.state);
        }

        let (final_grade, percentage) = if total_possible > 0.0 {
            (
                total_awarded * scale / total_possible,
                total_awarded * 100.0 / total_possible,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            question_count: outcomes.len(),
            total_possible,
            total_awarded,
            final_grade,
            percentage,
            scale,
            tally,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn outcome(awarded: f64, possible: f64, state: QuestionState) -> QuestionOutcome {
        QuestionOutcome {
            question_id: "1".to_string(),
            expected_text: String::new(),
            received_text: String::new(),
            dimensions: Vec::new(),
            points_awarded: awarded,
            points_possible: possible,
            state,
            feedback: String::new(),
        }
    }

    #[test]
    fn test_final_grade_scale_20() {
        let outcomes = vec![
            outcome(2.0, 3.0, QuestionState::Partial),
            outcome(1.0, 1.0, QuestionState::Correct),
            outcome(0.0, 2.0, QuestionState::Unanswered),
        ];
        let summary = ExamSummary::from_outcomes(&outcomes, 20.0);

        assert_eq!(summary.question_count, 3);
        assert_relative_eq!(summary.total_possible, 6.0);
        assert_relative_eq!(summary.total_awarded, 3.0);
        assert_relative_eq!(summary.final_grade, 10.0);
        assert_relative_eq!(summary.percentage, 50.0);
        assert_eq!(summary.tally.partial, 1);
        assert_eq!(summary.tally.count(QuestionState::Unanswered), 1);
    }

    #[test]
    fn test_zero_possible_yields_zero_grade() {
        let summary = ExamSummary::from_outcomes(&[outcome(0.0, 0.0, QuestionState::Neutral)], 20.0);
        assert_relative_eq!(summary.final_grade, 0.0);
        assert_relative_eq!(summary.percentage, 0.0);

        let empty = ExamSummary::from_outcomes(&[], 20.0);
        assert_relative_eq!(empty.final_grade, 0.0);
        assert_eq!(empty.question_count, 0);
    }

    #[test]
    fn test_no_intermediate_rounding() {
        // Three thirds must sum to exactly the full value before scaling
        let third = 1.0 / 3.0;
        let outcomes = vec![
            outcome(third, third, QuestionState::Correct),
            outcome(third, third, QuestionState::Correct),
            outcome(third, third, QuestionState::Correct),
        ];
        let summary = ExamSummary::from_outcomes(&outcomes, 20.0);
        assert_relative_eq!(summary.final_grade, 20.0, epsilon = 1e-12);
    }
}
