//! Serialized exam report
//!
//! View over a `GradedExam` for downstream consumers. Point totals, the final
//! grade and percentages are rounded to 2 decimals here and only here; the
//! grading types keep full precision.

pub mod json;

pub use json::JsonFormatter;

use crate::grader::{GradedExam, GradedSubmission};
use crate::model::{Dimension, DimensionResult, QuestionOutcome};
use crate::scoring::QuestionState;
use crate::summary::{ExamSummary, StateTally};
use serde::{Serialize, Serializer};

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn serialize_round2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round2(*value))
}

/// Report for one graded exam
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamReport {
    pub summary: SummaryView,
    pub questions: Vec<QuestionView>,
}

/// Exam totals as reported
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub question_count: usize,
    #[serde(serialize_with = "serialize_round2")]
    pub total_possible: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub total_awarded: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub final_grade: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub percentage: f64,
    pub scale: f64,
    pub states: StateTally,
}

/// One question as reported
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub question_id: String,
    pub expected_text: String,
    pub received_text: String,
    #[serde(serialize_with = "serialize_round2")]
    pub points_awarded: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub points_possible: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub percentage: f64,
    pub state: QuestionState,
    pub feedback: String,
    pub dimensions: Vec<DimensionView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionView {
    pub dimension: Dimension,
    pub expected_text: String,
    pub received_text: String,
    pub matched: usize,
    pub expected: usize,
    pub fully_correct: bool,
}

/// Batch report entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReport {
    pub student_id: String,
    #[serde(flatten)]
    pub report: ExamReport,
}

impl From<&ExamSummary> for SummaryView {
    fn from(summary: &ExamSummary) -> Self {
        Self {
            question_count: summary.question_count,
            total_possible: summary.total_possible,
            total_awarded: summary.total_awarded,
            final_grade: summary.final_grade,
            percentage: summary.percentage,
            scale: summary.scale,
            states: summary.tally,
        }
    }
}

impl From<&DimensionResult> for DimensionView {
    fn from(result: &DimensionResult) -> Self {
        Self {
            dimension: result.dimension,
            expected_text: result.expected_text.clone(),
            received_text: result.received_text.clone(),
            matched: result.matched,
            expected: result.expected,
            fully_correct: result.fully_correct(),
        }
    }
}

impl From<&QuestionOutcome> for QuestionView {
    fn from(outcome: &QuestionOutcome) -> Self {
        Self {
            question_id: outcome.question_id.clone(),
            expected_text: outcome.expected_text.clone(),
            received_text: outcome.received_text.clone(),
            points_awarded: outcome.points_awarded,
            points_possible: outcome.points_possible,
            percentage: outcome.percentage(),
            state: outcome.state,
            feedback: outcome.feedback.clone(),
            dimensions: outcome.dimensions.iter().map(DimensionView::from).collect(),
        }
    }
}

impl From<&GradedExam> for ExamReport {
    fn from(exam: &GradedExam) -> Self {
        Self {
            summary: SummaryView::from(&exam.summary),
            questions: exam.outcomes.iter().map(QuestionView::from).collect(),
        }
    }
}

impl From<&GradedSubmission> for SubmissionReport {
    fn from(submission: &GradedSubmission) -> Self {
        Self {
            student_id: submission.student_id.clone(),
            report: ExamReport::from(&submission.exam),
        }
    }
}
