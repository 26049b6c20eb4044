//! Grading data model
//!
//! Input records arrive already extracted from the source documents:
//! free-text key questions and answers, or dual-dimension key rows
//! (grammatical + classification fields) and student rows. Outputs are
//! per-question outcomes; all values keep full precision until reporting.

use crate::scoring::QuestionState;
use crate::utils::ordering::sort_canonical;
use crate::utils::text::points_from_annotations;
use serde::{Deserialize, Serialize};

// ============================================================================
// FREE-TEXT MODE
// ============================================================================

/// Free-text question of the answer key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyQuestion {
    pub id: String,
    pub expected_text: String,
    /// Explicit value; when absent the `[N puntos]` annotations of the text
    /// are summed
    #[serde(default)]
    pub point_value: Option<f64>,
}

impl KeyQuestion {
    pub fn new(id: impl Into<String>, expected_text: impl Into<String>, point_value: f64) -> Self {
        Self {
            id: id.into(),
            expected_text: expected_text.into(),
            point_value: Some(point_value),
        }
    }

    pub fn resolved_points(&self) -> f64 {
        self.point_value
            .unwrap_or_else(|| points_from_annotations(&self.expected_text))
            .max(0.0)
    }
}

/// Student's free-text answer to one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeTextAnswer {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl FreeTextAnswer {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
        }
    }
}

/// Key question paired with the student's answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub expected_text: String,
    pub point_value: f64,
    pub student_text: Option<String>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        expected_text: impl Into<String>,
        point_value: f64,
        student_text: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            expected_text: expected_text.into(),
            point_value: point_value.max(0.0),
            student_text,
        }
    }

    /// Question whose value comes from the `[N puntos]` annotations in its text
    pub fn from_annotated(id: impl Into<String>, expected_text: impl Into<String>, student_text: Option<String>) -> Self {
        let expected_text = expected_text.into();
        let point_value = points_from_annotations(&expected_text);
        Self::new(id, expected_text, point_value, student_text)
    }

    /// The student supplied non-blank text
    pub fn is_answered(&self) -> bool {
        self.student_text
            .as_deref()
            .map_or(false, |text| !text.trim().is_empty())
    }
}

/// Join key and answers by id, key in canonical order.
///
/// Answers whose id is not in the key are ignored; the first answer wins when
/// an id repeats. A missing answer pairs as `None`; a blank one is kept so
/// trap questions can tell "left blank" from "not submitted".
pub fn pair_free_text(key: &[KeyQuestion], answers: &[FreeTextAnswer]) -> Vec<Question> {
    let mut ordered: Vec<&KeyQuestion> = key.iter().collect();
    sort_canonical(&mut ordered, |q| q.id.as_str());

    ordered
        .into_iter()
        .map(|k| {
            let student_text = answers
                .iter()
                .find(|a| a.id == k.id)
                .and_then(|a| a.text.clone());

            Question::new(k.id.clone(), k.expected_text.clone(), k.resolved_points(), student_text)
        })
        .collect()
}

// ============================================================================
// DUAL-DIMENSION MODE
// ============================================================================

/// Key row with separate grammatical and classification fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualKeyRow {
    pub id: String,
    /// Word or sentence under analysis, shown to the reader
    #[serde(default)]
    pub prompt: String,
    pub point_value: f64,
    #[serde(default)]
    pub grammatical: String,
    #[serde(default)]
    pub classification: String,
}

/// Student row of a dual-dimension exam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualAnswerRow {
    pub id: String,
    #[serde(default)]
    pub grammatical: String,
    #[serde(default)]
    pub classification: String,
}

impl DualAnswerRow {
    pub fn new(id: impl Into<String>, grammatical: impl Into<String>, classification: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            grammatical: grammatical.into(),
            classification: classification.into(),
        }
    }

    /// Either field holds non-blank text
    pub fn is_answered(&self) -> bool {
        !self.grammatical.trim().is_empty() || !self.classification.trim().is_empty()
    }
}

/// How student rows are matched to key rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pairing {
    /// Same id; key in canonical order
    #[default]
    ById,
    /// Same row index; both lists in input order
    ByPosition,
}

/// Pair each key row with its student row, if any
pub fn pair_dual<'a>(
    key: &'a [DualKeyRow],
    answers: &'a [DualAnswerRow],
    pairing: Pairing,
) -> Vec<(&'a DualKeyRow, Option<&'a DualAnswerRow>)> {
    match pairing {
        Pairing::ById => {
            let mut ordered: Vec<&DualKeyRow> = key.iter().collect();
            sort_canonical(&mut ordered, |row| row.id.as_str());
            ordered
                .into_iter()
                .map(|row| (row, answers.iter().find(|a| a.id == row.id)))
                .collect()
        }
        Pairing::ByPosition => key
            .iter()
            .enumerate()
            .map(|(i, row)| (row, answers.get(i)))
            .collect(),
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// Scoring dimension a match count belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Key phrases found in a free-text answer
    Phrases,
    Grammatical,
    Classification,
}

/// Match detail for one dimension of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionResult {
    pub dimension: Dimension,
    pub expected_text: String,
    pub received_text: String,
    pub matched: usize,
    pub expected: usize,
}

impl DimensionResult {
    pub fn fully_correct(&self) -> bool {
        self.expected > 0 && self.matched >= self.expected
    }
}

/// Graded question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub expected_text: String,
    pub received_text: String,
    pub dimensions: Vec<DimensionResult>,
    pub points_awarded: f64,
    pub points_possible: f64,
    pub state: QuestionState,
    pub feedback: String,
}

impl QuestionOutcome {
    /// Awarded share of the question value, 0-100
    pub fn percentage(&self) -> f64 {
        if self.points_possible > 0.0 {
            self.points_awarded / self.points_possible * 100.0
        } else {
            0.0
        }
    }
}

// ============================================================================
// REQUESTS
// ============================================================================

/// A complete grading request, as read by the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GradingRequest {
    FreeText {
        key: Vec<KeyQuestion>,
        #[serde(default)]
        answers: Vec<FreeTextAnswer>,
    },
    Dual {
        key: Vec<DualKeyRow>,
        #[serde(default)]
        answers: Vec<DualAnswerRow>,
    },
}
