//! Exam Grader - Main coordinator for grading an exam against its key
//!
//! Wires the normalizer, matchers and scoring policies together:
//! raw text pairs -> concepts -> match counts -> per-question outcome ->
//! exam summary. Includes sequential and parallel (Rayon) batch grading of
//! many submissions against one key.
//!
//! Every call is an isolated computation; the only shared state is the
//! read-only lexicon inside the normalizer.

use crate::config::GradingConfig;
use crate::error::{GradingError, Result};
use crate::feedback::{
    dual_feedback, missing_phrases_feedback, MISSING_FIELD, NO_ANSWER_FEEDBACK, NO_ANSWER_FOUND,
    TRAP_ANSWERED_FEEDBACK, TRAP_BLANK_FEEDBACK,
};
use crate::lexicon::Lexicon;
use crate::matching::{match_concepts, search_and_capture, CandidateText, MatchResult, PhraseMatch};
use crate::model::{
    pair_dual, pair_free_text, Dimension, DimensionResult, DualAnswerRow, DualKeyRow,
    FreeTextAnswer, GradingRequest, KeyQuestion, Question, QuestionOutcome,
};
use crate::normalizer::{ConceptList, Normalizer};
use crate::scoring::{score_dual, score_free_text, QuestionState};
use crate::summary::ExamSummary;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Main exam grader
#[derive(Debug, Clone)]
pub struct ExamGrader {
    normalizer: Normalizer,
    config: GradingConfig,
}

/// Graded exam: ordered outcomes plus totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedExam {
    pub summary: ExamSummary,
    pub outcomes: Vec<QuestionOutcome>,
}

/// One student's answers in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub student_id: String,
    pub answers: Vec<FreeTextAnswer>,
}

/// One student's answers in a dual-dimension batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualSubmission {
    pub student_id: String,
    pub answers: Vec<DualAnswerRow>,
}

/// Batch result for one student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedSubmission {
    pub student_id: String,
    pub exam: GradedExam,
}

impl ExamGrader {
    /// Initialize grader from configuration
    ///
    /// Loads the lexicon named by `config.lexicon_path`, or uses the built-in
    /// Spanish grammar tables.
    pub fn new(config: GradingConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let lexicon = match &config.lexicon_path {
            Some(path) => {
                tracing::info!("Loading lexicon: {:?}", path);
                Arc::new(Lexicon::load(path)?)
            }
            None => Lexicon::spanish_grammar(),
        };

        tracing::debug!("Lexicon ready ({} synonyms)", lexicon.synonym_count());

        Ok(Self {
            normalizer: Normalizer::new(lexicon),
            config,
        })
    }

    /// Grader over an existing normalizer (shared lexicon)
    pub fn with_normalizer(config: GradingConfig, normalizer: Normalizer) -> Result<Self> {
        config.validate()?;
        Ok(Self { normalizer, config })
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Grade whichever exam a request carries
    pub fn grade_request(&self, request: &GradingRequest) -> Result<GradedExam> {
        match request {
            GradingRequest::FreeText { key, answers } => self.grade_free_text(key, answers),
            GradingRequest::Dual { key, answers } => self.grade_dual(key, answers),
        }
    }

    // ========================================================================
    // FREE-TEXT (single dimension)
    // ========================================================================

    /// Pair answers with the key by id and grade every key question
    pub fn grade_free_text(&self, key: &[KeyQuestion], answers: &[FreeTextAnswer]) -> Result<GradedExam> {
        if key.is_empty() {
            return Err(GradingError::EmptyKey);
        }
        self.grade_questions(&pair_free_text(key, answers))
    }

    /// Grade already-paired questions, in the given order
    pub fn grade_questions(&self, questions: &[Question]) -> Result<GradedExam> {
        if questions.is_empty() {
            return Err(GradingError::EmptyKey);
        }

        let outcomes: Vec<QuestionOutcome> = questions
            .iter()
            .map(|q| self.grade_question(q))
            .collect();

        Ok(self.finish(outcomes))
    }

    /// Grade one free-text question
    pub fn grade_question(&self, question: &Question) -> QuestionOutcome {
        let phrases = self.normalizer.key_phrases(&question.expected_text);
        if phrases.is_empty() {
            return self.grade_trap_question(question);
        }

        let Some(student_text) = question.student_text.as_deref().filter(|_| question.is_answered()) else {
            let outcome = QuestionOutcome {
                question_id: question.id.clone(),
                expected_text: question.expected_text.clone(),
                received_text: NO_ANSWER_FOUND.to_string(),
                dimensions: vec![DimensionResult {
                    dimension: Dimension::Phrases,
                    expected_text: question.expected_text.clone(),
                    received_text: NO_ANSWER_FOUND.to_string(),
                    matched: 0,
                    expected: phrases.len(),
                }],
                points_awarded: 0.0,
                points_possible: question.point_value,
                state: QuestionState::Unanswered,
                feedback: NO_ANSWER_FEEDBACK.to_string(),
            };
            tracing::debug!("Question {}: {}", outcome.question_id, outcome.state);
            return outcome;
        };

        let mut candidate = CandidateText::new(self.normalizer.candidate_words(student_text));
        let matches: PhraseMatch = search_and_capture(&phrases, &mut candidate);
        let score = score_free_text(self.config.free_text_policy, &matches, question.point_value);

        tracing::debug!(
            "Question {}: {} ({}/{} phrases, {} points)",
            question.id,
            score.state,
            matches.matched,
            matches.total,
            score.points
        );

        QuestionOutcome {
            question_id: question.id.clone(),
            expected_text: question.expected_text.clone(),
            received_text: student_text.to_string(),
            dimensions: vec![DimensionResult {
                dimension: Dimension::Phrases,
                expected_text: question.expected_text.clone(),
                received_text: student_text.to_string(),
                matched: matches.matched,
                expected: matches.total,
            }],
            points_awarded: score.points,
            points_possible: question.point_value,
            state: score.state,
            feedback: missing_phrases_feedback(&matches.missing),
        }
    }

    /// Free-text question whose key yields no phrases.
    ///
    /// Nothing can be earned: CHEAT when the student wrote anything, NEUTRAL
    /// for a blank answer, UNANSWERED when there is no answer at all.
    fn grade_trap_question(&self, question: &Question) -> QuestionOutcome {
        let (state, feedback) = match question.student_text.as_deref() {
            None => (QuestionState::Unanswered, NO_ANSWER_FEEDBACK),
            Some(text) if self.normalizer.candidate_words(text).is_empty() => {
                (QuestionState::Neutral, TRAP_BLANK_FEEDBACK)
            }
            Some(_) => (QuestionState::Cheat, TRAP_ANSWERED_FEEDBACK),
        };

        let received_text = match question.student_text.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => NO_ANSWER_FOUND.to_string(),
        };

        tracing::debug!("Question {}: {} (trap)", question.id, state);

        QuestionOutcome {
            question_id: question.id.clone(),
            expected_text: question.expected_text.clone(),
            received_text: received_text.clone(),
            dimensions: vec![DimensionResult {
                dimension: Dimension::Phrases,
                expected_text: question.expected_text.clone(),
                received_text,
                matched: 0,
                expected: 0,
            }],
            points_awarded: 0.0,
            points_possible: question.point_value,
            state,
            feedback: feedback.to_string(),
        }
    }

    // ========================================================================
    // DUAL DIMENSION (grammatical + classification)
    // ========================================================================

    /// Grade every key row against its student row
    pub fn grade_dual(&self, key: &[DualKeyRow], answers: &[DualAnswerRow]) -> Result<GradedExam> {
        if key.is_empty() {
            return Err(GradingError::EmptyKey);
        }

        let outcomes: Vec<QuestionOutcome> = pair_dual(key, answers, self.config.pairing)
            .into_iter()
            .map(|(row, answer)| self.grade_dual_row(row, answer))
            .collect();

        Ok(self.finish(outcomes))
    }

    /// Grade one dual-dimension row
    pub fn grade_dual_row(&self, row: &DualKeyRow, answer: Option<&DualAnswerRow>) -> QuestionOutcome {
        let strategy = self.config.strategy;
        let grammatical_key = self.normalizer.extract(&row.grammatical, strategy);
        let mut classification_key = self.normalizer.extract(&row.classification, strategy);
        if self.config.dedupe_classification_key {
            classification_key = dedupe_key(classification_key);
        }

        let is_trap = grammatical_key.is_empty() && classification_key.is_empty();
        let point_value = row.point_value.max(0.0);

        // No row at all, or a blank row on a question that expects something
        let answer = match answer {
            Some(a) if a.is_answered() || is_trap => a,
            _ => {
                let outcome = self.dual_outcome(
                    row,
                    answer,
                    MatchResult::new(0, grammatical_key.len()),
                    MatchResult::new(0, classification_key.len()),
                    0.0,
                    QuestionState::Unanswered,
                    NO_ANSWER_FEEDBACK.to_string(),
                );
                tracing::debug!("Row {}: {}", outcome.question_id, outcome.state);
                return outcome;
            }
        };

        let grammatical_student = self.normalizer.extract(&answer.grammatical, strategy);
        let classification_student = self.normalizer.extract(&answer.classification, strategy);

        let grammatical = match_concepts(&grammatical_key, &grammatical_student);
        let classification = match_concepts(&classification_key, &classification_student);
        let wrote_something = !grammatical_student.is_empty() || !classification_student.is_empty();

        let score = score_dual(grammatical, classification, wrote_something, point_value);

        tracing::debug!(
            "Row {}: {} (grammatical {}/{}, classification {}/{}, {} points)",
            row.id,
            score.state,
            grammatical.matched,
            grammatical.expected,
            classification.matched,
            classification.expected,
            score.points
        );

        self.dual_outcome(
            row,
            Some(answer),
            grammatical,
            classification,
            score.points,
            score.state,
            dual_feedback(&score),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn dual_outcome(
        &self,
        row: &DualKeyRow,
        answer: Option<&DualAnswerRow>,
        grammatical: MatchResult,
        classification: MatchResult,
        points: f64,
        state: QuestionState,
        feedback: String,
    ) -> QuestionOutcome {
        let received = |field: Option<&str>| -> String {
            match field {
                Some(text) if !text.trim().is_empty() => text.to_string(),
                _ => MISSING_FIELD.to_string(),
            }
        };
        let received_grammatical = received(answer.map(|a| a.grammatical.as_str()));
        let received_classification = received(answer.map(|a| a.classification.as_str()));

        let received_text = match answer {
            Some(a) if a.is_answered() => format!("{} / {}", received_grammatical, received_classification),
            _ => MISSING_FIELD.to_string(),
        };

        QuestionOutcome {
            question_id: row.id.clone(),
            expected_text: row.prompt.clone(),
            received_text,
            dimensions: vec![
                DimensionResult {
                    dimension: Dimension::Grammatical,
                    expected_text: row.grammatical.clone(),
                    received_text: received_grammatical,
                    matched: grammatical.matched,
                    expected: grammatical.expected,
                },
                DimensionResult {
                    dimension: Dimension::Classification,
                    expected_text: row.classification.clone(),
                    received_text: received_classification,
                    matched: classification.matched,
                    expected: classification.expected,
                },
            ],
            points_awarded: points,
            points_possible: row.point_value.max(0.0),
            state,
            feedback,
        }
    }

    // ========================================================================
    // BATCHES
    // ========================================================================

    /// Grade many submissions against one free-text key, one after another
    pub fn grade_batch(&self, key: &[KeyQuestion], submissions: &[Submission]) -> Result<Vec<GradedSubmission>> {
        submissions
            .iter()
            .map(|s| self.grade_submission(key, s))
            .collect()
    }

    /// Grade many submissions against one free-text key IN PARALLEL
    ///
    /// Each submission is independent; the lexicon is only read.
    pub fn grade_batch_parallel(&self, key: &[KeyQuestion], submissions: &[Submission]) -> Result<Vec<GradedSubmission>> {
        submissions
            .par_iter()
            .map(|s| self.grade_submission(key, s))
            .collect()
    }

    /// Grade many dual-dimension submissions against one key IN PARALLEL
    pub fn grade_dual_batch_parallel(
        &self,
        key: &[DualKeyRow],
        submissions: &[DualSubmission],
    ) -> Result<Vec<GradedSubmission>> {
        submissions
            .par_iter()
            .map(|s| {
                Ok(GradedSubmission {
                    student_id: s.student_id.clone(),
                    exam: self.grade_dual(key, &s.answers)?,
                })
            })
            .collect()
    }

    fn grade_submission(&self, key: &[KeyQuestion], submission: &Submission) -> Result<GradedSubmission> {
        Ok(GradedSubmission {
            student_id: submission.student_id.clone(),
            exam: self.grade_free_text(key, &submission.answers)?,
        })
    }

    fn finish(&self, outcomes: Vec<QuestionOutcome>) -> GradedExam {
        let summary = ExamSummary::from_outcomes(&outcomes, self.config.scale);

        tracing::info!(
            "Graded {} questions: {:.2}/{:.2} points, grade {:.2}/{}",
            summary.question_count,
            summary.total_awarded,
            summary.total_possible,
            summary.final_grade,
            summary.scale
        );

        GradedExam { summary, outcomes }
    }
}

/// Drop repeated and single-character blocks, keeping first occurrences
fn dedupe_key(concepts: ConceptList) -> ConceptList {
    let mut seen = FxHashSet::default();
    concepts
        .into_iter()
        .filter(|c| c.chars().count() > 1)
        .filter(|c| seen.insert(c.clone()))
        .collect()
}
