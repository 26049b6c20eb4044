//! Exam Grader Rust Implementation
//!
//! Grades student answers against an answer key by normalizing both sides
//! into comparable concepts, matching them, and scoring the matches.
//!
//! Pipeline:
//! - `normalizer/`: raw text -> concepts (word-level or block-level), backed
//!   by a read-only `lexicon`
//! - `matching/`: multiset consume-once matching and phrase
//!   search-and-capture with alternatives
//! - `scoring/`: strict, additive and dual-dimension policies, question states
//! - `summary`: totals and final grade on the configured scale
//! - `grader`: coordinator for free-text exams, dual-dimension exams and
//!   parallel batches
//! - `report/`: rounded JSON view of a graded exam
//!
//! Every grading call is isolated; nothing is cached between requests.

pub mod config;
pub mod error;
pub mod feedback;
pub mod grader;
pub mod lexicon;
pub mod matching;
pub mod model;
pub mod normalizer;
pub mod report;
pub mod scoring;
pub mod summary;
pub mod utils;

// Re-export commonly used types
pub use config::GradingConfig;
pub use error::{GradingError, NormalizeError};
pub use grader::{DualSubmission, ExamGrader, GradedExam, GradedSubmission, Submission};
pub use lexicon::Lexicon;
pub use matching::{count_block_matches, search_and_capture, CandidateText, MatchResult, PhraseMatch};
pub use model::{
    DualAnswerRow, DualKeyRow, FreeTextAnswer, GradingRequest, KeyQuestion, Pairing, Question,
    QuestionOutcome,
};
pub use normalizer::{Concept, ConceptList, KeyPhrase, Normalizer, StrategyType};
pub use report::{ExamReport, JsonFormatter};
pub use scoring::{QuestionState, ScoringPolicy};
pub use summary::{ExamSummary, StateTally};
