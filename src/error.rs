//! Error types for exam grading

use thiserror::Error;

/// Result type for grading operations
pub type Result<T> = std::result::Result<T, GradingError>;

/// Errors that abort a grading request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradingError {
    /// The answer key produced no questions at all
    #[error("Answer key contains no questions")]
    EmptyKey,

    /// Configuration value out of range or inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Lexicon tables are inconsistent (e.g. synonym chains)
    #[error("Invalid lexicon: {0}")]
    InvalidLexicon(String),
}

/// Local normalization failure.
///
/// Never escapes a grading request: the normalizer logs it and degrades the
/// field to an empty concept list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// Text carries U+FFFD, i.e. it was decoded lossily upstream
    #[error("text contains undecodable characters at byte {0}")]
    Undecodable(usize),
}
