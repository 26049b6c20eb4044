//! Utility modules for exam grading
//!
//! Contains shared functionality used across the pipeline:
//! - Text: annotation stripping, HTML decoding, case and accent folding
//! - Ordering: canonical question-id ordering

pub mod text;
pub mod ordering;

// Re-export commonly used functions
pub use text::{fold_text, points_from_annotations, strip_diacritics, strip_point_annotations};
pub use ordering::{numeric_id, sort_canonical};
