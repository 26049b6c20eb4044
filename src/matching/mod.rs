//! Matching algorithms
//!
//! - `multiset`: consume-once containment of block concept lists
//!   (dual-dimension scoring)
//! - `phrase`: search-and-capture of key phrases with alternatives inside a
//!   free-text answer (single-dimension scoring)

pub mod multiset;
pub mod phrase;

pub use multiset::{count_block_matches, match_concepts, MatchResult};
pub use phrase::{search_and_capture, CandidateText, PhraseMatch};
