//! Text Normalizer
//!
//! Turns loosely formatted answer text into comparable concepts.
//! Two strategies share the same folding steps (annotation stripping,
//! HTML decoding, lowercasing, accent removal) and differ in granularity:
//!
//! - `WordLevel`: one concept per surviving word, stop words dropped,
//!   synonyms applied, sorted. Order carries no meaning.
//! - `BlockLevel`: one concept per punctuation-delimited block, kept as a
//!   phrase, `label:` prefix removed, synonyms applied per word. Order is the
//!   order of the source text.
//!
//! Free-text matching additionally needs the student's answer as a flat word
//! sequence (`candidate_words`) and the key split into phrases with
//! alternatives (`key_phrases`).
//!
//! Normalization is best-effort: a field that fails to normalize degrades to
//! an empty list and the exam carries on.

use crate::error::NormalizeError;
use crate::lexicon::Lexicon;
use crate::utils::text::{blank_punctuation, fold_text, is_quote_or_bracket, strip_point_annotations};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

/// A normalized term or short phrase: lowercase, accent-free, punctuation-free
pub type Concept = String;

/// Ordered concepts extracted from one field; duplicates allowed
pub type ConceptList = Vec<Concept>;

/// Characters that end a block
const BLOCK_DELIMITERS: &[char] = &[',', '.', ';', '|', '\n', '\r'];

/// Concept extraction granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    WordLevel,
    #[default]
    BlockLevel,
}

/// One expected phrase of a free-text key, with its alternative phrasings.
///
/// "masculino o femenino" has two alternatives: ["masculino"], ["femenino"].
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPhrase {
    /// Normalized block as written in the key, used for feedback
    pub text: String,
    /// Each alternative as a word sequence
    pub alternatives: SmallVec<[Vec<String>; 2]>,
}

/// Normalizer bound to a read-only lexicon
#[derive(Debug, Clone)]
pub struct Normalizer {
    lexicon: Arc<Lexicon>,
}

impl Normalizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Normalizer over the built-in Spanish grammar lexicon
    pub fn spanish() -> Self {
        Self::new(Lexicon::spanish_grammar())
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Extract concepts with the given strategy
    pub fn extract(&self, raw: &str, strategy: StrategyType) -> ConceptList {
        match strategy {
            StrategyType::WordLevel => self.normalize(raw),
            StrategyType::BlockLevel => self.tokenize_blocks(raw),
        }
    }

    /// Word-level concepts, empty on failure
    pub fn normalize(&self, raw: &str) -> ConceptList {
        self.try_normalize(raw).unwrap_or_else(|e| {
            tracing::warn!("Normalization failed, using empty concept list: {}", e);
            ConceptList::new()
        })
    }

    /// Word-level concepts
    ///
    /// 1. Point annotations -> space
    /// 2. HTML decode, lowercase
    /// 3. Strip diacritics
    /// 4. Non-alphanumeric -> space
    /// 5. Split on whitespace
    /// 6. Drop stop words, substitute synonyms
    /// 7. Sort
    pub fn try_normalize(&self, raw: &str) -> Result<ConceptList, NormalizeError> {
        if raw.trim().is_empty() {
            return Ok(ConceptList::new());
        }

        let folded = fold_text(&strip_point_annotations(raw))?;
        let cleaned = blank_punctuation(&folded);

        let mut concepts: ConceptList = cleaned
            .split_whitespace()
            .filter(|word| !self.lexicon.is_stop_word(word))
            .map(|word| self.lexicon.canonical(word).to_string())
            .collect();

        concepts.sort();
        Ok(concepts)
    }

    /// Block-level concepts, empty on failure
    pub fn tokenize_blocks(&self, raw: &str) -> ConceptList {
        self.try_tokenize_blocks(raw).unwrap_or_else(|e| {
            tracing::warn!("Block tokenization failed, using empty concept list: {}", e);
            ConceptList::new()
        })
    }

    /// Block-level concepts, in source order
    pub fn try_tokenize_blocks(&self, raw: &str) -> Result<ConceptList, NormalizeError> {
        if raw.trim().is_empty() {
            return Ok(ConceptList::new());
        }

        let folded = fold_text(&strip_point_annotations(raw))?;

        let blocks = folded
            .split(BLOCK_DELIMITERS)
            .map(|fragment| self.clean_block(fragment))
            .filter(|block| !block.is_empty())
            .collect();

        Ok(blocks)
    }

    /// "tiempo: pretérito (perfecto)" -> "preterito perfecto"
    fn clean_block(&self, fragment: &str) -> String {
        let value = match fragment.split_once(':') {
            Some((_, rest)) => rest,
            None => fragment,
        };

        let unquoted: String = value.chars().filter(|c| !is_quote_or_bracket(*c)).collect();

        blank_punctuation(&unquoted)
            .split_whitespace()
            .map(|word| self.lexicon.canonical(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Student free text as one flat word sequence.
    ///
    /// Known `label:` prefixes are removed, punctuation becomes word breaks
    /// and synonyms are applied. Stop words stay: key phrases may contain them.
    pub fn candidate_words(&self, raw: &str) -> Vec<String> {
        if raw.trim().is_empty() {
            return Vec::new();
        }

        let folded = match fold_text(&strip_point_annotations(raw)) {
            Ok(folded) => folded,
            Err(e) => {
                tracing::warn!("Answer text could not be normalized, treating as empty: {}", e);
                return Vec::new();
            }
        };

        let unlabelled = self.lexicon.strip_labels(&folded);
        let unquoted: String = unlabelled.chars().filter(|c| !is_quote_or_bracket(*c)).collect();

        blank_punctuation(&unquoted)
            .split_whitespace()
            .map(|word| self.lexicon.canonical(word).to_string())
            .collect()
    }

    /// Key text as expected phrases, each split into alternatives on the
    /// lexicon's alternative markers. Blocks made only of markers are dropped.
    pub fn key_phrases(&self, raw: &str) -> Vec<KeyPhrase> {
        self.tokenize_blocks(raw)
            .into_iter()
            .filter_map(|block| {
                let mut alternatives: SmallVec<[Vec<String>; 2]> = SmallVec::new();
                let mut current: Vec<String> = Vec::new();

                for word in block.split(' ') {
                    if self.lexicon.is_alternative_marker(word) {
                        if !current.is_empty() {
                            alternatives.push(std::mem::take(&mut current));
                        }
                    } else {
                        current.push(word.to_string());
                    }
                }
                if !current.is_empty() {
                    alternatives.push(current);
                }

                if alternatives.is_empty() {
                    None
                } else {
                    Some(KeyPhrase { text: block, alternatives })
                }
            })
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::spanish()
    }
}
