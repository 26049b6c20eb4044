//! Grammar Lexicon
//!
//! Static vocabulary the normalizer needs: synonym table (abbreviations and
//! spelling variants collapse to one canonical concept), stop words
//! (articles, prepositions, structural labels), the structural labels that
//! appear as `label:` prefixes, and the words that separate alternative
//! phrasings in a key ("masculino o femenino").
//!
//! The built-in tables cover Spanish grammatical analysis. A lexicon can also
//! be loaded from JSON; every key is folded (lowercase, accent-free) on load.
//! A lexicon is immutable once built and is shared read-only between
//! normalizers and grading threads.

use crate::error::GradingError;
use crate::utils::text::fold_text;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// BUILT-IN SPANISH GRAMMAR TABLES
// ============================================================================

static SPANISH_SYNONYMS: &[(&str, &str)] = &[
    // Tiempos verbales
    ("pasado", "preterito"), ("pret", "preterito"),
    ("fut", "futuro"), ("futur", "futuro"),
    ("pres", "presente"), ("copret", "copreterito"),
    ("imperf", "imperfecto"), ("perf", "perfecto"),
    // Categorias gramaticales
    ("sustantivo", "nombre"), ("sust", "nombre"),
    ("adj", "adjetivo"), ("v", "verbo"),
    ("adv", "adverbio"), ("prep", "preposicion"),
    ("art", "articulo"), ("pron", "pronombre"),
    // Genero y numero
    ("fem", "femenino"), ("f", "femenino"),
    ("masc", "masculino"), ("m", "masculino"),
    ("sing", "singular"), ("s", "singular"),
    ("plur", "plural"), ("pl", "plural"),
    // Voz y modo
    ("activa", "activo"), ("act", "activo"),
    ("pasiva", "pasivo"), ("pas", "pasivo"),
    ("indic", "indicativo"), ("ind", "indicativo"),
    ("subj", "subjuntivo"), ("sub", "subjuntivo"),
    ("imper", "imperativo"), ("imp", "imperativo"),
    // Personas
    ("1", "primera"), ("1a", "primera"), ("1era", "primera"),
    ("2", "segunda"), ("2a", "segunda"), ("2da", "segunda"),
    ("3", "tercera"), ("3a", "tercera"), ("3ra", "tercera"),
    // Tipos
    ("det", "determinado"), ("indet", "indeterminado"),
    ("definido", "determinado"), ("indefinido", "indeterminado"),
    ("demos", "demostrativo"),
];

static SPANISH_STOP_WORDS: &[&str] = &[
    // Articulos, preposiciones, copulas
    "de", "del", "la", "el", "los", "las", "un", "una", "unos", "unas",
    "en", "a", "al", "o", "y", "u", "e", "con", "sin", "por", "para",
    "es", "son", "fue", "fueron", "era", "eran", "se", "que", "cual",
    "muy", "mas", "menos",
    // Etiquetas estructurales ("Persona:", "Numero:", ...)
    "persona", "numero", "tiempo", "aspecto", "modo",
    "tipo", "clase", "forma", "conjugacion", "vocal", "tematica",
    "voz", "flexion", "significado", "estructura",
    "palabra", "valor", "genero", "funcion", "grado",
    // Leftovers of point annotations
    "punto", "puntos",
];

static SPANISH_LABELS: &[&str] = &[
    "persona", "numero", "tiempo", "aspecto", "modo",
    "tipo de conjugacion", "vocal tematica", "voz", "flexion",
    "significado", "estructura", "genero",
];

static DEFAULT_ALTERNATIVE_MARKERS: &[&str] = &["o", "u", "or"];

static SPANISH: Lazy<Arc<Lexicon>> = Lazy::new(|| {
    let synonyms = SPANISH_SYNONYMS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let file = LexiconFile {
        synonyms,
        stop_words: SPANISH_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
        labels: SPANISH_LABELS.iter().map(|s| s.to_string()).collect(),
        alternative_markers: default_markers(),
    };

    Arc::new(Lexicon::from_file(file).expect("built-in Spanish lexicon is consistent"))
});

// ============================================================================
// LEXICON
// ============================================================================

/// Serialized form of a lexicon
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LexiconFile {
    #[serde(default)]
    pub synonyms: FxHashMap<String, String>,
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default = "default_markers")]
    pub alternative_markers: Vec<String>,
}

fn default_markers() -> Vec<String> {
    DEFAULT_ALTERNATIVE_MARKERS.iter().map(|s| s.to_string()).collect()
}

/// Immutable vocabulary used by the normalizer
#[derive(Debug, Clone)]
pub struct Lexicon {
    synonyms: FxHashMap<String, String>,
    stop_words: FxHashSet<String>,
    labels: Vec<String>,
    alternative_markers: FxHashSet<String>,
    /// `label:` prefixes, longest label first
    label_prefix: Option<Regex>,
}

impl Lexicon {
    /// Shared built-in Spanish grammar lexicon
    pub fn spanish_grammar() -> Arc<Self> {
        Arc::clone(&SPANISH)
    }

    /// Load lexicon from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file: {:?}", path))?;

        Self::from_json(&contents)
            .with_context(|| format!("Failed to build lexicon from {:?}", path))
    }

    /// Parse lexicon from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let file: LexiconFile = serde_json::from_str(json)
            .with_context(|| "Failed to parse lexicon JSON")?;

        Ok(Self::from_file(file)?)
    }

    /// Build from raw tables: fold every entry, then validate
    pub fn from_file(file: LexiconFile) -> std::result::Result<Self, GradingError> {
        let fold = |s: &str| -> std::result::Result<String, GradingError> {
            fold_text(s.trim()).map_err(|e| GradingError::InvalidLexicon(format!("{s:?}: {e}")))
        };

        let mut synonyms = FxHashMap::default();
        for (word, canonical) in &file.synonyms {
            synonyms.insert(fold(word)?, fold(canonical)?);
        }

        let mut stop_words = FxHashSet::default();
        for word in &file.stop_words {
            stop_words.insert(fold(word)?);
        }

        let mut labels = Vec::with_capacity(file.labels.len());
        for label in &file.labels {
            let folded = fold(label)?;
            if !folded.is_empty() {
                labels.push(folded);
            }
        }
        labels.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        labels.dedup();

        let mut alternative_markers = FxHashSet::default();
        for marker in &file.alternative_markers {
            alternative_markers.insert(fold(marker)?);
        }

        let label_prefix = build_label_pattern(&labels)?;

        let lexicon = Self {
            synonyms,
            stop_words,
            labels,
            alternative_markers,
            label_prefix,
        };
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Reject tables where substitution is not a plain function.
    ///
    /// A canonical form must map to itself (or be absent) and must not be a
    /// stop word; otherwise normalizing already-normalized text would change it.
    fn validate(&self) -> std::result::Result<(), GradingError> {
        for (word, canonical) in &self.synonyms {
            if word.is_empty() || canonical.is_empty() {
                return Err(GradingError::InvalidLexicon(
                    "synonym entries must be non-empty".to_string(),
                ));
            }
            if word.split_whitespace().count() != 1 || canonical.split_whitespace().count() != 1 {
                return Err(GradingError::InvalidLexicon(format!(
                    "synonym '{}' -> '{}' must map one word to one word",
                    word, canonical
                )));
            }
            if let Some(next) = self.synonyms.get(canonical) {
                if next != canonical {
                    return Err(GradingError::InvalidLexicon(format!(
                        "synonym chain '{}' -> '{}' -> '{}'",
                        word, canonical, next
                    )));
                }
            }
            if self.stop_words.contains(canonical) {
                return Err(GradingError::InvalidLexicon(format!(
                    "canonical form '{}' is also a stop word",
                    canonical
                )));
            }
        }
        Ok(())
    }

    /// Canonical form of a folded word (the word itself when unmapped)
    pub fn canonical<'a>(&'a self, word: &'a str) -> &'a str {
        self.synonyms.get(word).map(String::as_str).unwrap_or(word)
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    pub fn is_alternative_marker(&self, word: &str) -> bool {
        self.alternative_markers.contains(word)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Remove every known `label:` prefix from folded text
    pub fn strip_labels(&self, folded: &str) -> String {
        match &self.label_prefix {
            Some(re) => re.replace_all(folded, " ").into_owned(),
            None => folded.to_string(),
        }
    }

    pub fn synonym_count(&self) -> usize {
        self.synonyms.len()
    }
}

/// `\b(?:tipo\s+de\s+conjugacion|persona|...)\s*:`
fn build_label_pattern(labels: &[String]) -> std::result::Result<Option<Regex>, GradingError> {
    if labels.is_empty() {
        return Ok(None);
    }

    let alternation = labels
        .iter()
        .map(|label| {
            label
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&format!(r"\b(?:{})\s*:", alternation))
        .map(Some)
        .map_err(|e| GradingError::InvalidLexicon(format!("label pattern: {e}")))
}
