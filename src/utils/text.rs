//! Text folding utilities
//!
//! Shared character-level steps used by every normalization strategy:
//! point-annotation handling, HTML entity decoding, case folding and
//! diacritic removal.

use crate::error::NormalizeError;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Matches point annotations such as "[1 punto]", "[3puntos]", "[2 points]"
static POINT_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[\s*(\d+(?:[.,]\d+)?)\s*(?:puntos?|points?)\s*\]")
        .expect("point annotation pattern is valid")
});

/// Value of a question that carries no point annotation
pub const DEFAULT_POINT_VALUE: f64 = 1.0;

/// Replace every point annotation with a single space
pub fn strip_point_annotations(text: &str) -> String {
    POINT_ANNOTATION.replace_all(text, " ").into_owned()
}

/// Sum every point annotation in a question's text.
///
/// "Sujeto [1 punto] ... predicado [2 puntos]" is worth 3.0.
/// Text without annotations is worth `DEFAULT_POINT_VALUE`.
pub fn points_from_annotations(text: &str) -> f64 {
    let mut total = 0.0;
    let mut found = false;

    for caps in POINT_ANNOTATION.captures_iter(text) {
        found = true;
        if let Ok(value) = caps[1].replace(',', ".").parse::<f64>() {
            total += value;
        }
    }

    if found { total } else { DEFAULT_POINT_VALUE }
}

/// Remove diacritics: decompose, drop combining marks, recompose
pub fn strip_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect()
}

/// Decode HTML entities, lowercase, strip diacritics.
///
/// Fails when the text carries U+FFFD, the marker left behind by lossy
/// decoding of the source document.
pub fn fold_text(text: &str) -> Result<String, NormalizeError> {
    if let Some(pos) = text.find('\u{FFFD}') {
        return Err(NormalizeError::Undecodable(pos));
    }

    let decoded = html_escape::decode_html_entities(text);
    Ok(strip_diacritics(&decoded.to_lowercase()))
}

/// Replace every character that is not alphanumeric or whitespace with a space
pub fn blank_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect()
}

/// True for characters that are dropped outright inside a block
/// rather than turned into a word break
pub fn is_quote_or_bracket(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | '“' | '”' | '‘' | '’' | '«' | '»' | '(' | ')' | '[' | ']' | '{' | '}'
    )
}
