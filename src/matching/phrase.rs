//! Phrase search-and-capture matching
//!
//! Free-text key vs free-text answer. Each key phrase is tried alternative by
//! alternative against the student's word sequence; the first alternative
//! found as a whole-word run is captured (its words are marked consumed) so it
//! cannot satisfy a later phrase. Phrases are processed in key order.

use crate::normalizer::KeyPhrase;

/// Student answer as a word sequence with per-word consumption marks.
///
/// A consumed word also breaks adjacency: a phrase cannot span a gap left by
/// an earlier capture.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateText {
    words: Vec<String>,
    consumed: Vec<bool>,
}

impl CandidateText {
    pub fn new(words: Vec<String>) -> Self {
        let consumed = vec![false; words.len()];
        Self { words, consumed }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Start index of the first unconsumed run equal to `phrase`
    pub fn find(&self, phrase: &[String]) -> Option<usize> {
        let n = phrase.len();
        if n == 0 || n > self.words.len() {
            return None;
        }

        (0..=self.words.len() - n).find(|&start| {
            (0..n).all(|k| !self.consumed[start + k] && self.words[start + k] == phrase[k])
        })
    }

    /// True when the run occurs, ignoring consumption
    pub fn contains(&self, phrase: &[String]) -> bool {
        let n = phrase.len();
        n > 0 && self.words.windows(n).any(|window| window == phrase)
    }

    /// Mark `len` words starting at `start` as consumed
    pub fn consume(&mut self, start: usize, len: usize) {
        for flag in self.consumed.iter_mut().skip(start).take(len) {
            *flag = true;
        }
    }

    /// Words not yet captured, in order
    pub fn remaining(&self) -> Vec<&str> {
        self.words
            .iter()
            .zip(&self.consumed)
            .filter(|(_, consumed)| !**consumed)
            .map(|(word, _)| word.as_str())
            .collect()
    }
}

/// Outcome of matching a key's phrases against one answer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhraseMatch {
    pub matched: usize,
    pub total: usize,
    /// Key phrases (as written) with no alternative found
    pub missing: Vec<String>,
}

/// Search-and-capture every key phrase in order
pub fn search_and_capture(phrases: &[KeyPhrase], candidate: &mut CandidateText) -> PhraseMatch {
    let mut result = PhraseMatch {
        total: phrases.len(),
        ..PhraseMatch::default()
    };

    for phrase in phrases {
        let hit = phrase
            .alternatives
            .iter()
            .find_map(|alt| candidate.find(alt).map(|start| (start, alt.len())));

        match hit {
            Some((start, len)) => {
                candidate.consume(start, len);
                result.matched += 1;
            }
            None => result.missing.push(phrase.text.clone()),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::Normalizer;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_find_whole_words_only() {
        let text = CandidateText::new(words("alguno singular"));
        assert_eq!(text.find(&words("uno")), None);
        assert_eq!(text.find(&words("singular")), Some(1));
    }

    #[test]
    fn test_consumed_words_break_runs() {
        let mut text = CandidateText::new(words("nombre comun comun"));
        text.consume(1, 1);
        assert_eq!(text.find(&words("nombre comun")), None);
        assert_eq!(text.find(&words("comun")), Some(2));
        assert!(text.contains(&words("nombre comun")));
        assert_eq!(text.remaining(), vec!["nombre", "comun"]);
    }

    #[test]
    fn test_alternative_captured_once() {
        let n = Normalizer::spanish();
        let phrases = n.key_phrases("masculino o femenino");
        let mut text = CandidateText::new(n.candidate_words("es masculino singular"));

        let result = search_and_capture(&phrases, &mut text);
        assert_eq!(result.matched, 1);
        assert!(result.missing.is_empty());
        assert_eq!(text.remaining(), vec!["es", "singular"]);
    }

    #[test]
    fn test_same_word_cannot_satisfy_two_phrases() {
        let n = Normalizer::spanish();
        let phrases = n.key_phrases("singular, singular o plural");
        let mut text = CandidateText::new(n.candidate_words("singular"));

        let result = search_and_capture(&phrases, &mut text);
        assert_eq!(result.matched, 1);
        assert_eq!(result.total, 2);
        assert_eq!(result.missing, vec!["singular o plural".to_string()]);
    }

    #[test]
    fn test_first_found_alternative_wins() {
        let n = Normalizer::spanish();
        let phrases = n.key_phrases("determinado o definido, determinado");
        // "definido" folds to "determinado" through the synonym table
        let mut text = CandidateText::new(n.candidate_words("determinado determinado"));

        let result = search_and_capture(&phrases, &mut text);
        assert_eq!(result.matched, 2);
    }

    #[test]
    fn test_empty_candidate() {
        let n = Normalizer::spanish();
        let phrases = n.key_phrases("nombre, comun");
        let mut text = CandidateText::new(Vec::new());

        let result = search_and_capture(&phrases, &mut text);
        assert_eq!(result.matched, 0);
        assert_eq!(result.missing.len(), 2);
    }
}
