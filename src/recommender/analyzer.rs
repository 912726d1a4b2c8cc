use serde::{Deserialize, Serialize};

use crate::recommender::{stop_words::is_stop_word, token::TermFrequency};

/// Turns raw text into terms.
///
/// - splits on every non-alphabetic character
/// - lowercases
/// - drops terms shorter than `min_term_len` characters
/// - drops English stop words when `stop_words` is set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analyzer {
    pub min_term_len: usize,
    pub stop_words: bool,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            min_term_len: 2,
            stop_words: true,
        }
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terms of `text` in order of appearance
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphabetic())
            .filter(|raw| !raw.is_empty())
            .map(str::to_lowercase)
            .filter(|term| term.chars().count() >= self.min_term_len)
            .filter(|term| !(self.stop_words && is_stop_word(term)))
            .collect()
    }

    /// Count the terms of `text`
    pub fn term_frequency(&self, text: &str) -> TermFrequency {
        let mut freq = TermFrequency::new();
        freq.add_terms(&self.tokenize(text));
        freq
    }
}
