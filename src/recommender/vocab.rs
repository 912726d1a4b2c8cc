use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::recommender::token::TermFrequency;

/// Corpus-wide term statistics, filled one document at a time.
/// Keeps first-seen term order so that later selection is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFrequency {
    /// number of documents added
    pub doc_num: u64,
    /// term -> (documents containing it, total occurrences)
    #[serde(with = "indexmap::map::serde_seq")]
    pub term_counts: IndexMap<Box<str>, TermStats>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermStats {
    pub doc_freq: u64,
    pub total_freq: u64,
}

impl DocumentFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document's terms
    pub fn add_doc(&mut self, freq: &TermFrequency) {
        self.doc_num += 1;
        for (term, count) in freq.iter() {
            let stats = self.term_counts.entry(Box::from(term)).or_default();
            stats.doc_freq += 1;
            stats.total_freq += count as u64;
        }
    }

    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Number of documents containing `term`
    #[inline]
    pub fn get_doc_freq(&self, term: &str) -> u64 {
        self.term_counts.get(term).map_or(0, |s| s.doc_freq)
    }

    /// Occurrences of `term` across the whole corpus
    #[inline]
    pub fn get_total_freq(&self, term: &str) -> u64 {
        self.term_counts.get(term).map_or(0, |s| s.total_freq)
    }

    /// distinct terms seen so far
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }
}

/// Term -> column mapping used as vector dimensions.
/// The position of a term in `terms` is its column index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexSet<Box<str>>,
}

impl Vocabulary {
    /// Pick the `max_features` terms with the highest corpus-wide occurrence count.
    /// Equal counts keep first-seen order (stable sort).
    pub fn select(df: &DocumentFrequency, max_features: usize) -> Self {
        let mut ranked: Vec<(&Box<str>, u64)> = df
            .term_counts
            .iter()
            .map(|(term, stats)| (term, stats.total_freq))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(max_features);

        Self {
            terms: ranked.into_iter().map(|(term, _)| term.clone()).collect(),
        }
    }

    #[inline]
    pub fn column(&self, term: &str) -> Option<u32> {
        self.terms.get_index_of(term).map(|i| i as u32)
    }

    /// terms in column order
    #[inline]
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.iter().map(|t| t.as_ref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
