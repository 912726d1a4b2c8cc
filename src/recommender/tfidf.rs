use std::time::Instant;

use num::{Float, NumCast};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    recommender::{
        analyzer::Analyzer,
        corpus::Corpus,
        token::TermFrequency,
        vocab::{DocumentFrequency, Vocabulary},
    },
    utils::math::vector::ZeroSpVec,
};

/// Default cap on vocabulary size
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Weighting strategy for the vectorizer
pub trait TFIDFEngine<N>
where
    N: Float,
{
    /// IDF weight per vocabulary column
    /// # Arguments
    /// * `df` - corpus statistics
    /// * `vocab` - selected vocabulary
    fn idf_vec(df: &DocumentFrequency, vocab: &Vocabulary) -> Vec<N>;

    /// Weighted vector of one document
    /// # Arguments
    /// * `freq` - term counts of the document
    /// * `vocab` - selected vocabulary
    /// * `idf` - output of `idf_vec`
    fn tfidf_vec(freq: &TermFrequency, vocab: &Vocabulary, idf: &[N]) -> ZeroSpVec<N>;
}

/// Default engine
/// - tf: raw count
/// - idf: `ln((1 + n) / (1 + df)) + 1`
/// - every row scaled to unit L2 length
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl DefaultTFIDFEngine {
    /// Smoothed IDF
    #[inline]
    pub fn idf_calc(doc_num: u64, doc_freq: u64) -> f64 {
        ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
    }
}

impl<N> TFIDFEngine<N> for DefaultTFIDFEngine
where
    N: Float,
{
    fn idf_vec(df: &DocumentFrequency, vocab: &Vocabulary) -> Vec<N> {
        let doc_num = df.get_doc_num();
        vocab
            .terms()
            .map(|term| {
                let idf = Self::idf_calc(doc_num, df.get_doc_freq(term));
                <N as NumCast>::from(idf).unwrap_or_else(N::zero)
            })
            .collect()
    }

    fn tfidf_vec(freq: &TermFrequency, vocab: &Vocabulary, idf: &[N]) -> ZeroSpVec<N> {
        let pairs = freq.iter().filter_map(|(term, count)| {
            let col = vocab.column(term)?;
            let tf = <N as NumCast>::from(count)?;
            let w = idf.get(col as usize).copied().unwrap_or_else(N::zero);
            Some((col, tf * w))
        });
        let mut vec = ZeroSpVec::from_pairs(vocab.len(), pairs);
        vec.normalize_l2();
        vec.shrink_to_fit();
        vec
    }
}

/// Vocabulary + IDF + one unit-length row per corpus document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TFIDFMatrix<N = f32>
where
    N: Float,
{
    pub vocabulary: Vocabulary,
    pub idf: Vec<N>,
    /// row `i` belongs to corpus document `i`
    pub rows: Vec<ZeroSpVec<N>>,
}

impl<N> TFIDFMatrix<N>
where
    N: Float,
{
    #[inline]
    pub fn row(&self, id: usize) -> Option<&ZeroSpVec<N>> {
        self.rows.get(id)
    }

    #[inline]
    pub fn doc_num(&self) -> usize {
        self.rows.len()
    }

    /// Non-zero weights stored over all rows
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.nnz()).sum()
    }
}

/// Fits a vocabulary and TF-IDF matrix to a corpus
#[derive(Debug, Clone)]
pub struct TFIDFVectorizer<E = DefaultTFIDFEngine> {
    pub analyzer: Analyzer,
    pub max_features: usize,
    _marker: std::marker::PhantomData<fn() -> E>,
}

impl Default for TFIDFVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl<E> TFIDFVectorizer<E> {
    pub fn new(max_features: usize) -> Self {
        Self {
            analyzer: Analyzer::default(),
            max_features,
            _marker: std::marker::PhantomData,
        }
    }

    /// Build the vocabulary and one row per document.
    /// An empty corpus yields an empty vocabulary and no rows.
    pub fn fit<N>(&self, corpus: &Corpus) -> TFIDFMatrix<N>
    where
        N: Float + Send + Sync,
        E: TFIDFEngine<N>,
    {
        let start = Instant::now();
        // 並列にトークン化, collect は入力順を保つ
        let freqs: Vec<TermFrequency> = corpus
            .documents
            .par_iter()
            .map(|doc| self.analyzer.term_frequency(&doc.combined_text()))
            .collect();
        let tokenized = Instant::now();

        let mut df = DocumentFrequency::new();
        for freq in &freqs {
            df.add_doc(freq);
        }
        let vocabulary = Vocabulary::select(&df, self.max_features);
        let idf = E::idf_vec(&df, &vocabulary);

        let rows: Vec<ZeroSpVec<N>> = freqs
            .par_iter()
            .map(|freq| E::tfidf_vec(freq, &vocabulary, &idf))
            .collect();

        tracing::debug!(
            tokenize = ?tokenized.duration_since(start),
            weight = ?tokenized.elapsed(),
            distinct_terms = df.vocab_size(),
            "tf-idf fit"
        );

        TFIDFMatrix { vocabulary, idf, rows }
    }
}
