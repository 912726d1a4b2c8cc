//! This crate recommends songs with similar lyrics using a TF-IDF vector-space model.

pub mod config;
pub mod error;
pub mod logging;
pub mod recommender;
pub mod utils;

/// Recommendation Service
/// The top-level entry point of this crate.
/// It owns the dataset loader and lazily builds the TF-IDF index exactly once,
/// even when the first queries arrive concurrently.
///
/// `recommend` never fails: load errors and unknown songs come back as
/// `Recommendation::Error`, serialized as `{ "error": ... }`.
/// `try_recommend` returns the typed result with similarity scores instead.
pub use recommender::{IndexStats, Recommendation, RecommendationService, ScoredSong, SongIndex};

/// Corpus and Document
/// `Corpus` is the ordered list of songs read from the dataset.
/// Rows with an empty `song`, `artist` or `text` are dropped at load time.
/// The position of a document is its row in the TF-IDF matrix.
///
/// `CorpusLoader` reads the dataset once and caches the result, failures included.
pub use recommender::corpus::{Corpus, CorpusLoader, Document};

/// TF-IDF Vectorizer
/// Fits a vocabulary (top `max_features` terms by corpus frequency) and one
/// unit-length TF-IDF row per document.
///
/// Weighting is pluggable through `TFIDFEngine`; `DefaultTFIDFEngine` uses
/// raw term counts and the smoothed IDF `ln((1 + n) / (1 + df)) + 1`.
pub use recommender::tfidf::{DefaultTFIDFEngine, TFIDFEngine, TFIDFMatrix, TFIDFVectorizer};

/// Similarity Index and Hits
/// - `SimilarityIndex`: cosine similarity of a query row against every row
/// - `Hits`: scored results with a stable descending sort
pub use recommender::evaluate::scoring::{Hits, SimilarityIndex};

pub use recommender::{analyzer::Analyzer, token::TermFrequency, vocab::{DocumentFrequency, Vocabulary}};

pub use config::RecommenderConfig;
pub use error::{RecommendError, Result};
