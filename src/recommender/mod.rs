pub mod analyzer;
pub mod corpus;
pub mod evaluate;
pub mod stop_words;
pub mod tfidf;
pub mod token;
pub mod vocab;

use std::{
    collections::HashSet,
    sync::{Arc, OnceLock},
    time::Instant,
};

use serde::{Deserialize, Serialize};

use crate::{
    config::RecommenderConfig,
    error::{RecommendError, Result},
    recommender::{
        corpus::{Corpus, CorpusLoader},
        evaluate::scoring::SimilarityIndex,
        tfidf::{DefaultTFIDFEngine, TFIDFMatrix, TFIDFVectorizer},
    },
};

/// A recommended song with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSong {
    pub song: String,
    pub artist: String,
    pub score: f64,
}

/// Caller-facing result.
/// Serializes either as `{input_song, recommended_songs}` or as `{error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recommendation {
    Found {
        input_song: String,
        recommended_songs: Vec<String>,
    },
    Error {
        error: String,
    },
}

impl Recommendation {
    pub fn is_error(&self) -> bool {
        matches!(self, Recommendation::Error { .. })
    }

    /// Recommended titles, empty on error
    pub fn songs(&self) -> &[String] {
        match self {
            Recommendation::Found { recommended_songs, .. } => recommended_songs,
            Recommendation::Error { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub documents: usize,
    pub vocabulary: usize,
}

/// Corpus and its fitted TF-IDF matrix, immutable once built
#[derive(Debug)]
pub struct SongIndex {
    corpus: Arc<Corpus>,
    matrix: TFIDFMatrix<f32>,
}

impl SongIndex {
    pub fn build(corpus: Arc<Corpus>, max_features: usize) -> Self {
        let start = Instant::now();
        let matrix = TFIDFVectorizer::<DefaultTFIDFEngine>::new(max_features).fit(&corpus);
        tracing::info!(
            documents = matrix.doc_num(),
            vocabulary = matrix.vocabulary.len(),
            nnz = matrix.nnz(),
            "song index built"
        );
        tracing::debug!(elapsed = ?start.elapsed(), "song index build time");
        Self { corpus, matrix }
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.corpus.len(),
            vocabulary: self.matrix.vocabulary.len(),
        }
    }

    /// Songs most similar to `song`, best first.
    ///
    /// - the query is the first document titled exactly `song`
    /// - every document sharing the query's title is excluded
    /// - each remaining title appears once, at its best rank
    /// - at most `top_n` entries, fewer when the corpus runs out
    pub fn rank(&self, song: &str, top_n: usize) -> Result<Vec<ScoredSong>> {
        let not_found = || RecommendError::SongNotFound { song: song.to_string() };
        let id = self.corpus.find_first(song).ok_or_else(not_found)?;
        let query = self.matrix.row(id).ok_or_else(not_found)?;

        let start = Instant::now();
        let mut hits = SimilarityIndex::new(&self.matrix).score_all(query);
        hits.sort_by_score();

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(song);
        let mut ranked = Vec::with_capacity(top_n.min(hits.len()));
        for &(doc_id, score) in hits.iter() {
            if ranked.len() >= top_n {
                break;
            }
            let Some(doc) = self.corpus.get(doc_id) else { continue };
            if !seen.insert(doc.song.as_str()) {
                continue;
            }
            ranked.push(ScoredSong {
                song: doc.song.clone(),
                artist: doc.artist.clone(),
                score,
            });
        }
        tracing::debug!(song, top_n, returned = ranked.len(), elapsed = ?start.elapsed(), "ranked");
        Ok(ranked)
    }
}

/// Entry point for callers.
/// Loads and indexes the dataset at most once, on first use or on `warm_up`,
/// then answers queries concurrently without locking.
#[derive(Debug)]
pub struct RecommendationService {
    config: RecommenderConfig,
    loader: CorpusLoader,
    index: OnceLock<Result<Arc<SongIndex>>>,
}

impl RecommendationService {
    pub fn new(config: RecommenderConfig) -> Self {
        let loader = CorpusLoader::new(config.data_path.clone());
        Self {
            config,
            loader,
            index: OnceLock::new(),
        }
    }

    /// Service over an in-memory corpus; the configured data path is never read.
    pub fn from_corpus(corpus: Corpus, config: RecommenderConfig) -> Self {
        let index = SongIndex::build(Arc::new(corpus), config.max_features);
        Self {
            loader: CorpusLoader::new(config.data_path.clone()),
            config,
            index: OnceLock::from(Ok(Arc::new(index))),
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Shared index, built on the first call.
    /// A failed build is kept and returned to every later caller.
    pub fn index(&self) -> Result<Arc<SongIndex>> {
        self.index
            .get_or_init(|| {
                let index = self
                    .loader
                    .load()
                    .map(|corpus| Arc::new(SongIndex::build(corpus, self.config.max_features)));
                if let Err(e) = &index {
                    tracing::warn!(error = %e, "song index unavailable");
                }
                index
            })
            .clone()
    }

    /// Build the index now instead of on the first query
    pub fn warm_up(&self) -> Result<IndexStats> {
        self.index().map(|index| index.stats())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.index.get(), Some(Ok(_)))
    }

    /// Typed variant of [`recommend`](Self::recommend) keeping scores and errors
    pub fn try_recommend(&self, song: &str, top_n: usize) -> Result<Vec<ScoredSong>> {
        let index = self.index()?;
        index.rank(song, top_n).inspect_err(|e| {
            tracing::debug!(song, error = %e, "no recommendation");
        })
    }

    /// [`recommend`](Self::recommend) with the configured `default_top_n`
    pub fn recommend_default(&self, song: &str) -> Recommendation {
        self.recommend(song, self.config.default_top_n)
    }

    /// Recommend up to `top_n` titles similar to `song`.
    /// Never fails: every error becomes `Recommendation::Error`.
    pub fn recommend(&self, song: &str, top_n: usize) -> Recommendation {
        match self.try_recommend(song, top_n) {
            Ok(ranked) => Recommendation::Found {
                input_song: song.to_string(),
                recommended_songs: ranked.into_iter().map(|s| s.song).collect(),
            },
            Err(e) => Recommendation::Error { error: e.to_string() },
        }
    }
}
