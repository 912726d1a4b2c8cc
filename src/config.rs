use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    error::{RecommendError, Result},
    recommender::tfidf::DEFAULT_MAX_FEATURES,
};

/// Dataset looked up in the working directory when nothing else is configured
pub const DATA_FILE: &str = "spotify_millsongdata.csv";
pub const DEFAULT_TOP_N: usize = 5;
/// Upper bound callers should enforce on `top_n`
pub const MAX_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub data_path: PathBuf,
    pub max_features: usize,
    pub default_top_n: usize,
    pub max_top_n: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DATA_FILE),
            max_features: DEFAULT_MAX_FEATURES,
            default_top_n: DEFAULT_TOP_N,
            max_top_n: MAX_TOP_N,
        }
    }
}

impl RecommenderConfig {
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_default_top_n(mut self, top_n: usize) -> Self {
        self.default_top_n = top_n;
        self
    }

    /// Accept `top_n` only within `1..=max_top_n`
    pub fn check_top_n(&self, top_n: usize) -> Result<usize> {
        if (1..=self.max_top_n).contains(&top_n) {
            Ok(top_n)
        } else {
            Err(RecommendError::InvalidTopN {
                top_n,
                max: self.max_top_n,
            })
        }
    }
}
