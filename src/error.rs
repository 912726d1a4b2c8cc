//! Error types for the recommender
//!
//! Load-time errors are terminal for the process: the service caches the
//! failed build and replays the same error to every caller.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    /// Backing dataset absent, or present but unreadable (a directory, an I/O error mid-read)
    #[error("Dataset not found. Please download {file} and place it in the project root directory. (looked for {path})")]
    DataSourceMissing { path: PathBuf, file: String },

    /// Required columns absent from the header
    #[error("Dataset {path} is malformed: missing required column(s) {missing:?}")]
    DataSourceMalformed { path: PathBuf, missing: Vec<String> },

    #[error("Song not found in dataset")]
    SongNotFound { song: String },

    /// Caller asked for a result count outside `1..=max`
    #[error("top_n must be between 1 and {max}, got {top_n}")]
    InvalidTopN { top_n: usize, max: usize },
}

impl RecommendError {
    pub(crate) fn missing(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        RecommendError::DataSourceMissing { path, file }
    }

    /// `true` for errors a caller can fix by changing the request
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RecommendError::SongNotFound { .. } | RecommendError::InvalidTopN { .. })
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dataset_message_names_the_file() {
        let err = RecommendError::missing("/data/spotify_millsongdata.csv");
        let msg = err.to_string();
        assert!(msg.starts_with("Dataset not found"));
        assert!(msg.contains("spotify_millsongdata.csv"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn song_not_found_is_recoverable() {
        let err = RecommendError::SongNotFound { song: "x".into() };
        assert_eq!(err.to_string(), "Song not found in dataset");
        assert!(err.is_recoverable());
    }

    #[test]
    fn invalid_top_n_names_the_bound() {
        let err = RecommendError::InvalidTopN { top_n: 11, max: 10 };
        assert_eq!(err.to_string(), "top_n must be between 1 and 10, got 11");
        assert!(err.is_recoverable());
    }
}
