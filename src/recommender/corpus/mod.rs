use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
    time::Instant,
};

use serde::{Deserialize, Serialize};

use crate::error::{RecommendError, Result};

/// Columns every dataset must provide
pub const SONG_COLUMN: &str = "song";
pub const ARTIST_COLUMN: &str = "artist";
pub const LYRICS_COLUMN: &str = "text";

/// One song record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub song: String,
    pub artist: String,
    pub lyrics: String,
}

impl Document {
    pub fn new(song: impl Into<String>, artist: impl Into<String>, lyrics: impl Into<String>) -> Self {
        Self {
            song: song.into(),
            artist: artist.into(),
            lyrics: lyrics.into(),
        }
    }

    /// song, artist and lyrics joined by a single space
    pub fn combined_text(&self) -> String {
        let mut text = String::with_capacity(self.song.len() + self.artist.len() + self.lyrics.len() + 2);
        text.push_str(&self.song);
        text.push(' ');
        text.push_str(&self.artist);
        text.push(' ');
        text.push_str(&self.lyrics);
        text
    }
}

/// Ordered song records.
/// The position of a document is its id and matches its row in the TF-IDF matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub documents: Vec<Document>,
    /// rows skipped at load time because a required field was empty
    pub dropped: usize,
}

impl Corpus {
    /// Build from already validated documents.
    /// Incomplete documents are dropped the same way the loader does.
    pub fn from_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        let mut corpus = Corpus::default();
        for doc in documents {
            if doc.song.is_empty() || doc.artist.is_empty() || doc.lyrics.is_empty() {
                corpus.dropped += 1;
            } else {
                corpus.documents.push(doc);
            }
        }
        corpus
    }

    /// Read a CSV dataset from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "dataset not readable");
            RecommendError::missing(path)
        })?;
        Self::load_from_reader(file, path)
    }

    /// Read CSV from any reader.
    /// `source` only labels errors and logs.
    pub fn load_from_reader<R: Read>(reader: R, source: &Path) -> Result<Self> {
        let start = Instant::now();
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        // flexible byte records only fail on I/O, which means the source is unreadable
        let read_err = |e: csv::Error| {
            tracing::warn!(source = %source.display(), error = %e, "dataset not readable");
            RecommendError::missing(source)
        };

        let headers = reader.byte_headers().map_err(read_err)?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| String::from_utf8_lossy(h).trim() == name)
        };
        let (song_idx, artist_idx, lyrics_idx) = match (
            column(SONG_COLUMN),
            column(ARTIST_COLUMN),
            column(LYRICS_COLUMN),
        ) {
            (Some(s), Some(a), Some(l)) => (s, a, l),
            (s, a, l) => {
                let missing = [(SONG_COLUMN, s), (ARTIST_COLUMN, a), (LYRICS_COLUMN, l)]
                    .into_iter()
                    .filter(|(_, idx)| idx.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect();
                return Err(RecommendError::DataSourceMalformed {
                    path: source.to_path_buf(),
                    missing,
                });
            }
        };

        let mut documents = Vec::new();
        let mut dropped = 0usize;
        for record in reader.byte_records() {
            let record = record.map_err(read_err)?;
            let field = |idx: usize| {
                record
                    .get(idx)
                    .filter(|v| !v.is_empty())
                    .map(|v| String::from_utf8_lossy(v).into_owned())
            };
            match (field(song_idx), field(artist_idx), field(lyrics_idx)) {
                (Some(song), Some(artist), Some(lyrics)) => {
                    documents.push(Document { song, artist, lyrics })
                }
                _ => dropped += 1,
            }
        }

        tracing::info!(
            source = %source.display(),
            documents = documents.len(),
            dropped,
            "corpus loaded"
        );
        tracing::debug!(elapsed = ?start.elapsed(), "corpus load time");
        Ok(Corpus { documents, dropped })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[inline]
    pub fn get(&self, id: usize) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Id of the first document titled exactly `song`
    pub fn find_first(&self, song: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.song == song)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }
}

/// Loads a dataset once and hands out the cached result afterwards.
/// Concurrent first callers block until the single read finishes.
#[derive(Debug)]
pub struct CorpusLoader {
    path: PathBuf,
    cache: OnceLock<Result<Arc<Corpus>>>,
}

impl CorpusLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: OnceLock::new(),
        }
    }

    /// Read the source on the first call, return the cached result afterwards.
    /// A failed read is cached too.
    pub fn load(&self) -> Result<Arc<Corpus>> {
        self.cache
            .get_or_init(|| Corpus::load(&self.path).map(Arc::new))
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_str(csv: &str) -> Result<Corpus> {
        Corpus::load_from_reader(csv.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn combined_text_joins_fields_with_spaces() {
        let doc = Document::new("Help", "The Beatles", "I need somebody");
        assert_eq!(doc.combined_text(), "Help The Beatles I need somebody");
    }

    #[test]
    fn loads_rows_in_source_order_and_ignores_extra_columns() {
        let corpus = load_str(
            "artist,song,link,text\n\
             ABBA,Waterloo,/a/w,\"My my, at Waterloo\"\n\
             ABBA,Fernando,/a/f,Can you hear the drums\n",
        )
        .unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.dropped, 0);
        assert_eq!(corpus.documents[0], Document::new("Waterloo", "ABBA", "My my, at Waterloo"));
        assert_eq!(corpus.documents[1].song, "Fernando");
    }

    #[test]
    fn drops_incomplete_rows_silently() {
        let corpus = load_str(
            "song,artist,text\n\
             One,U2,one love\n\
             ,U2,no title\n\
             Two,,no artist\n\
             Three,U2,\n\
             Short,U2\n\
             Four,U2,four lyrics\n",
        )
        .unwrap();
        let titles: Vec<&str> = corpus.iter().map(|d| d.song.as_str()).collect();
        assert_eq!(titles, vec!["One", "Four"]);
        assert_eq!(corpus.dropped, 4);
    }

    #[test]
    fn missing_columns_are_reported() {
        let err = load_str("song,artist,lyrics\nA,B,C\n").unwrap_err();
        match err {
            RecommendError::DataSourceMalformed { missing, .. } => {
                assert_eq!(missing, vec!["text".to_string()])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_data_source_missing() {
        let err = Corpus::load("/definitely/not/here/songs.csv").unwrap_err();
        assert!(matches!(err, RecommendError::DataSourceMissing { .. }));
        assert!(err.to_string().contains("songs.csv"));
    }

    #[test]
    fn directory_is_data_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Corpus::load(dir.path()).unwrap_err();
        assert!(matches!(err, RecommendError::DataSourceMissing { .. }));
    }

    #[test]
    fn failing_reader_is_data_source_missing() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk went away"))
            }
        }
        let err = Corpus::load_from_reader(Broken, Path::new("broken.csv")).unwrap_err();
        assert_eq!(err, RecommendError::missing("broken.csv"));
    }

    #[test]
    fn header_only_source_gives_empty_corpus() {
        let corpus = load_str("song,artist,text\n").unwrap();
        assert!(corpus.is_empty());
    }

    #[test]
    fn find_first_returns_earliest_duplicate() {
        let corpus = Corpus::from_documents(vec![
            Document::new("A", "x", "aa"),
            Document::new("B", "x", "bb"),
            Document::new("B", "y", "cc"),
        ]);
        assert_eq!(corpus.find_first("B"), Some(1));
        assert_eq!(corpus.find_first("b"), None);
    }

    #[test]
    fn from_documents_drops_incomplete() {
        let corpus = Corpus::from_documents(vec![Document::new("A", "", "aa"), Document::new("B", "x", "bb")]);
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.dropped, 1);
    }

    #[test]
    fn loader_caches_failures() {
        let loader = CorpusLoader::new("/definitely/not/here/songs.csv");
        assert!(!loader.is_loaded());
        assert!(loader.load().is_err());
        assert!(loader.is_loaded());
        assert_eq!(loader.load().unwrap_err(), loader.load().unwrap_err());
    }
}
