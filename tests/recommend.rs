use std::{fs, path::PathBuf, sync::Arc, thread};

use song_recommender::{
    Recommendation, RecommendError, RecommendationService, RecommenderConfig,
};
use tempfile::TempDir;

fn write_dataset(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("spotify_millsongdata.csv");
    fs::write(&path, contents).unwrap();
    path
}

fn service_for(path: PathBuf) -> RecommendationService {
    RecommendationService::new(RecommenderConfig::default().with_data_path(path))
}

const DATASET: &str = "artist,song,link,text\n\
Beatles,Yesterday,/b/y,\"Troubles seemed so far away, believe in yesterday\"\n\
Beatles,Help,/b/h,\"Need somebody, help, not just anybody\"\n\
Beatles,Let It Be,/b/l,\"Troubles seemed so far away, believe in yesterday\"\n\
Queen,Yesterday,/q/y,\"Galileo magnifico scaramouche fandango\"\n\
Queen,Radio Ga Ga,/q/r,\n\
Queen,Bohemian Rhapsody,/q/b,\"Scaramouche fandango thunderbolt lightning Galileo\"\n";

#[test]
fn recommends_from_csv_on_disk() {
    let dir = TempDir::new().unwrap();
    let service = service_for(write_dataset(&dir, DATASET));

    let result = service.recommend("Yesterday", 2);
    assert_eq!(
        result,
        Recommendation::Found {
            input_song: "Yesterday".into(),
            recommended_songs: vec!["Let It Be".into(), "Help".into()],
        }
    );
}

#[test]
fn query_title_never_comes_back_even_when_duplicated() {
    let dir = TempDir::new().unwrap();
    let service = service_for(write_dataset(&dir, DATASET));

    for n in 1..=10 {
        let songs = service.recommend("Yesterday", n).songs().to_vec();
        assert!(!songs.iter().any(|s| s == "Yesterday"));
        assert!(songs.len() <= n);
        let mut unique = songs.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), songs.len());
    }
}

#[test]
fn incomplete_rows_are_not_recommended() {
    let dir = TempDir::new().unwrap();
    let service = service_for(write_dataset(&dir, DATASET));

    let songs = service.recommend("Help", 10).songs().to_vec();
    assert!(!songs.iter().any(|s| s == "Radio Ga Ga"));
    assert_eq!(songs.len(), 3);
    assert!(service.recommend("Radio Ga Ga", 5).is_error());
}

#[test]
fn missing_dataset_is_reported_not_raised() {
    let dir = TempDir::new().unwrap();
    let service = service_for(dir.path().join("spotify_millsongdata.csv"));

    match service.recommend("Yesterday", 5) {
        Recommendation::Error { error } => {
            assert!(error.contains("Dataset not found"));
            assert!(error.contains("spotify_millsongdata.csv"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    // the failed load is terminal, even once the file shows up
    write_dataset(&dir, DATASET);
    assert!(service.recommend("Yesterday", 5).is_error());
}

#[test]
fn unreadable_dataset_path_is_reported_as_missing() {
    let dir = TempDir::new().unwrap();
    let service = service_for(dir.path().to_path_buf());

    let err = service.try_recommend("Yesterday", 5).unwrap_err();
    assert!(matches!(err, RecommendError::DataSourceMissing { .. }));
    match service.recommend("Yesterday", 5) {
        Recommendation::Error { error } => assert!(error.contains("Dataset not found")),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn default_top_n_follows_config() {
    let dir = TempDir::new().unwrap();
    let config = RecommenderConfig::default()
        .with_data_path(write_dataset(&dir, DATASET))
        .with_default_top_n(1);
    let service = RecommendationService::new(config);

    assert_eq!(service.recommend_default("Yesterday").songs(), ["Let It Be".to_string()]);
    assert!(service.config().check_top_n(11).is_err());
}

#[test]
fn malformed_header_is_reported() {
    let dir = TempDir::new().unwrap();
    let service = service_for(write_dataset(&dir, "title,artist,text\nA,B,C\n"));

    let err = service.try_recommend("A", 5).unwrap_err();
    assert!(matches!(err, RecommendError::DataSourceMalformed { .. }));
    assert!(service.recommend("A", 5).is_error());
}

#[test]
fn unknown_song_is_reported() {
    let dir = TempDir::new().unwrap();
    let service = service_for(write_dataset(&dir, DATASET));

    let result = service.recommend("__no_such_song__", 5);
    assert_eq!(result, Recommendation::Error { error: "Song not found in dataset".into() });
    assert!(service.is_ready());
}

#[test]
fn concurrent_first_requests_share_one_index() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(service_for(write_dataset(&dir, DATASET)));

    let results: Vec<Recommendation> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                s.spawn(move || service.recommend("Bohemian Rhapsody", 3))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for r in &results {
        assert_eq!(r, &results[0]);
    }
    let first = service.index().unwrap();
    let second = service.index().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.stats().documents, 5);
}

#[test]
fn eager_warm_up_reports_sizes() {
    let dir = TempDir::new().unwrap();
    let service = service_for(write_dataset(&dir, DATASET));

    assert!(!service.is_ready());
    let stats = service.warm_up().unwrap();
    assert_eq!(stats.documents, 5);
    assert!(stats.vocabulary > 0);
    assert!(service.is_ready());
}
