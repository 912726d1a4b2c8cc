use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use song_recommender::{
    config::DATA_FILE,
    logging, Recommendation, RecommendationService, RecommenderConfig,
};

/// Recommend songs with similar lyrics.
///
/// Examples:
///   song-recommender "Bohemian Rhapsody"
///   song-recommender --top-n 10 --data ./songs.csv "Yesterday" "Help!"
///   cat titles.txt | song-recommender
#[derive(Debug, Parser)]
#[command(name = "song-recommender", version, about)]
struct Cli {
    /// Song titles to query; reads one title per line from stdin when omitted
    songs: Vec<String>,

    /// CSV dataset with `song`, `artist` and `text` columns
    #[arg(long, env = "SONG_RECOMMENDER_DATA", default_value = DATA_FILE)]
    data: PathBuf,

    /// Number of recommendations per song [default: 5, max: 10]
    #[arg(long, short = 'n')]
    top_n: Option<usize>,

    /// Vocabulary size cap
    #[arg(long, default_value_t = song_recommender::recommender::tfidf::DEFAULT_MAX_FEATURES)]
    max_features: usize,

    /// Build the index before reading the first query
    #[arg(long)]
    eager: bool,

    /// Log level (error, warn, info, debug, trace) or a full filter directive
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Shorthand for --log-level debug
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the service can load its dataset
    Status,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("failed to initialize logging: {e}");
    }

    let mut config = RecommenderConfig::default()
        .with_data_path(cli.data.clone())
        .with_max_features(cli.max_features);
    if let Some(top_n) = cli.top_n {
        match config.check_top_n(top_n) {
            Ok(top_n) => config = config.with_default_top_n(top_n),
            Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
        }
    }
    let service = RecommendationService::new(config);

    let result = match &cli.command {
        Some(Command::Status) => status(&service),
        None => run(&service, &cli),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "output failed");
            ExitCode::FAILURE
        }
    }
}

fn status(service: &RecommendationService) -> io::Result<ExitCode> {
    let mut stdout = io::stdout().lock();
    let (body, code) = match service.warm_up() {
        Ok(stats) => (
            serde_json::json!({
                "message": "Song Recommendation API is running",
                "documents": stats.documents,
                "vocabulary": stats.vocabulary,
            }),
            ExitCode::SUCCESS,
        ),
        Err(e) => (serde_json::json!({ "error": e.to_string() }), ExitCode::FAILURE),
    };
    writeln!(stdout, "{body}")?;
    Ok(code)
}

fn run(service: &RecommendationService, cli: &Cli) -> io::Result<ExitCode> {
    if cli.eager {
        let start = Instant::now();
        match service.warm_up() {
            Ok(stats) => tracing::info!(
                documents = stats.documents,
                vocabulary = stats.vocabulary,
                elapsed = ?start.elapsed(),
                "index ready"
            ),
            Err(e) => tracing::warn!(error = %e, "eager build failed"),
        }
    }

    let mut stdout = io::stdout().lock();
    let mut failed = false;
    let mut answer = |song: &str, out: &mut io::StdoutLock<'_>| -> io::Result<()> {
        let result = service.recommend_default(song);
        failed |= result.is_error();
        print_result(out, &result)
    };

    if !cli.songs.is_empty() {
        for song in &cli.songs {
            answer(song, &mut stdout)?;
        }
    } else {
        for line in io::stdin().lock().lines() {
            let line = line?;
            let song = line.trim_end_matches('\r');
            if song.trim().is_empty() {
                continue;
            }
            if song.eq_ignore_ascii_case("exit") || song.eq_ignore_ascii_case("quit") {
                break;
            }
            answer(song, &mut stdout)?;
        }
    }
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn print_result(out: &mut impl Write, result: &Recommendation) -> io::Result<()> {
    let json = serde_json::to_string(result).map_err(io::Error::other)?;
    writeln!(out, "{json}")?;
    out.flush()
}
