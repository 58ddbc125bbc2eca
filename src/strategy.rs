use crate::aggregate::StatsAggregator;
use crate::builder::GameStream;
use crate::error::{ProgressError, StatsError};
use crate::log;
use crate::reader::{self, CompressionMode};
use crate::types::{DatabaseStats, Game};
use std::fmt;
use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

pub const MATERIALIZING_PROGRESS_INTERVAL: u64 = 1_000;
pub const STREAMING_PROGRESS_INTERVAL: u64 = 10_000;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Strategy {
    /// Parse every game into memory, then aggregate in a second pass.
    #[default]
    Materializing,
    /// Aggregate each game as soon as it is parsed and drop it.
    Streaming,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Materializing => f.write_str("materializing"),
            Self::Streaming => f.write_str("streaming"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressStage {
    ParsingGames,
    AnalyzingGames,
    ProcessingGames,
    AnalyzingData,
    AnalysisComplete,
}

impl ProgressStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::ParsingGames => "Parsing games",
            Self::AnalyzingGames => "Analyzing games",
            Self::ProcessingGames => "Processing games",
            Self::AnalyzingData => "Analyzing data",
            Self::AnalysisComplete => "Analysis complete",
        }
    }
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Settings for a run over an archive file.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AnalyzeOptions {
    /// `None` picks the mode from the file extension.
    pub compression: Option<CompressionMode>,
    pub strategy: Strategy,
}

impl AnalyzeOptions {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            compression: None,
            strategy,
        }
    }

    pub fn with_compression(mut self, raw: &str) -> Result<Self, StatsError> {
        self.compression = Some(CompressionMode::parse(raw)?);
        Ok(self)
    }
}

/// Result of a materializing run: the retained games and their statistics.
#[derive(Debug, Clone, Default)]
pub struct MaterializedAnalysis {
    pub games: Vec<Game>,
    pub stats: DatabaseStats,
}

fn notify<P>(progress: &mut P, games: u64, stage: ProgressStage) -> Result<(), StatsError>
where
    P: FnMut(u64, ProgressStage) -> Result<(), ProgressError>,
{
    progress(games, stage).map_err(StatsError::Progress)
}

/// Progress sink for callers that do not want notifications.
pub fn no_progress(_: u64, _: ProgressStage) -> Result<(), ProgressError> {
    Ok(())
}

/// Parses every game first, then aggregates the retained sequence.
pub fn materialize<R, P>(input: R, mut progress: P) -> Result<MaterializedAnalysis, StatsError>
where
    R: BufRead,
    P: FnMut(u64, ProgressStage) -> Result<(), ProgressError>,
{
    let started = Instant::now();
    let mut stream = GameStream::new(input);
    let mut games = Vec::new();

    for game in stream.by_ref() {
        games.push(game?);
        let parsed = games.len() as u64;
        if parsed.is_multiple_of(MATERIALIZING_PROGRESS_INTERVAL) {
            notify(&mut progress, parsed, ProgressStage::ParsingGames)?;
        }
    }

    let ignored_tag_lines = stream.ignored_tag_lines();
    let names = stream.into_names();
    let parse_duration = started.elapsed();

    notify(&mut progress, 0, ProgressStage::AnalyzingData)?;
    let mut aggregator = StatsAggregator::new();
    for (index, game) in games.iter().enumerate() {
        aggregator.fold(game);
        // Reports the 0-based index of the game just folded: 0, 1000, 2000...
        let index = index as u64;
        if index.is_multiple_of(MATERIALIZING_PROGRESS_INTERVAL) {
            notify(&mut progress, index, ProgressStage::AnalyzingGames)?;
        }
    }

    let stats = aggregator.finish(names, ignored_tag_lines, parse_duration);
    notify(&mut progress, stats.total_games, ProgressStage::AnalysisComplete)?;

    Ok(MaterializedAnalysis { games, stats })
}

/// Aggregates each game as it is parsed; no game is retained after its fold.
pub fn stream<R, P>(input: R, mut progress: P) -> Result<DatabaseStats, StatsError>
where
    R: BufRead,
    P: FnMut(u64, ProgressStage) -> Result<(), ProgressError>,
{
    let started = Instant::now();
    let mut stream = GameStream::new(input);
    let mut aggregator = StatsAggregator::new();

    for game in stream.by_ref() {
        aggregator.fold(&game?);
        let folded = aggregator.games_folded();
        if folded.is_multiple_of(STREAMING_PROGRESS_INTERVAL) {
            notify(&mut progress, folded, ProgressStage::ProcessingGames)?;
        }
    }

    let ignored_tag_lines = stream.ignored_tag_lines();
    let names = stream.into_names();
    let total = aggregator.games_folded();

    notify(&mut progress, total, ProgressStage::AnalyzingData)?;
    let stats = aggregator.finish(names, ignored_tag_lines, started.elapsed());
    notify(&mut progress, total, ProgressStage::AnalysisComplete)?;

    Ok(stats)
}

/// Runs the chosen strategy over any buffered source.
pub fn analyze_reader<R, P>(
    input: R,
    strategy: Strategy,
    progress: P,
) -> Result<DatabaseStats, StatsError>
where
    R: BufRead,
    P: FnMut(u64, ProgressStage) -> Result<(), ProgressError>,
{
    let stats = match strategy {
        Strategy::Materializing => materialize(input, progress)?.stats,
        Strategy::Streaming => stream(input, progress)?,
    };

    if stats.ignored_tag_lines > 0 {
        log::warn(format!(
            "Ignored {} unrecognized or malformed tag line(s)",
            stats.ignored_tag_lines
        ));
    }
    Ok(stats)
}

pub fn analyze_file(path: impl AsRef<Path>, strategy: Strategy) -> Result<DatabaseStats, StatsError> {
    analyze_file_with(path, &AnalyzeOptions::new(strategy), no_progress)
}

pub fn analyze_file_with<P>(
    path: impl AsRef<Path>,
    options: &AnalyzeOptions,
    progress: P,
) -> Result<DatabaseStats, StatsError>
where
    P: FnMut(u64, ProgressStage) -> Result<(), ProgressError>,
{
    let path = path.as_ref();
    log::info(format!(
        "Analyzing '{}' ({} strategy)",
        path.display(),
        options.strategy
    ));

    let input = reader::open_archive(path, options.compression)?;
    let stats = analyze_reader(input, options.strategy, progress)?;

    log::info(format!(
        "Analyzed {} games, {} players, {} tournaments in {:.3}s",
        stats.total_games,
        stats.unique_players,
        stats.unique_tournaments,
        stats.parse_duration.as_secs_f64()
    ));
    Ok(stats)
}

/// Materializing run over a file that keeps the parsed games.
pub fn materialize_file<P>(
    path: impl AsRef<Path>,
    compression: Option<CompressionMode>,
    progress: P,
) -> Result<MaterializedAnalysis, StatsError>
where
    P: FnMut(u64, ProgressStage) -> Result<(), ProgressError>,
{
    let input = reader::open_archive(path.as_ref(), compression)?;
    materialize(input, progress)
}
