//! Player, tournament and result statistics over PGN game archives.
//!
//! An archive is read line by line, split into games, and folded into a
//! [`DatabaseStats`] snapshot by one of two strategies:
//!
//! - [`Strategy::Materializing`] keeps every parsed [`Game`] in memory and
//!   aggregates them in a second pass.
//! - [`Strategy::Streaming`] folds each game as soon as it is complete, so
//!   memory grows with the number of distinct players and tournaments only.
//!
//! Both strategies share the same tokenizer and produce identical statistics.
//!
//! ```no_run
//! use pgn_stats::{Strategy, analyze_file, export_player_stats_csv};
//!
//! let stats = analyze_file("twic1520.pgn", Strategy::Streaming)?;
//! println!("{} games, most active: {}", stats.total_games, stats.most_active_player);
//! export_player_stats_csv(&stats, "players.csv")?;
//! # Ok::<(), pgn_stats::StatsError>(())
//! ```
//!
//! Set `PGN_STATS_LOG` to `warn`, `info` or `debug` for diagnostics on stderr.

mod aggregate;
mod builder;
mod error;
mod export;
mod log;
mod reader;
mod strategy;
mod tokenizer;
mod types;

pub use aggregate::{StatsAggregator, finalize};
pub use builder::{ArchiveNames, GameBuilder, GameStream, NameRegistry, RecordState};
pub use error::{ProgressError, StatsError};
pub use export::{
    PLAYER_COLUMNS, TOURNAMENT_COLUMNS, export_player_stats_csv, export_tournaments_csv,
    read_player_stats_csv, read_tournaments_csv,
};
pub use reader::{ArchiveInput, CompressionMode, open_archive};
pub use strategy::{
    AnalyzeOptions, MATERIALIZING_PROGRESS_INTERVAL, MaterializedAnalysis, ProgressStage,
    STREAMING_PROGRESS_INTERVAL, Strategy, analyze_file, analyze_file_with, analyze_reader,
    materialize, materialize_file, no_progress, stream,
};
pub use tokenizer::{LineEvent, TagKey, Tokenizer, classify_line};
pub use types::{DatabaseStats, Game, GameResult, PlayerStats, Tournament};
