//! CSV export of per-player and per-tournament statistics.
//!
//! Both files start with a header row and list one entity per row, sorted by
//! name. Scalar fields are plain CSV cells; ordered lists and count maps are
//! stored as JSON inside a single cell so every field survives a round trip:
//!
//! * players: `name, total_games, games_as_white, games_as_black, wins,
//!   losses, draws, win_percentage, draw_percentage, opponents (JSON array),
//!   opening_frequency (JSON object)`
//! * tournaments: `name, total_games, unique_players, players (JSON array),
//!   player_game_count (JSON object)`

use crate::error::StatsError;
use crate::types::{DatabaseStats, PlayerStats, Tournament};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

pub const PLAYER_COLUMNS: [&str; 11] = [
    "name",
    "total_games",
    "games_as_white",
    "games_as_black",
    "wins",
    "losses",
    "draws",
    "win_percentage",
    "draw_percentage",
    "opponents",
    "opening_frequency",
];

pub const TOURNAMENT_COLUMNS: [&str; 5] = [
    "name",
    "total_games",
    "unique_players",
    "players",
    "player_game_count",
];

#[derive(Debug, Serialize, Deserialize)]
struct PlayerRow {
    name: String,
    total_games: u64,
    games_as_white: u64,
    games_as_black: u64,
    wins: u64,
    losses: u64,
    draws: u64,
    win_percentage: f64,
    draw_percentage: f64,
    opponents: String,
    opening_frequency: String,
}

impl PlayerRow {
    fn from_stats(player: &PlayerStats) -> Result<Self, StatsError> {
        Ok(Self {
            name: player.name.clone(),
            total_games: player.total_games,
            games_as_white: player.games_as_white,
            games_as_black: player.games_as_black,
            wins: player.wins,
            losses: player.losses,
            draws: player.draws,
            win_percentage: player.win_percentage,
            draw_percentage: player.draw_percentage,
            opponents: to_json_cell("opponents", &player.opponents)?,
            opening_frequency: to_json_cell("opening_frequency", &player.opening_frequency)?,
        })
    }

    fn into_stats(self) -> Result<PlayerStats, StatsError> {
        let opponents: Vec<String> = from_json_cell("opponents", &self.opponents)?;
        let opening_frequency: BTreeMap<String, u64> =
            from_json_cell("opening_frequency", &self.opening_frequency)?;

        Ok(PlayerStats {
            name: self.name,
            total_games: self.total_games,
            games_as_white: self.games_as_white,
            games_as_black: self.games_as_black,
            wins: self.wins,
            losses: self.losses,
            draws: self.draws,
            win_percentage: self.win_percentage,
            draw_percentage: self.draw_percentage,
            opponents,
            opening_frequency,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TournamentRow {
    name: String,
    total_games: u64,
    unique_players: u64,
    players: String,
    player_game_count: String,
}

impl TournamentRow {
    fn from_stats(tournament: &Tournament) -> Result<Self, StatsError> {
        Ok(Self {
            name: tournament.name.clone(),
            total_games: tournament.total_games,
            unique_players: tournament.unique_players,
            players: to_json_cell("players", &tournament.players)?,
            player_game_count: to_json_cell("player_game_count", &tournament.player_game_count)?,
        })
    }

    fn into_stats(self) -> Result<Tournament, StatsError> {
        Ok(Tournament {
            name: self.name,
            total_games: self.total_games,
            unique_players: self.unique_players,
            players: from_json_cell("players", &self.players)?,
            player_game_count: from_json_cell("player_game_count", &self.player_game_count)?,
        })
    }
}

fn to_json_cell<T: Serialize>(column: &'static str, value: &T) -> Result<String, StatsError> {
    serde_json::to_string(value).map_err(|source| StatsError::Json { column, source })
}

fn from_json_cell<T: DeserializeOwned>(column: &'static str, cell: &str) -> Result<T, StatsError> {
    serde_json::from_str(cell).map_err(|source| StatsError::Json { column, source })
}

fn write_rows<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> Result<(), StatsError> {
    let file = File::create(path).map_err(|source| StatsError::Export {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| StatsError::Export {
        path: path.to_path_buf(),
        source,
    })
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StatsError> {
    let file = File::open(path).map_err(|source| StatsError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()?;
    Ok(rows)
}

pub fn export_player_stats_csv(
    stats: &DatabaseStats,
    path: impl AsRef<Path>,
) -> Result<(), StatsError> {
    let mut players: Vec<&PlayerStats> = stats.player_stats.values().collect();
    players.sort_by(|a, b| a.name.cmp(&b.name));

    let rows = players
        .into_iter()
        .map(PlayerRow::from_stats)
        .collect::<Result<Vec<_>, _>>()?;
    write_rows(path.as_ref(), &PLAYER_COLUMNS, &rows)
}

pub fn export_tournaments_csv(
    stats: &DatabaseStats,
    path: impl AsRef<Path>,
) -> Result<(), StatsError> {
    let mut tournaments: Vec<&Tournament> = stats.tournaments.values().collect();
    tournaments.sort_by(|a, b| a.name.cmp(&b.name));

    let rows = tournaments
        .into_iter()
        .map(TournamentRow::from_stats)
        .collect::<Result<Vec<_>, _>>()?;
    write_rows(path.as_ref(), &TOURNAMENT_COLUMNS, &rows)
}

pub fn read_player_stats_csv(path: impl AsRef<Path>) -> Result<Vec<PlayerStats>, StatsError> {
    read_rows::<PlayerRow>(path.as_ref())?
        .into_iter()
        .map(PlayerRow::into_stats)
        .collect()
}

pub fn read_tournaments_csv(path: impl AsRef<Path>) -> Result<Vec<Tournament>, StatsError> {
    read_rows::<TournamentRow>(path.as_ref())?
        .into_iter()
        .map(TournamentRow::into_stats)
        .collect()
}
