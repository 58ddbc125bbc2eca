use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// One archive record. Tags missing from the record keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Game {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
    pub result: String,
    pub white_elo: String,
    pub black_elo: String,
    pub eco: String,
    pub opening: String,

    /// Count of `.` on the last movetext line seen for the record.
    pub ply_count: u32,
}

impl Game {
    pub fn result(&self) -> GameResult {
        GameResult::from_code(&self.result)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
    Unknown,
}

impl GameResult {
    /// `*`, the empty string and any unrecognized code are `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "1-0" => Self::WhiteWin,
            "0-1" => Self::BlackWin,
            "1/2-1/2" => Self::Draw,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStats {
    pub name: String,
    pub total_games: u64,
    pub games_as_white: u64,
    pub games_as_black: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    /// Zero until the stats are finalized.
    pub win_percentage: f64,
    /// Zero until the stats are finalized.
    pub draw_percentage: f64,
    /// Distinct opponents in first-seen order.
    pub opponents: Vec<String>,
    pub opening_frequency: BTreeMap<String, u64>,
}

impl PlayerStats {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn calculate_percentages(&mut self) {
        if self.total_games == 0 {
            self.win_percentage = 0.0;
            self.draw_percentage = 0.0;
            return;
        }

        let total = self.total_games as f64;
        self.win_percentage = 100.0 * self.wins as f64 / total;
        self.draw_percentage = 100.0 * self.draws as f64 / total;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tournament {
    pub name: String,
    pub total_games: u64,
    pub unique_players: u64,
    /// Distinct participants in first-seen order.
    pub players: Vec<String>,
    pub player_game_count: BTreeMap<String, u64>,
}

impl Tournament {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Snapshot produced by one run over an archive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseStats {
    pub total_games: u64,
    pub unique_tournaments: u64,
    pub unique_players: u64,

    pub white_wins: u64,
    pub black_wins: u64,
    pub draws: u64,
    pub unknown_results: u64,

    pub most_active_player: String,
    pub max_games_by_player: u64,
    pub largest_tournament: String,
    pub max_games_in_tournament: u64,

    /// Wall time of the tokenizing pass. Strategy and run specific.
    pub parse_duration: Duration,

    /// Distinct `Event` values in first-seen order.
    pub tournament_names: Vec<String>,
    /// Distinct `White`/`Black` values in first-seen order.
    pub player_names: Vec<String>,

    pub player_stats: HashMap<String, PlayerStats>,
    pub tournaments: HashMap<String, Tournament>,

    /// Bracketed lines dropped by the tokenizer.
    pub ignored_tag_lines: u64,
}

impl DatabaseStats {
    pub fn player(&self, name: &str) -> Option<&PlayerStats> {
        self.player_stats.get(name)
    }

    pub fn tournament(&self, name: &str) -> Option<&Tournament> {
        self.tournaments.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_codes() {
        assert_eq!(GameResult::from_code("1-0"), GameResult::WhiteWin);
        assert_eq!(GameResult::from_code("0-1"), GameResult::BlackWin);
        assert_eq!(GameResult::from_code("1/2-1/2"), GameResult::Draw);
        assert_eq!(GameResult::from_code("*"), GameResult::Unknown);
        assert_eq!(GameResult::from_code(""), GameResult::Unknown);
        assert_eq!(GameResult::from_code("1-0 "), GameResult::Unknown);
    }

    #[test]
    fn test_game_result_uses_result_tag() {
        let game = Game {
            result: "0-1".to_string(),
            ..Game::default()
        };
        assert_eq!(game.result(), GameResult::BlackWin);
        assert_eq!(Game::default().result(), GameResult::Unknown);
    }

    #[test]
    fn test_percentages_zero_without_games() {
        let mut player = PlayerStats::new("Nobody");
        player.calculate_percentages();
        assert_eq!(player.win_percentage, 0.0);
        assert_eq!(player.draw_percentage, 0.0);
    }

    #[test]
    fn test_percentages() {
        let mut player = PlayerStats {
            total_games: 4,
            wins: 1,
            draws: 2,
            losses: 1,
            ..PlayerStats::new("Carlsen")
        };
        player.calculate_percentages();
        assert_eq!(player.win_percentage, 25.0);
        assert_eq!(player.draw_percentage, 50.0);
    }
}
