use crate::builder::ArchiveNames;
use crate::types::{DatabaseStats, Game, GameResult, PlayerStats, Tournament};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Clone, Copy)]
enum Color {
    White,
    Black,
}

/// Folds games into per-player, per-tournament and archive-wide counters.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    games: u64,
    white_wins: u64,
    black_wins: u64,
    draws: u64,
    unknown_results: u64,
    players: HashMap<String, PlayerStats>,
    tournaments: HashMap<String, Tournament>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games_folded(&self) -> u64 {
        self.games
    }

    /// Folds one game. Each game must be folded exactly once.
    pub fn fold(&mut self, game: &Game) {
        let result = game.result();

        self.update_player(&game.white, &game.black, Color::White, result, &game.eco);
        self.update_player(&game.black, &game.white, Color::Black, result, &game.eco);
        self.update_tournament(game);

        match result {
            GameResult::WhiteWin => self.white_wins += 1,
            GameResult::BlackWin => self.black_wins += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::Unknown => self.unknown_results += 1,
        }
        self.games += 1;
    }

    fn update_player(
        &mut self,
        name: &str,
        opponent: &str,
        color: Color,
        result: GameResult,
        eco: &str,
    ) {
        let player = self
            .players
            .entry(name.to_string())
            .or_insert_with(|| PlayerStats::new(name));

        player.total_games += 1;
        match color {
            Color::White => player.games_as_white += 1,
            Color::Black => player.games_as_black += 1,
        }

        match (color, result) {
            (Color::White, GameResult::WhiteWin) | (Color::Black, GameResult::BlackWin) => {
                player.wins += 1
            }
            (Color::White, GameResult::BlackWin) | (Color::Black, GameResult::WhiteWin) => {
                player.losses += 1
            }
            (_, GameResult::Draw) => player.draws += 1,
            (_, GameResult::Unknown) => {}
        }

        if !player.opponents.iter().any(|known| known == opponent) {
            player.opponents.push(opponent.to_string());
        }

        if !eco.is_empty() {
            *player.opening_frequency.entry(eco.to_string()).or_insert(0) += 1;
        }
    }

    fn update_tournament(&mut self, game: &Game) {
        let tournament = self
            .tournaments
            .entry(game.event.clone())
            .or_insert_with(|| Tournament::new(&game.event));

        tournament.total_games += 1;
        for name in [&game.white, &game.black] {
            if !tournament.players.contains(name) {
                tournament.players.push(name.clone());
            }
            *tournament.player_game_count.entry(name.clone()).or_insert(0) += 1;
        }
        tournament.unique_players = tournament.players.len() as u64;
    }

    /// Consumes the aggregator into a finalized snapshot.
    pub fn finish(
        self,
        names: ArchiveNames,
        ignored_tag_lines: u64,
        parse_duration: Duration,
    ) -> DatabaseStats {
        let mut stats = DatabaseStats {
            total_games: self.games,
            unique_tournaments: names.tournaments.len() as u64,
            unique_players: names.players.len() as u64,
            white_wins: self.white_wins,
            black_wins: self.black_wins,
            draws: self.draws,
            unknown_results: self.unknown_results,
            parse_duration,
            tournament_names: names.tournaments.into_names(),
            player_names: names.players.into_names(),
            player_stats: self.players,
            tournaments: self.tournaments,
            ignored_tag_lines,
            ..DatabaseStats::default()
        };
        finalize(&mut stats);
        stats
    }
}

/// Computes percentages and picks the most active player and the largest
/// tournament. Ties go to the lexicographically smallest name. Safe to run
/// more than once.
pub fn finalize(stats: &mut DatabaseStats) {
    for player in stats.player_stats.values_mut() {
        player.calculate_percentages();
    }

    let (name, games) = busiest(
        stats
            .player_stats
            .iter()
            .map(|(name, player)| (name, player.total_games)),
    );
    stats.most_active_player = name;
    stats.max_games_by_player = games;

    let (name, games) = busiest(
        stats
            .tournaments
            .iter()
            .map(|(name, tournament)| (name, tournament.total_games)),
    );
    stats.largest_tournament = name;
    stats.max_games_in_tournament = games;
}

fn busiest<'a>(entries: impl Iterator<Item = (&'a String, u64)>) -> (String, u64) {
    let mut best: Option<(&String, u64)> = None;
    for (name, games) in entries {
        best = match best {
            Some((best_name, best_games))
                if best_games > games || (best_games == games && best_name <= name) =>
            {
                Some((best_name, best_games))
            }
            _ => Some((name, games)),
        };
    }

    best.map(|(name, games)| (name.clone(), games))
        .unwrap_or_default()
}
