use crate::error::StatsError;
use crate::tokenizer::{LineEvent, TagKey, Tokenizer};
use crate::types::Game;
use std::collections::HashSet;
use std::io::BufRead;
use std::mem;

/// Distinct values in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl NameRegistry {
    pub fn insert(&mut self, name: &str) {
        if !self.seen.contains(name) {
            self.seen.insert(name.to_string());
            self.ordered.push(name.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.ordered
    }

    pub fn into_names(self) -> Vec<String> {
        self.ordered
    }
}

/// Archive-wide distinct names registered from tag lines, independent of
/// which games were eventually aggregated.
#[derive(Debug, Clone, Default)]
pub struct ArchiveNames {
    pub tournaments: NameRegistry,
    pub players: NameRegistry,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordState {
    #[default]
    Idle,
    RecordOpen,
}

/// Builds one game at a time from classified lines.
#[derive(Debug, Default)]
pub struct GameBuilder {
    current: Game,
    state: RecordState,
    names: ArchiveNames,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RecordState {
        self.state
    }

    pub fn names(&self) -> &ArchiveNames {
        &self.names
    }

    pub fn into_names(self) -> ArchiveNames {
        self.names
    }

    /// Applies one line event, returning a game when it closes a record.
    pub fn apply(&mut self, event: LineEvent<'_>) -> Option<Game> {
        match event {
            LineEvent::Tag(key, value) => {
                self.set_tag(key, value);
                self.state = RecordState::RecordOpen;
                None
            }
            LineEvent::MoveText(line) => {
                // Overwrites: only the last movetext line of a record counts.
                self.current.ply_count = line.bytes().filter(|&b| b == b'.').count() as u32;
                None
            }
            LineEvent::Blank => self.finish(),
        }
    }

    /// Emits the pending game if a record is open. Called on a blank line and
    /// once more at end of input.
    pub fn finish(&mut self) -> Option<Game> {
        if self.state != RecordState::RecordOpen {
            return None;
        }
        self.state = RecordState::Idle;
        Some(mem::take(&mut self.current))
    }

    fn set_tag(&mut self, key: TagKey, value: &str) {
        let slot = match key {
            TagKey::Event => {
                self.names.tournaments.insert(value);
                &mut self.current.event
            }
            TagKey::White => {
                self.names.players.insert(value);
                &mut self.current.white
            }
            TagKey::Black => {
                self.names.players.insert(value);
                &mut self.current.black
            }
            TagKey::Site => &mut self.current.site,
            TagKey::Date => &mut self.current.date,
            TagKey::Round => &mut self.current.round,
            TagKey::Result => &mut self.current.result,
            TagKey::WhiteElo => &mut self.current.white_elo,
            TagKey::BlackElo => &mut self.current.black_elo,
            TagKey::Eco => &mut self.current.eco,
            TagKey::Opening => &mut self.current.opening,
        };

        slot.clear();
        slot.push_str(value);
    }
}

/// Lazy sequence of games read from one archive. Created fresh for each run.
pub struct GameStream<R> {
    tokenizer: Tokenizer<R>,
    builder: GameBuilder,
    finished: bool,
}

impl<R: BufRead> GameStream<R> {
    pub fn new(input: R) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            builder: GameBuilder::new(),
            finished: false,
        }
    }

    pub fn names(&self) -> &ArchiveNames {
        self.builder.names()
    }

    pub fn ignored_tag_lines(&self) -> u64 {
        self.tokenizer.ignored_tag_lines()
    }

    pub fn into_names(self) -> ArchiveNames {
        self.builder.into_names()
    }

    fn next_game(&mut self) -> Result<Option<Game>, StatsError> {
        while let Some(event) = self.tokenizer.next_event()? {
            if let Some(game) = self.builder.apply(event) {
                return Ok(Some(game));
            }
        }

        self.finished = true;
        Ok(self.builder.finish())
    }
}

impl<R: BufRead> Iterator for GameStream<R> {
    type Item = Result<Game, StatsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_game() {
            Ok(game) => game.map(Ok),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}
