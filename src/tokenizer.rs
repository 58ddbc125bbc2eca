use crate::log;
use regex::Regex;
use std::io::{self, BufRead};
use std::ops::Range;
use std::sync::LazyLock;

static TAG_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\[(\w+) ""#).expect("valid tag prefix regex"));

/// Tag keys the record builder understands. Matching is case-sensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagKey {
    Event,
    Site,
    Date,
    Round,
    White,
    Black,
    Result,
    WhiteElo,
    BlackElo,
    Eco,
    Opening,
}

impl TagKey {
    pub fn from_key(key: &str) -> Option<Self> {
        let tag = match key {
            "Event" => Self::Event,
            "Site" => Self::Site,
            "Date" => Self::Date,
            "Round" => Self::Round,
            "White" => Self::White,
            "Black" => Self::Black,
            "Result" => Self::Result,
            "WhiteElo" => Self::WhiteElo,
            "BlackElo" => Self::BlackElo,
            "ECO" => Self::Eco,
            "Opening" => Self::Opening,
            _ => return None,
        };
        Some(tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Site => "Site",
            Self::Date => "Date",
            Self::Round => "Round",
            Self::White => "White",
            Self::Black => "Black",
            Self::Result => "Result",
            Self::WhiteElo => "WhiteElo",
            Self::BlackElo => "BlackElo",
            Self::Eco => "ECO",
            Self::Opening => "Opening",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineEvent<'a> {
    Tag(TagKey, &'a str),
    MoveText(&'a str),
    Blank,
}

/// Classification that does not borrow the line, so the tokenizer can keep
/// reading past ignored lines before handing out a borrowed event.
enum LineKind {
    Tag(TagKey, Range<usize>),
    MoveText,
    Blank,
    Ignored,
}

impl LineKind {
    fn scan(line: &str) -> Self {
        if line.is_empty() {
            return Self::Blank;
        }
        if !line.starts_with('[') {
            return Self::MoveText;
        }

        let Some(caps) = TAG_PREFIX_RE.captures(line) else {
            return Self::Ignored;
        };
        let Some(key) = caps.get(1).and_then(|m| TagKey::from_key(m.as_str())) else {
            return Self::Ignored;
        };

        // The opening quote is the last byte of the prefix match.
        let value_start = caps.get(0).map_or(line.len(), |m| m.end());
        match line.rfind('"') {
            Some(value_end) if value_end > value_start => Self::Tag(key, value_start..value_end),
            _ => Self::Ignored,
        }
    }

    fn event(self, line: &str) -> Option<LineEvent<'_>> {
        match self {
            Self::Tag(key, range) => Some(LineEvent::Tag(key, &line[range])),
            Self::MoveText => Some(LineEvent::MoveText(line)),
            Self::Blank => Some(LineEvent::Blank),
            Self::Ignored => None,
        }
    }
}

/// Classifies a single line with its line terminator already removed.
///
/// Returns `None` for bracketed lines that are not a recognized
/// `[Key "value"]` tag; those are dropped without error.
pub fn classify_line(line: &str) -> Option<LineEvent<'_>> {
    LineKind::scan(line).event(line)
}

/// Pulls classified lines from a buffered source one at a time.
pub struct Tokenizer<R> {
    input: R,
    buffer: Vec<u8>,
    line: String,
    line_number: u64,
    ignored_tag_lines: u64,
}

impl<R: BufRead> Tokenizer<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            buffer: Vec::with_capacity(256),
            line: String::with_capacity(256),
            line_number: 0,
            ignored_tag_lines: 0,
        }
    }

    /// Next classified line, or `None` at end of input. Ignored tag lines are
    /// skipped and counted.
    pub fn next_event(&mut self) -> io::Result<Option<LineEvent<'_>>> {
        loop {
            if !self.read_line()? {
                return Ok(None);
            }

            let kind = LineKind::scan(&self.line);
            if let LineKind::Ignored = kind {
                self.ignored_tag_lines += 1;
                log::debug(format!(
                    "Ignored tag line {}: {}",
                    self.line_number, self.line
                ));
                continue;
            }

            return Ok(kind.event(&self.line));
        }
    }

    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub fn ignored_tag_lines(&self) -> u64 {
        self.ignored_tag_lines
    }

    fn read_line(&mut self) -> io::Result<bool> {
        self.buffer.clear();
        if self.input.read_until(b'\n', &mut self.buffer)? == 0 {
            return Ok(false);
        }

        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
            if self.buffer.last() == Some(&b'\r') {
                self.buffer.pop();
            }
        }

        self.line.clear();
        match std::str::from_utf8(&self.buffer) {
            Ok(text) => self.line.push_str(text),
            Err(_) => self.line.push_str(&String::from_utf8_lossy(&self.buffer)),
        }
        self.line_number += 1;
        Ok(true)
    }
}
