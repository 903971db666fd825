//! Structured `Key: value` trailers at the tail of free text.
//!
//! Only the keys the sync bot acts on are recognised. Parsing walks back from
//! the last non-empty line and stops at the first line that is not a
//! recognised trailer, so a `Bug:` line in the middle of a description stays
//! part of the description.

use std::fmt;

use crate::types::ChangeId;

/// Trailer keys the sync bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailerKey {
    /// Issue tracker reference.
    Bug,
    /// Gerrit change identifier.
    ChangeId,
}

impl TrailerKey {
    /// Canonical spelling used when writing the trailer.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::ChangeId => "Change-Id",
        }
    }

    fn parse(key: &str) -> Option<Self> {
        [Self::Bug, Self::ChangeId]
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(key.trim()))
    }
}

/// A single `Key: value` trailer line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trailer {
    /// Recognised key.
    pub key: TrailerKey,
    /// Value with surrounding whitespace removed.
    pub value: String,
}

impl Trailer {
    /// Parses one line, returning `None` unless it is a recognised trailer
    /// with a non-empty value.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let (key, value) = line.split_once(':')?;
        if key.starts_with(char::is_whitespace) {
            return None;
        }
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            key: TrailerKey::parse(key)?,
            value: trimmed.to_owned(),
        })
    }
}

impl fmt::Display for Trailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key.as_str(), self.value)
    }
}

/// Free text with its trailing trailer block split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBody {
    /// Text before the trailer block, without trailing whitespace.
    pub text: String,
    /// Trailers in the order they appeared.
    pub trailers: Vec<Trailer>,
}

impl ParsedBody {
    /// Trailers with the given key, in order.
    pub fn trailers_with(&self, key: TrailerKey) -> impl Iterator<Item = &Trailer> {
        self.trailers.iter().filter(move |trailer| trailer.key == key)
    }
}

/// Splits `body` into description text and its trailing trailer block.
#[must_use]
pub fn split_trailers(body: &str) -> ParsedBody {
    let normalised = body.replace("\r\n", "\n");
    let mut lines: Vec<&str> = normalised.trim_end().lines().collect();

    let mut trailers = Vec::new();
    while let Some(trailer) = lines.last().and_then(|line| Trailer::parse(line)) {
        trailers.push(trailer);
        lines.pop();
    }
    trailers.reverse();

    ParsedBody {
        text: lines.join("\n").trim_end().to_owned(),
        trailers,
    }
}

/// Finds the last `Change-Id:` trailer in a commit message's final
/// paragraph, where git and Gerrit's `commit-msg` hook place trailers.
#[must_use]
pub fn find_change_id(message: &str) -> Option<ChangeId> {
    let normalised = message.replace("\r\n", "\n");
    let final_paragraph = normalised
        .trim_end()
        .rsplit("\n\n")
        .next()
        .unwrap_or_default();

    final_paragraph
        .lines()
        .rev()
        .filter_map(Trailer::parse)
        .find(|trailer| trailer.key == TrailerKey::ChangeId)
        .map(|trailer| ChangeId::new(trailer.value))
}
