use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::face::Face;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("invalid move '{0}'")]
    InvalidMove(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Clockwise,
    CounterClockwise,
    Double,
}

impl Turn {
    pub fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::CounterClockwise => "'",
            Turn::Double => "2",
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "" => Some(Turn::Clockwise),
            "'" => Some(Turn::CounterClockwise),
            "2" => Some(Turn::Double),
            _ => None,
        }
    }
}

/// A single face turn in standard notation, e.g. `R`, `U'` or `F2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub face: Face,
    pub turn: Turn,
}

impl Move {
    pub const fn new(face: Face, turn: Turn) -> Self {
        Self { face, turn }
    }

    /// Walkthrough text for this move.
    pub fn describe(&self) -> String {
        match self.turn {
            Turn::Clockwise => format!("Turn the {} face clockwise", self.face),
            Turn::CounterClockwise => format!("Turn the {} face counter-clockwise", self.face),
            Turn::Double => format!("Turn the {} face twice (180°)", self.face),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face.letter(), self.turn.suffix())
    }
}

impl FromStr for Move {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let face = chars
            .next()
            .and_then(Face::from_letter)
            .ok_or_else(|| NotationError::InvalidMove(s.to_string()))?;
        let turn = Turn::from_suffix(chars.as_str()).ok_or_else(|| NotationError::InvalidMove(s.to_string()))?;
        Ok(Move { face, turn })
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Splits a whitespace separated move sequence. Blank input is an empty
/// sequence.
pub fn parse_moves(text: &str) -> Result<Vec<Move>, NotationError> {
    text.split_whitespace().map(str::parse).collect()
}

pub fn format_moves(moves: &[Move]) -> String {
    moves.iter().map(Move::to_string).collect::<Vec<_>>().join(" ")
}

/// True when `text` consists only of face letters, `'`, `2` and spaces
/// (`^[URFDLB2' ]+$`).
pub fn is_move_notation(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| matches!(c, 'U' | 'R' | 'F' | 'D' | 'L' | 'B' | '2' | '\'' | ' '))
}

pub const LEGEND: [(&str, &str); 8] = [
    ("U", "Up (top face) - clockwise"),
    ("D", "Down (bottom face) - clockwise"),
    ("R", "Right face - clockwise"),
    ("L", "Left face - clockwise"),
    ("F", "Front face - clockwise"),
    ("B", "Back face - clockwise"),
    ("'", "Counter-clockwise (e.g., R' means turn right face counter-clockwise)"),
    ("2", "Double turn (e.g., R2 means turn right face twice)"),
];
