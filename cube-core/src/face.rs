use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::StickerColor;

pub const STICKERS_PER_FACE: usize = 9;
pub const STICKER_COUNT: usize = STICKERS_PER_FACE * 6;
/// Slot 4 of the row-major 3x3 grid. Centers never move on a real cube.
pub const CENTER_INDEX: usize = 4;

/// Faces in the order the solver wire format uses: U R F D L B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Face {
    Up,
    Right,
    Front,
    Down,
    Left,
    Back,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Right,
        Face::Front,
        Face::Down,
        Face::Left,
        Face::Back,
    ];

    pub fn letter(self) -> char {
        match self {
            Face::Up => 'U',
            Face::Right => 'R',
            Face::Front => 'F',
            Face::Down => 'D',
            Face::Left => 'L',
            Face::Back => 'B',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'U' => Some(Face::Up),
            'R' => Some(Face::Right),
            'F' => Some(Face::Front),
            'D' => Some(Face::Down),
            'L' => Some(Face::Left),
            'B' => Some(Face::Back),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Face::Up => "Up",
            Face::Right => "Right",
            Face::Front => "Front",
            Face::Down => "Down",
            Face::Left => "Left",
            Face::Back => "Back",
        }
    }

    pub fn home_color(self) -> StickerColor {
        match self {
            Face::Up => StickerColor::White,
            Face::Right => StickerColor::Red,
            Face::Front => StickerColor::Green,
            Face::Down => StickerColor::Yellow,
            Face::Left => StickerColor::Orange,
            Face::Back => StickerColor::Blue,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Face {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_letter(c.to_ascii_uppercase()).ok_or_else(|| format!("unknown face '{}'", s));
        }
        Self::ALL
            .into_iter()
            .find(|face| face.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown face '{}'", s))
    }
}
