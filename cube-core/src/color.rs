use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::face::Face;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("unknown sticker color '{0}'")]
    UnknownColor(String),
    #[error("invalid hex color '{0}', expected #RRGGBB")]
    InvalidHex(String),
}

/// An averaged pixel value. Channels are plain sRGB bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorParseError::InvalidHex(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StickerColor {
    White,
    Yellow,
    Red,
    Orange,
    Green,
    Blue,
}

impl StickerColor {
    pub const ALL: [StickerColor; 6] = [
        StickerColor::White,
        StickerColor::Yellow,
        StickerColor::Red,
        StickerColor::Orange,
        StickerColor::Green,
        StickerColor::Blue,
    ];

    pub fn letter(self) -> char {
        match self {
            StickerColor::White => 'W',
            StickerColor::Yellow => 'Y',
            StickerColor::Red => 'R',
            StickerColor::Orange => 'O',
            StickerColor::Green => 'G',
            StickerColor::Blue => 'B',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(StickerColor::White),
            'Y' => Some(StickerColor::Yellow),
            'R' => Some(StickerColor::Red),
            'O' => Some(StickerColor::Orange),
            'G' => Some(StickerColor::Green),
            'B' => Some(StickerColor::Blue),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StickerColor::White => "White",
            StickerColor::Yellow => "Yellow",
            StickerColor::Red => "Red",
            StickerColor::Orange => "Orange",
            StickerColor::Green => "Green",
            StickerColor::Blue => "Blue",
        }
    }

    /// Reference value of a real sticker, used as the classification centroid.
    pub fn reference_rgb(self) -> Rgb {
        match self {
            StickerColor::White => Rgb::new(255, 255, 255),
            StickerColor::Yellow => Rgb::new(255, 213, 0),
            StickerColor::Red => Rgb::new(183, 18, 52),
            StickerColor::Orange => Rgb::new(255, 88, 0),
            StickerColor::Green => Rgb::new(0, 155, 72),
            StickerColor::Blue => Rgb::new(0, 70, 173),
        }
    }

    pub fn hex(self) -> String {
        self.reference_rgb().hex()
    }

    /// The face this color belongs to on a solved cube. Only used for
    /// the solver alphabet, never to restrict where a sticker may sit.
    pub fn home_face(self) -> Face {
        match self {
            StickerColor::White => Face::Up,
            StickerColor::Yellow => Face::Down,
            StickerColor::Red => Face::Right,
            StickerColor::Orange => Face::Left,
            StickerColor::Green => Face::Front,
            StickerColor::Blue => Face::Back,
        }
    }

    /// Next color in click-cycling order (W, Y, R, O, G, B, then W again).
    pub fn next(self) -> Self {
        let i = self as usize;
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StickerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StickerColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_letter(c).ok_or_else(|| ColorParseError::UnknownColor(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ColorParseError::UnknownColor(s.to_string()))
    }
}

/// Accepts a color letter or a color name, in any case.
impl<'de> Deserialize<'de> for StickerColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
