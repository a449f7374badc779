use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::color::StickerColor;
use crate::face::{CENTER_INDEX, Face, STICKER_COUNT, STICKERS_PER_FACE};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CubeError {
    #[error("the center of the {0} face is fixed and cannot be changed")]
    CenterLocked(Face),
    #[error("sticker index {0} is out of range (0..9)")]
    IndexOutOfRange(usize),
    #[error("expected {expected} stickers, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("unknown sticker character '{0}' at position {1}")]
    UnknownSticker(char, usize),
}

pub type FaceStickers = [Option<StickerColor>; STICKERS_PER_FACE];

/// Six faces of nine optional stickers, indexed in U R F D L B order.
///
/// All mutation goes through methods that keep the center slot of each
/// face untouched, so a state built from [`CubeState::with_centers`]
/// keeps its centers for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CubeRepr", from = "CubeRepr")]
pub struct CubeState {
    faces: [FaceStickers; 6],
}

impl CubeState {
    pub fn empty() -> Self {
        Self {
            faces: [[None; STICKERS_PER_FACE]; 6],
        }
    }

    /// Only the fixed centers set: the starting point of manual input.
    pub fn with_centers() -> Self {
        let mut cube = Self::empty();
        for face in Face::ALL {
            cube.faces[face.index()][CENTER_INDEX] = Some(face.home_color());
        }
        cube
    }

    pub fn solved() -> Self {
        let mut cube = Self::empty();
        for face in Face::ALL {
            cube.faces[face.index()] = [Some(face.home_color()); STICKERS_PER_FACE];
        }
        cube
    }

    /// Parses 54 color letters (W Y R O G B, any case) in U R F D L B order.
    /// `?`, `.` and `_` mark unset stickers; whitespace is ignored.
    pub fn from_color_string(input: &str) -> Result<Self, CubeError> {
        let symbols: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
        if symbols.len() != STICKER_COUNT {
            return Err(CubeError::WrongLength {
                expected: STICKER_COUNT,
                actual: symbols.len(),
            });
        }

        let mut cube = Self::empty();
        for (pos, &c) in symbols.iter().enumerate() {
            let sticker = match c {
                '?' | '.' | '_' => None,
                _ => Some(StickerColor::from_letter(c).ok_or(CubeError::UnknownSticker(c, pos))?),
            };
            cube.faces[pos / STICKERS_PER_FACE][pos % STICKERS_PER_FACE] = sticker;
        }
        Ok(cube)
    }

    pub fn to_color_string(&self) -> String {
        self.iter()
            .map(|(_, _, sticker)| sticker.map_or('?', StickerColor::letter))
            .collect()
    }

    pub fn sticker(&self, face: Face, index: usize) -> Result<Option<StickerColor>, CubeError> {
        check_index(index)?;
        Ok(self.faces[face.index()][index])
    }

    pub fn face(&self, face: Face) -> &FaceStickers {
        &self.faces[face.index()]
    }

    /// All 54 slots in wire order: faces U R F D L B, each row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Face, usize, Option<StickerColor>)> + '_ {
        Face::ALL.into_iter().flat_map(move |face| {
            self.faces[face.index()]
                .iter()
                .enumerate()
                .map(move |(index, &sticker)| (face, index, sticker))
        })
    }

    pub fn set_sticker(&mut self, face: Face, index: usize, color: StickerColor) -> Result<(), CubeError> {
        *self.slot_mut(face, index)? = Some(color);
        Ok(())
    }

    pub fn clear_sticker(&mut self, face: Face, index: usize) -> Result<(), CubeError> {
        *self.slot_mut(face, index)? = None;
        Ok(())
    }

    /// Advances a sticker to the next color; an unset sticker becomes White.
    pub fn cycle_sticker(&mut self, face: Face, index: usize) -> Result<StickerColor, CubeError> {
        let slot = self.slot_mut(face, index)?;
        let next = slot.map_or(StickerColor::White, StickerColor::next);
        *slot = Some(next);
        Ok(next)
    }

    /// Replaces a whole face, e.g. from photo sampling. The center slot is
    /// forced back to the face's home color whatever the input says.
    pub fn set_face(&mut self, face: Face, stickers: [StickerColor; STICKERS_PER_FACE]) {
        let slots = &mut self.faces[face.index()];
        for (slot, color) in slots.iter_mut().zip(stickers) {
            *slot = Some(color);
        }
        slots[CENTER_INDEX] = Some(face.home_color());
    }

    pub fn reset(&mut self) {
        *self = Self::with_centers();
    }

    pub fn is_complete(&self) -> bool {
        self.iter().all(|(_, _, sticker)| sticker.is_some())
    }

    fn slot_mut(&mut self, face: Face, index: usize) -> Result<&mut Option<StickerColor>, CubeError> {
        check_index(index)?;
        if index == CENTER_INDEX {
            return Err(CubeError::CenterLocked(face));
        }
        Ok(&mut self.faces[face.index()][index])
    }
}

impl Default for CubeState {
    fn default() -> Self {
        Self::with_centers()
    }
}

fn check_index(index: usize) -> Result<(), CubeError> {
    if index >= STICKERS_PER_FACE {
        Err(CubeError::IndexOutOfRange(index))
    } else {
        Ok(())
    }
}

impl fmt::Display for CubeState {
    /// Unfolded net: U on top, L F R B in the middle band, D at the bottom.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = |face: Face, r: usize| -> String {
            self.faces[face.index()][r * 3..r * 3 + 3]
                .iter()
                .map(|s| s.map_or('.', StickerColor::letter).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let pad = " ".repeat(6);
        for r in 0..3 {
            writeln!(f, "{}{}", pad, row(Face::Up, r))?;
        }
        for r in 0..3 {
            writeln!(
                f,
                "{} {} {} {}",
                row(Face::Left, r),
                row(Face::Front, r),
                row(Face::Right, r),
                row(Face::Back, r)
            )?;
        }
        for r in 0..3 {
            writeln!(f, "{}{}", pad, row(Face::Down, r))?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct CubeRepr {
    #[serde(rename = "U", with = "sticker_letters")]
    up: FaceStickers,
    #[serde(rename = "R", with = "sticker_letters")]
    right: FaceStickers,
    #[serde(rename = "F", with = "sticker_letters")]
    front: FaceStickers,
    #[serde(rename = "D", with = "sticker_letters")]
    down: FaceStickers,
    #[serde(rename = "L", with = "sticker_letters")]
    left: FaceStickers,
    #[serde(rename = "B", with = "sticker_letters")]
    back: FaceStickers,
}

/// One face as an array of color letters, `null` for unset stickers.
mod sticker_letters {
    use super::FaceStickers;
    use crate::color::StickerColor;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(stickers: &FaceStickers, serializer: S) -> Result<S::Ok, S::Error> {
        stickers.map(|sticker| sticker.map(StickerColor::letter)).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FaceStickers, D::Error> {
        let stickers = Vec::<Option<StickerColor>>::deserialize(deserializer)?;
        stickers
            .try_into()
            .map_err(|v: Vec<_>| D::Error::invalid_length(v.len(), &"9 stickers"))
    }
}

impl From<CubeState> for CubeRepr {
    fn from(cube: CubeState) -> Self {
        let [up, right, front, down, left, back] = cube.faces;
        Self {
            up,
            right,
            front,
            down,
            left,
            back,
        }
    }
}

impl From<CubeRepr> for CubeState {
    fn from(repr: CubeRepr) -> Self {
        Self {
            faces: [repr.up, repr.right, repr.front, repr.down, repr.left, repr.back],
        }
    }
}
