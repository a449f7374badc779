use serde::Serialize;
use std::collections::BTreeMap;

use crate::color::StickerColor;
use crate::cube::CubeState;
use crate::face::STICKERS_PER_FACE;

/// Outcome of checking a cube state. Always derived fresh from the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub color_counts: BTreeMap<StickerColor, usize>,
}

impl ValidationResult {
    /// All errors on a single line.
    pub fn summary(&self) -> String {
        self.errors.join(" ")
    }
}

/// Checks that every sticker is filled in and that each of the six
/// colors appears exactly nine times. Both problems are reported
/// together when both apply.
pub fn validate(cube: &CubeState) -> ValidationResult {
    let mut counts = [0usize; 6];
    let mut unset = 0usize;
    for (_, _, sticker) in cube.iter() {
        match sticker {
            Some(color) => counts[color.index()] += 1,
            None => unset += 1,
        }
    }

    let mut errors = Vec::new();
    if unset > 0 {
        let plural = if unset > 1 { "s" } else { "" };
        errors.push(format!("{} sticker{} not filled in yet.", unset, plural));
    }

    let wrong: Vec<String> = StickerColor::ALL
        .into_iter()
        .filter(|color| counts[color.index()] != STICKERS_PER_FACE)
        .map(|color| format!("{}: {}", color.name(), counts[color.index()]))
        .collect();
    if !wrong.is_empty() {
        errors.push(format!(
            "Each color should appear exactly 9 times. Current counts: {}",
            wrong.join(", ")
        ));
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        color_counts: StickerColor::ALL
            .into_iter()
            .map(|color| (color, counts[color.index()]))
            .collect(),
    }
}
