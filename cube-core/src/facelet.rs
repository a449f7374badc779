//! The 54-character facelet string consumed by external solving services.
//!
//! Faces come in U R F D L B order, each row-major. A set sticker is
//! written as the letter of its color's home face, not the face it sits
//! on; an unset sticker is written as `?`.

use serde::Serialize;
use std::fmt;

use crate::cube::CubeState;
use crate::face::STICKER_COUNT;

pub const UNSET_FACELET: char = '?';
pub const SOLVED_FACELETS: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FaceletString(String);

impl FaceletString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_complete(&self) -> bool {
        !self.0.contains(UNSET_FACELET)
    }

    pub fn is_solved(&self) -> bool {
        self.0 == SOLVED_FACELETS
    }
}

impl fmt::Display for FaceletString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FaceletString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn encode(cube: &CubeState) -> FaceletString {
    let mut out = String::with_capacity(STICKER_COUNT);
    for (_, _, sticker) in cube.iter() {
        out.push(sticker.map_or(UNSET_FACELET, |color| color.home_face().letter()));
    }
    FaceletString(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::StickerColor;
    use crate::face::Face;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_solved_cube_encoding() {
        let facelets = encode(&CubeState::solved());
        assert_eq!(facelets.as_str(), SOLVED_FACELETS);
        assert!(facelets.is_solved());
        assert!(facelets.is_complete());
    }

    #[test]
    fn test_unset_slots_use_sentinel() {
        let facelets = encode(&CubeState::with_centers());
        assert_eq!(facelets.as_str().len(), 54);
        assert!(!facelets.is_complete());
        assert_eq!(&facelets.as_str()[..9], "????U????");
        assert_eq!(&facelets.as_str()[18..27], "????F????");
    }

    #[test]
    fn test_letter_follows_color_not_position() {
        let mut cube = CubeState::solved();
        cube.set_sticker(Face::Front, 0, StickerColor::White).unwrap();
        let facelets = encode(&cube);
        // Front starts at offset 18.
        assert_eq!(facelets.as_str().chars().nth(18), Some('U'));
        assert!(!facelets.is_solved());
    }

    #[test]
    fn test_complete_random_states_encode_to_54_letters() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let mut cube = CubeState::with_centers();
            for face in Face::ALL {
                for index in (0..9).filter(|&i| i != 4) {
                    let color = StickerColor::ALL[rng.gen_range(0..6)];
                    cube.set_sticker(face, index, color).unwrap();
                }
            }
            let facelets = encode(&cube);
            assert_eq!(facelets.as_str().chars().count(), 54);
            assert!(facelets.is_complete());
            for ((_, _, sticker), letter) in cube.iter().zip(facelets.as_str().chars()) {
                assert_eq!(sticker.map(|c| c.home_face().letter()), Some(letter));
            }
        }
    }
}
