//! Cube state model, validation, facelet encoding and sticker color
//! classification for a 3x3 cube.

pub mod classifier;
pub mod color;
pub mod cube;
pub mod face;
pub mod facelet;
pub mod notation;
pub mod sampling;
pub mod validation;

pub use classifier::{ColorClassifier, HslBands, NearestRgb, Strategy, WeightedRgb};
pub use color::{ColorParseError, Rgb, StickerColor};
pub use cube::{CubeError, CubeState};
pub use face::Face;
pub use facelet::{FaceletString, SOLVED_FACELETS, UNSET_FACELET};
pub use notation::{Move, NotationError, Turn};
pub use validation::{ValidationResult, validate};
