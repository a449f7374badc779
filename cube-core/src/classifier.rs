//! Mapping averaged pixel values to sticker colors.
//!
//! Two strategies are in use: [`HslBands`] for automatic sampling of whole
//! faces and [`WeightedRgb`] for the click-to-sample tool. Both are total:
//! every input maps to one of the six sticker colors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::{Rgb, StickerColor};

/// Hue in degrees `[0, 360)`, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l: l * 100.0 };
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let sector = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    let h = sector / 6.0;

    Hsl {
        h: h * 360.0,
        s: s * 100.0,
        l: l * 100.0,
    }
}

pub trait ColorClassifier {
    fn classify(&self, rgb: Rgb) -> StickerColor;
}

/// Ordered hue/saturation/lightness bands, first match wins. Falls back
/// to [`NearestRgb`] when no band matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct HslBands;

impl ColorClassifier for HslBands {
    fn classify(&self, rgb: Rgb) -> StickerColor {
        let Hsl { h, s, l } = rgb_to_hsl(rgb);

        if s < 20.0 && l > 70.0 {
            return StickerColor::White;
        }
        if (40.0..=70.0).contains(&h) && s > 50.0 {
            return StickerColor::Yellow;
        }
        if (10.0..=45.0).contains(&h) && s > 50.0 {
            return StickerColor::Orange;
        }
        // Red wraps around 0°.
        if (0.0..=15.0).contains(&h) || h >= 340.0 {
            return StickerColor::Red;
        }
        if (80.0..=170.0).contains(&h) && s > 30.0 {
            return StickerColor::Green;
        }
        if (180.0..=270.0).contains(&h) && s > 30.0 {
            return StickerColor::Blue;
        }

        NearestRgb.classify(rgb)
    }
}

/// Plain Euclidean distance to the reference colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestRgb;

impl ColorClassifier for NearestRgb {
    fn classify(&self, rgb: Rgb) -> StickerColor {
        nearest_by(rgb, [1.0, 1.0, 1.0])
    }
}

/// Euclidean distance with channel weights R×2, G×4, B×3, roughly
/// following the eye's sensitivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRgb;

impl ColorClassifier for WeightedRgb {
    fn classify(&self, rgb: Rgb) -> StickerColor {
        nearest_by(rgb, [2.0, 4.0, 3.0])
    }
}

// Ties go to the earlier color in W Y R O G B order.
fn nearest_by(rgb: Rgb, [wr, wg, wb]: [f64; 3]) -> StickerColor {
    let mut closest = StickerColor::White;
    let mut min_dist = f64::INFINITY;
    for color in StickerColor::ALL {
        let reference = color.reference_rgb();
        let dr = f64::from(rgb.r) - f64::from(reference.r);
        let dg = f64::from(rgb.g) - f64::from(reference.g);
        let db = f64::from(rgb.b) - f64::from(reference.b);
        let dist = (wr * dr * dr + wg * dg * dg + wb * db * db).sqrt();
        if dist < min_dist {
            min_dist = dist;
            closest = color;
        }
    }
    closest
}

/// Selectable classifier, for configuration and command lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Hsl,
    Weighted,
    Nearest,
}

impl ColorClassifier for Strategy {
    fn classify(&self, rgb: Rgb) -> StickerColor {
        match self {
            Strategy::Hsl => HslBands.classify(rgb),
            Strategy::Weighted => WeightedRgb.classify(rgb),
            Strategy::Nearest => NearestRgb.classify(rgb),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Hsl => "hsl",
            Strategy::Weighted => "weighted",
            Strategy::Nearest => "nearest",
        })
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hsl" => Ok(Strategy::Hsl),
            "weighted" => Ok(Strategy::Weighted),
            "nearest" => Ok(Strategy::Nearest),
            other => Err(format!("unknown classifier strategy '{}' (hsl, weighted, nearest)", other)),
        }
    }
}
