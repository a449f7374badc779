//! Reading sticker colors out of photos.
//!
//! Two ways in: fixed-region sampling of the three faces visible in a
//! corner photo ([`auto_detect`]), and the manual click-to-sample session
//! ([`ClickSampler`]) where the user points at each sticker in turn.
//! Neither does any geometric detection; regions are fixed fractions of
//! the image.

use image::RgbImage;
use image::imageops::{self, FilterType};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::classifier::{ColorClassifier, WeightedRgb};
use crate::color::{Rgb, StickerColor};
use crate::cube::{CubeError, CubeState};
use crate::face::{CENTER_INDEX, Face, STICKERS_PER_FACE};

/// Longest side used for automatic detection.
pub const AUTO_DETECT_MAX_SIZE: u32 = 800;
/// Canvas bounds of the click-to-sample dialog.
pub const CLICK_MAX_WIDTH: u32 = 500;
pub const CLICK_MAX_HEIGHT: u32 = 400;
pub const DEFAULT_CLICK_SAMPLE_SIZE: u32 = 15;

#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("failed to load image {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn inset(self, margin: f64) -> Self {
        Self {
            x: self.x + margin,
            y: self.y + margin,
            width: self.width - margin * 2.0,
            height: self.height - margin * 2.0,
        }
    }
}

pub fn load_rgb(path: &Path) -> Result<RgbImage, SamplingError> {
    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|source| SamplingError::Load {
            path: path.display().to_string(),
            source,
        })
}

/// Downscales so the image fits in `max_width` x `max_height`, keeping
/// the aspect ratio. Images that already fit are returned unchanged.
pub fn resize_to_fit(img: &RgbImage, max_width: u32, max_height: u32) -> RgbImage {
    let (w, h) = img.dimensions();
    let scale = (f64::from(max_width) / f64::from(w))
        .min(f64::from(max_height) / f64::from(h))
        .min(1.0);
    if scale >= 1.0 {
        return img.clone();
    }
    let nw = ((f64::from(w) * scale).round() as u32).max(1);
    let nh = ((f64::from(h) * scale).round() as u32).max(1);
    imageops::resize(img, nw, nh, FilterType::Triangle)
}

/// Mean color over `rect`, clipped to the image. `None` when the
/// rectangle does not overlap the image at all.
pub fn average_color(img: &RgbImage, rect: Rect) -> Option<Rgb> {
    let (w, h) = img.dimensions();
    let x0 = rect.x.round().max(0.0) as u32;
    let y0 = rect.y.round().max(0.0) as u32;
    let x1 = ((rect.x.round() + rect.width.round()).max(0.0) as u32).min(w);
    let y1 = ((rect.y.round() + rect.height.round()).max(0.0) as u32).min(h);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    let mut sum = [0u64; 3];
    for y in y0..y1 {
        for x in x0..x1 {
            let p = img.get_pixel(x, y).0;
            for (acc, v) in sum.iter_mut().zip(p) {
                *acc += u64::from(v);
            }
        }
    }
    let count = f64::from((x1 - x0) * (y1 - y0));
    let mean = |v: u64| (v as f64 / count).round() as u8;
    Some(Rgb::new(mean(sum[0]), mean(sum[1]), mean(sum[2])))
}

/// Average over a `size` x `size` square centered on a click.
pub fn sample_point(img: &RgbImage, x: u32, y: u32, size: u32) -> Option<Rgb> {
    let half = f64::from(size / 2);
    let rect = Rect::new(f64::from(x) - half, f64::from(y) - half, f64::from(size), f64::from(size));
    average_color(img, rect)
}

/// Average over the middle of a sticker cell, skipping a 20% border so
/// that the black plastic between stickers does not bleed in.
pub fn sample_sticker(img: &RgbImage, cell: Rect) -> Option<Rgb> {
    let margin = cell.width.min(cell.height) * 0.2;
    average_color(img, cell.inset(margin))
}

/// Row-major 3x3 cells covering `face`.
pub fn face_grid(face: Rect) -> [Rect; STICKERS_PER_FACE] {
    let cell_w = face.width / 3.0;
    let cell_h = face.height / 3.0;
    std::array::from_fn(|i| {
        let (row, col) = (i / 3, i % 3);
        Rect::new(
            face.x + col as f64 * cell_w,
            face.y + row as f64 * cell_h,
            cell_w,
            cell_h,
        )
    })
}

pub fn detect_face(
    img: &RgbImage,
    face: Rect,
    classifier: &impl ColorClassifier,
) -> [StickerColor; STICKERS_PER_FACE] {
    face_grid(face).map(|cell| {
        // Cells off the image read as black, like an unpainted canvas.
        let rgb = sample_sticker(img, cell).unwrap_or(Rgb::new(0, 0, 0));
        classifier.classify(rgb)
    })
}

/// Which three faces a corner photo shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerView {
    /// Up on top, Front lower left, Right lower right.
    UpFrontRight,
    /// Down at the bottom, Left upper left, Back upper right.
    DownBackLeft,
}

impl CornerView {
    pub fn faces(self) -> [Face; 3] {
        match self {
            CornerView::UpFrontRight => [Face::Up, Face::Front, Face::Right],
            CornerView::DownBackLeft => [Face::Down, Face::Back, Face::Left],
        }
    }

    /// Fixed face regions for an image of the given size.
    pub fn regions(self, width: u32, height: u32) -> [(Face, Rect); 3] {
        let (w, h) = (f64::from(width), f64::from(height));
        let face_size = w.min(h) * 0.28;
        let center_x = w / 2.0;
        let band = |y: f64| Rect::new(center_x - face_size * 0.9, y, face_size * 1.8, face_size * 0.9);
        let side = |x: f64, y: f64| Rect::new(x, y, face_size * 1.2, face_size * 1.4);

        match self {
            CornerView::UpFrontRight => [
                (Face::Up, band(h * 0.08)),
                (Face::Front, side(w * 0.1, h * 0.4)),
                (Face::Right, side(w * 0.52, h * 0.4)),
            ],
            CornerView::DownBackLeft => [
                (Face::Down, band(h * 0.55)),
                (Face::Back, side(w * 0.52, h * 0.1)),
                (Face::Left, side(w * 0.1, h * 0.1)),
            ],
        }
    }

    /// Every non-center sticker of the visible faces, in click order.
    pub fn targets(self) -> Vec<StickerTarget> {
        self.faces()
            .into_iter()
            .flat_map(|face| {
                (0..STICKERS_PER_FACE)
                    .filter(|&index| index != CENTER_INDEX)
                    .map(move |index| StickerTarget { face, index })
            })
            .collect()
    }
}

pub fn detect_corner(
    img: &RgbImage,
    view: CornerView,
    classifier: &impl ColorClassifier,
) -> Vec<(Face, [StickerColor; STICKERS_PER_FACE])> {
    let (w, h) = img.dimensions();
    view.regions(w, h)
        .into_iter()
        .map(|(face, rect)| (face, detect_face(img, rect, classifier)))
        .collect()
}

/// Builds a full cube from an Up/Front/Right photo and a Down/Back/Left
/// photo. Centers are always the home colors.
pub fn auto_detect(corner1: &RgbImage, corner2: &RgbImage, classifier: &impl ColorClassifier) -> CubeState {
    let mut cube = CubeState::solved();
    for (img, view) in [(corner1, CornerView::UpFrontRight), (corner2, CornerView::DownBackLeft)] {
        let img = resize_to_fit(img, AUTO_DETECT_MAX_SIZE, AUTO_DETECT_MAX_SIZE);
        for (face, stickers) in detect_corner(&img, view, classifier) {
            debug!(face = %face, "detected face colors");
            cube.set_face(face, stickers);
        }
    }
    cube
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickerTarget {
    pub face: Face,
    pub index: usize,
}

impl StickerTarget {
    /// One-based label such as `U1` or `F9`.
    pub fn label(&self) -> String {
        format!("{}{}", self.face.letter(), self.index + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub target: StickerTarget,
    pub rgb: Rgb,
    pub color: StickerColor,
}

/// Manual sampling session over one corner photo. Each click samples the
/// current sticker and moves on; after the last sticker further clicks
/// re-sample it and the latest sample wins.
pub struct ClickSampler<C = WeightedRgb> {
    targets: Vec<StickerTarget>,
    position: usize,
    samples: Vec<Sample>,
    sample_size: u32,
    classifier: C,
}

impl ClickSampler<WeightedRgb> {
    pub fn new(view: CornerView) -> Self {
        Self::with_classifier(view, WeightedRgb)
    }
}

impl<C: ColorClassifier> ClickSampler<C> {
    pub fn with_classifier(view: CornerView, classifier: C) -> Self {
        Self {
            targets: view.targets(),
            position: 0,
            samples: Vec::new(),
            sample_size: DEFAULT_CLICK_SAMPLE_SIZE,
            classifier,
        }
    }

    pub fn sample_size(mut self, size: u32) -> Self {
        self.sample_size = size.max(1);
        self
    }

    pub fn targets(&self) -> &[StickerTarget] {
        &self.targets
    }

    pub fn current(&self) -> Option<StickerTarget> {
        self.targets.get(self.position).copied()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Samples the current sticker at `(x, y)`. Returns `None` if the click
    /// is outside the image; nothing is recorded then.
    pub fn sample(&mut self, img: &RgbImage, x: u32, y: u32) -> Option<Sample> {
        let target = self.current()?;
        let rgb = sample_point(img, x, y, self.sample_size)?;
        let sample = Sample {
            target,
            rgb,
            color: self.classifier.classify(rgb),
        };
        self.samples.push(sample);
        self.advance();
        Some(sample)
    }

    pub fn skip(&mut self) {
        self.advance();
    }

    fn advance(&mut self) {
        if self.position + 1 < self.targets.len() {
            self.position += 1;
        }
    }

    /// Writes all samples into `cube`, returning how many were applied.
    pub fn finish(self, cube: &mut CubeState) -> Result<usize, CubeError> {
        for sample in &self.samples {
            cube.set_sticker(sample.target.face, sample.target.index, sample.color)?;
        }
        Ok(self.samples.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::HslBands;
    use image::Rgb as Pixel;

    fn solid(w: u32, h: u32, color: StickerColor) -> RgbImage {
        let c = color.reference_rgb();
        RgbImage::from_pixel(w, h, Pixel([c.r, c.g, c.b]))
    }

    #[test]
    fn test_average_color_clips_to_image() {
        let mut img = RgbImage::from_pixel(10, 10, Pixel([0, 0, 0]));
        for y in 0..10 {
            for x in 0..5 {
                img.put_pixel(x, y, Pixel([200, 100, 50]));
            }
        }
        assert_eq!(average_color(&img, Rect::new(0.0, 0.0, 10.0, 10.0)), Some(Rgb::new(100, 50, 25)));
        assert_eq!(average_color(&img, Rect::new(-5.0, -5.0, 10.0, 10.0)), Some(Rgb::new(200, 100, 50)));
        assert_eq!(average_color(&img, Rect::new(20.0, 20.0, 5.0, 5.0)), None);
    }

    #[test]
    fn test_sample_point_is_centered() {
        let mut img = RgbImage::from_pixel(40, 40, Pixel([0, 0, 0]));
        for y in 10..25 {
            for x in 10..25 {
                img.put_pixel(x, y, Pixel([255, 255, 255]));
            }
        }
        // 15x15 around (17, 17) covers exactly 10..25.
        assert_eq!(sample_point(&img, 17, 17, 15), Some(Rgb::new(255, 255, 255)));
    }

    #[test]
    fn test_face_grid_is_row_major() {
        let cells = face_grid(Rect::new(30.0, 60.0, 90.0, 45.0));
        assert_eq!(cells[0], Rect::new(30.0, 60.0, 30.0, 15.0));
        assert_eq!(cells[5], Rect::new(90.0, 75.0, 30.0, 15.0));
        assert_eq!(cells[8], Rect::new(90.0, 90.0, 30.0, 15.0));
    }

    #[test]
    fn test_detect_face_reads_each_cell() {
        let layout = [
            StickerColor::White,
            StickerColor::Yellow,
            StickerColor::Red,
            StickerColor::Orange,
            StickerColor::Green,
            StickerColor::Blue,
            StickerColor::Red,
            StickerColor::Green,
            StickerColor::White,
        ];
        let img = RgbImage::from_fn(90, 90, |x, y| {
            let c = layout[(y / 30 * 3 + x / 30) as usize].reference_rgb();
            Pixel([c.r, c.g, c.b])
        });
        assert_eq!(detect_face(&img, Rect::new(0.0, 0.0, 90.0, 90.0), &HslBands), layout);
    }

    #[test]
    fn test_corner_regions_stay_inside_image() {
        for view in [CornerView::UpFrontRight, CornerView::DownBackLeft] {
            for (_, rect) in view.regions(800, 600) {
                assert!(rect.x >= 0.0 && rect.y >= 0.0);
                assert!(rect.x + rect.width <= 800.0);
                assert!(rect.y + rect.height <= 600.0);
            }
        }
    }

    #[test]
    fn test_auto_detect_forces_centers() {
        let corner1 = solid(300, 300, StickerColor::Red);
        let corner2 = solid(300, 300, StickerColor::Blue);
        let cube = auto_detect(&corner1, &corner2, &HslBands);

        for face in [Face::Up, Face::Front, Face::Right] {
            assert_eq!(cube.sticker(face, 0), Ok(Some(StickerColor::Red)));
            assert_eq!(cube.sticker(face, CENTER_INDEX), Ok(Some(face.home_color())));
        }
        for face in [Face::Down, Face::Back, Face::Left] {
            assert_eq!(cube.sticker(face, 8), Ok(Some(StickerColor::Blue)));
            assert_eq!(cube.sticker(face, CENTER_INDEX), Ok(Some(face.home_color())));
        }
    }

    #[test]
    fn test_resize_to_fit() {
        let img = solid(1000, 500, StickerColor::White);
        assert_eq!(resize_to_fit(&img, 800, 800).dimensions(), (800, 400));
        assert_eq!(resize_to_fit(&img, CLICK_MAX_WIDTH, CLICK_MAX_HEIGHT).dimensions(), (500, 250));
        let small = solid(100, 50, StickerColor::White);
        assert_eq!(resize_to_fit(&small, 800, 800).dimensions(), (100, 50));
    }

    #[test]
    fn test_click_sampler_targets() {
        let targets = CornerView::UpFrontRight.targets();
        assert_eq!(targets.len(), 24);
        assert_eq!(targets[0].label(), "U1");
        assert_eq!(targets[4].label(), "U6");
        assert_eq!(targets[8].label(), "F1");
        assert!(targets.iter().all(|t| t.index != CENTER_INDEX));
        assert_eq!(CornerView::DownBackLeft.targets()[23].label(), "L9");
    }

    #[test]
    fn test_click_sampler_session() {
        let img = solid(100, 100, StickerColor::Orange);
        let mut sampler = ClickSampler::new(CornerView::DownBackLeft);

        let first = sampler.sample(&img, 50, 50).unwrap();
        assert_eq!(first.target.label(), "D1");
        assert_eq!(first.color, StickerColor::Orange);

        sampler.skip();
        assert_eq!(sampler.current().map(|t| t.label()), Some("D3".to_string()));
        assert!(sampler.sample(&img, 500, 500).is_none());
        assert_eq!(sampler.current().map(|t| t.label()), Some("D3".to_string()));

        let mut cube = CubeState::with_centers();
        assert_eq!(sampler.finish(&mut cube), Ok(1));
        assert_eq!(cube.sticker(Face::Down, 0), Ok(Some(StickerColor::Orange)));
        assert_eq!(cube.sticker(Face::Down, 1), Ok(None));
    }

    #[test]
    fn test_click_sampler_stays_on_last_target() {
        let img = solid(20, 20, StickerColor::Green);
        let mut sampler = ClickSampler::new(CornerView::UpFrontRight);
        for _ in 0..30 {
            sampler.sample(&img, 10, 10);
        }
        assert_eq!(sampler.current().map(|t| t.label()), Some("R9".to_string()));
        assert_eq!(sampler.samples().len(), 30);
    }
}
