//! Day/night preview synthesis.
//!
//! The preview is a single image split down the middle: the left half comes
//! from the frame closest to midnight, the right half from the frame closest
//! to noon.
//!
//! | Type | Noon | Midnight |
//! |---|---|---|
//! | Solar | highest elevation | lowest elevation |
//! | Timed | smallest `abs(t - 0.5)` | smallest `min(t, 1 - t)` |
//!
//! Ties go to the later frame in list order.
//!
//! The canvas is the component-wise maximum of the two frames. Each half is
//! sampled from the matching half of its own source frame: the right half
//! starts at the noon frame's own horizontal midpoint, not the canvas
//! midpoint. Halves whose size differs from the canvas half are rescaled.

use crate::wallpaper::{Image, Wallpaper, WallpaperType};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

/// Indices of the frames used for the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSelection {
    pub midnight: usize,
    pub noon: usize,
}

/// Pick the noon and midnight frames of `wallpaper`.
pub fn select(wallpaper: &Wallpaper) -> PreviewSelection {
    let images = wallpaper.images();
    match wallpaper.kind() {
        WallpaperType::Solar => {
            let elevations = || {
                images
                    .iter()
                    .enumerate()
                    .filter_map(|(i, image)| image.sun_position().map(|p| (i, p.elevation)))
            };
            PreviewSelection {
                noon: last_minimum(elevations().map(|(i, e)| (i, -e))),
                midnight: last_minimum(elevations()),
            }
        }
        WallpaperType::Timed => {
            let times = || {
                images
                    .iter()
                    .enumerate()
                    .filter_map(|(i, image)| Image::time(image).map(|t| (i, t)))
            };
            PreviewSelection {
                noon: last_minimum(times().map(|(i, t)| (i, (t - 0.5).abs()))),
                midnight: last_minimum(times().map(|(i, t)| (i, t.min(1.0 - t)))),
            }
        }
    }
}

/// Index with the smallest score; later entries win ties.
fn last_minimum(scores: impl Iterator<Item = (usize, f64)>) -> usize {
    let mut best: Option<(usize, f64)> = None;
    for (index, score) in scores {
        if best.is_none_or(|(_, lowest)| score <= lowest) {
            best = Some((index, score));
        }
    }
    best.map_or(0, |(index, _)| index)
}

/// Compose the day/night split from the selected frames.
pub fn compose(midnight: &DynamicImage, noon: &DynamicImage) -> RgbImage {
    let width = midnight.width().max(noon.width());
    let height = midnight.height().max(noon.height());
    let half = width / 2;
    let mut canvas = RgbImage::new(width, height);

    let midnight = midnight.to_rgb8();
    draw_scaled(&mut canvas, &midnight, 0, midnight.width() / 2, 0, half);

    let noon = noon.to_rgb8();
    let noon_half = noon.width() / 2;
    draw_scaled(&mut canvas, &noon, noon_half, noon_half, half, half);

    canvas
}

/// Draw columns `source_x..source_x + source_width` of `source` into the
/// full-height strip of `canvas` starting at `target_x`.
fn draw_scaled(
    canvas: &mut RgbImage,
    source: &RgbImage,
    source_x: u32,
    source_width: u32,
    target_x: u32,
    target_width: u32,
) {
    let target_height = canvas.height();
    if source_width == 0 || target_width == 0 || source.height() == 0 || target_height == 0 {
        return;
    }

    let strip = imageops::crop_imm(source, source_x, 0, source_width, source.height()).to_image();
    let strip = if strip.dimensions() == (target_width, target_height) {
        strip
    } else {
        imageops::resize(&strip, target_width, target_height, FilterType::Triangle)
    };
    imageops::replace(canvas, &strip, i64::from(target_x), 0);
}
