//! Shared test utilities for the importer test suite.
//!
//! Provides raster builders, HEIF metadata fixtures (XMP packets and binary
//! property lists), ready-made wallpapers, and filesystem assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let payload = solar_plist(&[(0, 90.0, -10.0), (1, 180.0, 45.0)]);
//! let block = xmp_block("apple_desktop:solar", &payload);
//!
//! let wallpaper = solar_wallpaper(&[-10.0, 45.0]);
//! assert_eq!(wallpaper.len(), 2);
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, Rgb, RgbImage};
use plist::{Dictionary, Value};
use std::path::Path;

use crate::wallpaper::{Image, Wallpaper, WallpaperType};

// =========================================================================
// Rasters
// =========================================================================

/// A `width` x `height` RGB image filled with a single gray `shade`.
pub fn solid(width: u32, height: u32, shade: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        Rgb([shade, shade, shade]),
    ))
}

/// `count` small frames without placement, each a different shade.
pub fn unplaced_images(count: usize) -> Vec<Image> {
    (0..count)
        .map(|i| Image::unplaced(solid(4, 2, (i * 30) as u8)))
        .collect()
}

// =========================================================================
// Metadata fixtures
// =========================================================================

/// An XMP packet whose single `rdf:Description` carries `payload`,
/// base64-encoded, in the attribute named `attr`.
pub fn xmp_block(attr: &str, payload: &[u8]) -> Vec<u8> {
    format!(
        r#"<x:xmpmeta xmlns:x="adobe:ns:meta/" x:xmptk="XMP Core 5.4.0">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about=""
    xmlns:apple_desktop="http://ns.apple.com/namespace/1.0/"
   {attr}="{}"/>
 </rdf:RDF>
</x:xmpmeta>"#,
        STANDARD.encode(payload)
    )
    .into_bytes()
}

/// Binary property list with one `si` record per `(index, azimuth, elevation)`.
pub fn solar_plist(records: &[(u64, f64, f64)]) -> Vec<u8> {
    let records = records
        .iter()
        .map(|&(index, azimuth, elevation)| {
            let mut record = Dictionary::new();
            record.insert("i".into(), Value::Integer(index.into()));
            record.insert("z".into(), Value::Real(azimuth));
            record.insert("a".into(), Value::Real(elevation));
            Value::Dictionary(record)
        })
        .collect();
    binary_plist("si", records)
}

/// Binary property list with one `ti` record per `(index, time)`.
pub fn timed_plist(records: &[(u64, f64)]) -> Vec<u8> {
    let records = records
        .iter()
        .map(|&(index, time)| {
            let mut record = Dictionary::new();
            record.insert("i".into(), Value::Integer(index.into()));
            record.insert("t".into(), Value::Real(time));
            Value::Dictionary(record)
        })
        .collect();
    binary_plist("ti", records)
}

fn binary_plist(key: &str, records: Vec<Value>) -> Vec<u8> {
    let mut root = Dictionary::new();
    root.insert(key.into(), Value::Array(records));
    let mut bytes = Vec::new();
    Value::Dictionary(root)
        .to_writer_binary(&mut bytes)
        .unwrap();
    bytes
}

// =========================================================================
// Wallpapers
// =========================================================================

/// Solar wallpaper with one 8x4 frame per elevation. Azimuths step by 15°.
pub fn solar_wallpaper(elevations: &[f64]) -> Wallpaper {
    let images = elevations
        .iter()
        .enumerate()
        .map(|(i, &elevation)| {
            Image::solar(solid(8, 4, (i * 40) as u8), i as f64 * 15.0, elevation)
        })
        .collect();
    Wallpaper::new(WallpaperType::Solar, images).unwrap()
}

/// Timed wallpaper with one 8x4 frame per time of day.
pub fn timed_wallpaper(times: &[f64]) -> Wallpaper {
    let images = times
        .iter()
        .enumerate()
        .map(|(i, &time)| Image::timed(solid(8, 4, (i * 40) as u8), time))
        .collect();
    Wallpaper::new(WallpaperType::Timed, images).unwrap()
}

// =========================================================================
// Filesystem
// =========================================================================

/// Every file under `root`, as sorted `/`-separated relative paths.
pub fn list_files(root: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                let parts: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect();
                out.push(parts.join("/"));
            }
        }
    }

    let mut files = Vec::new();
    walk(root, root, &mut files);
    files.sort();
    files
}
