//! Output format resolution and encoding.
//!
//! | Extension | Encoder |
//! |---|---|
//! | `jpg` / `jpeg` | `JpegEncoder` with [`Quality`], alpha dropped |
//! | `avif` | `AvifEncoder` (rav1e, speed 6) with [`Quality`] |
//! | `png`, `tif`, `webp` | `DynamicImage::write_to` (lossless) |

use super::PackageError;
use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Map a user-supplied extension to an encodable format.
pub fn resolve_format(extension: &str) -> Result<ImageFormat, PackageError> {
    let format = ImageFormat::from_extension(extension)
        .ok_or_else(|| PackageError::UnsupportedFormat(extension.to_string()))?;
    if !format.writing_enabled() {
        return Err(PackageError::UnsupportedFormat(extension.to_string()));
    }
    Ok(format)
}

/// Encode `image` as `format` into a new file at `path`.
pub fn save_image(
    image: &DynamicImage,
    path: &Path,
    format: ImageFormat,
    quality: Quality,
) -> Result<(), PackageError> {
    let file = File::create(path).map_err(|e| PackageError::write(path, e))?;
    let mut writer = BufWriter::new(file);

    let encoded = match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut writer, quality.value());
            DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)
        }
        ImageFormat::Avif => {
            let encoder = AvifEncoder::new_with_speed_quality(&mut writer, 6, quality.value());
            image.write_with_encoder(encoder)
        }
        other => image.write_to(&mut writer, other),
    };
    encoded.map_err(|e| PackageError::EncodeFailure {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    writer.flush().map_err(|e| PackageError::write(path, e))
}
