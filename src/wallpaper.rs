//! In-memory model of an imported dynamic wallpaper.
//!
//! A [`Wallpaper`] is an ordered list of frames plus the temporal model that
//! tells a renderer when each frame should be shown:
//!
//! - **Solar**: every frame carries the sun position (azimuth + elevation, in
//!   degrees) it depicts.
//! - **Timed**: every frame carries the fraction of the day (`0.0..=1.0`) at
//!   which it should appear.
//!
//! The list order is the container's top-level image order. It is the index
//! space used by the metadata records and is carried through unchanged to
//! the generated package.
//!
//! Importers build frames incrementally (pixels first, placement later), so
//! [`Image::placement`] is optional. [`Wallpaper::new`] is the gate: it only
//! accepts a list where every frame is placed and every placement matches
//! the wallpaper type. Once built, a `Wallpaper` exposes no mutable access.

use crate::importer::ImportError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Temporal model of a dynamic wallpaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperType {
    /// Frames are chosen by the current position of the sun.
    Solar,
    /// Frames are chosen by the current time of day.
    Timed,
}

impl WallpaperType {
    /// Name used in the package descriptor (`"solar"` / `"timed"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solar => "solar",
            Self::Timed => "timed",
        }
    }
}

impl fmt::Display for WallpaperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sun position depicted by a frame, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    pub azimuth: f64,
    pub elevation: f64,
}

/// When a frame should be shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Solar(SunPosition),
    /// Fraction of the day elapsed, `0.0..=1.0`.
    Timed(f64),
}

impl Placement {
    pub fn wallpaper_type(&self) -> WallpaperType {
        match self {
            Self::Solar(_) => WallpaperType::Solar,
            Self::Timed(_) => WallpaperType::Timed,
        }
    }
}

/// One frame of a dynamic wallpaper.
#[derive(Debug, Clone)]
pub struct Image {
    pub pixels: DynamicImage,
    /// `None` until metadata association has run, or when the metadata has
    /// no record for this frame.
    pub placement: Option<Placement>,
}

impl Image {
    /// A frame with raster data only.
    pub fn unplaced(pixels: DynamicImage) -> Self {
        Self {
            pixels,
            placement: None,
        }
    }

    pub fn solar(pixels: DynamicImage, azimuth: f64, elevation: f64) -> Self {
        Self {
            pixels,
            placement: Some(Placement::Solar(SunPosition { azimuth, elevation })),
        }
    }

    pub fn timed(pixels: DynamicImage, time: f64) -> Self {
        Self {
            pixels,
            placement: Some(Placement::Timed(time)),
        }
    }

    pub fn sun_position(&self) -> Option<SunPosition> {
        match self.placement {
            Some(Placement::Solar(position)) => Some(position),
            _ => None,
        }
    }

    pub fn time(&self) -> Option<f64> {
        match self.placement {
            Some(Placement::Timed(time)) => Some(time),
            _ => None,
        }
    }
}

/// A fully imported dynamic wallpaper.
#[derive(Debug, Clone)]
pub struct Wallpaper {
    kind: WallpaperType,
    images: Vec<Image>,
}

impl Wallpaper {
    /// Build a wallpaper, checking that every frame is placed consistently
    /// with `kind`.
    pub fn new(kind: WallpaperType, images: Vec<Image>) -> Result<Self, ImportError> {
        if images.is_empty() {
            return Err(ImportError::NoImages);
        }
        for (index, image) in images.iter().enumerate() {
            match image.placement {
                None => return Err(ImportError::MissingFrameMetadata { index }),
                Some(placement) if placement.wallpaper_type() != kind => {
                    return Err(ImportError::PlacementMismatch {
                        index,
                        expected: kind,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(Self { kind, images })
    }

    pub fn kind(&self) -> WallpaperType {
        self.kind
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Always false for a constructed wallpaper.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::solid;

    #[test]
    fn type_names_match_descriptor_values() {
        assert_eq!(WallpaperType::Solar.as_str(), "solar");
        assert_eq!(WallpaperType::Timed.to_string(), "timed");
    }

    #[test]
    fn new_accepts_consistent_solar_frames() {
        let wallpaper = Wallpaper::new(
            WallpaperType::Solar,
            vec![
                Image::solar(solid(4, 4, 0), 10.0, -5.0),
                Image::solar(solid(4, 4, 0), 180.0, 60.0),
            ],
        )
        .unwrap();

        assert_eq!(wallpaper.kind(), WallpaperType::Solar);
        assert_eq!(wallpaper.len(), 2);
        assert_eq!(
            wallpaper.images()[1].sun_position(),
            Some(SunPosition {
                azimuth: 180.0,
                elevation: 60.0
            })
        );
        assert_eq!(wallpaper.images()[1].time(), None);
    }

    #[test]
    fn new_rejects_empty_list() {
        let err = Wallpaper::new(WallpaperType::Timed, Vec::new()).unwrap_err();
        assert!(matches!(err, ImportError::NoImages));
    }

    #[test]
    fn new_rejects_unplaced_frame() {
        let err = Wallpaper::new(
            WallpaperType::Timed,
            vec![
                Image::timed(solid(2, 2, 0), 0.25),
                Image::unplaced(solid(2, 2, 0)),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::MissingFrameMetadata { index: 1 }));
    }

    #[test]
    fn new_rejects_mixed_placements() {
        let err = Wallpaper::new(
            WallpaperType::Solar,
            vec![
                Image::solar(solid(2, 2, 0), 0.0, 0.0),
                Image::timed(solid(2, 2, 0), 0.5),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ImportError::PlacementMismatch {
                index: 1,
                expected: WallpaperType::Solar
            }
        ));
    }

    #[test]
    fn zero_time_is_distinct_from_unset() {
        let placed = Image::timed(solid(1, 1, 0), 0.0);
        let unset = Image::unplaced(solid(1, 1, 0));
        assert_eq!(placed.time(), Some(0.0));
        assert_eq!(unset.time(), None);
    }
}
