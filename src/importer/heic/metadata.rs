//! Wallpaper type classification and per-frame metadata association.
//!
//! The decoded payload is a property list (binary in practice) whose
//! top-level dictionary holds one of two record arrays:
//!
//! ```text
//! { "si": [ { "i": 0, "z": 153.2, "a": -12.6 }, ... ] }   solar: index, azimuth, elevation
//! { "ti": [ { "i": 0, "t": 0.25 }, ... ] }               timed: index, day fraction
//! ```
//!
//! Other keys (e.g. the `ap` light/dark appearance hints) are ignored.
//! Record order is irrelevant: `i` is an absolute position in the container's
//! top-level image list.

use crate::importer::ImportError;
use crate::wallpaper::{Image, Placement, SunPosition, WallpaperType};
use plist::{Dictionary, Value};
use serde::Deserialize;
use std::io::Cursor;
use tracing::debug;

const SOLAR_KEY: &str = "si";
const TIMED_KEY: &str = "ti";

#[derive(Debug, Deserialize)]
struct SolarMetadata {
    #[serde(rename = "si")]
    records: Option<Vec<SolarRecord>>,
}

#[derive(Debug, Deserialize)]
struct SolarRecord {
    #[serde(rename = "i")]
    index: u64,
    #[serde(rename = "z")]
    azimuth: f64,
    #[serde(rename = "a")]
    elevation: f64,
}

#[derive(Debug, Deserialize)]
struct TimedMetadata {
    #[serde(rename = "ti")]
    records: Option<Vec<TimedRecord>>,
}

#[derive(Debug, Deserialize)]
struct TimedRecord {
    #[serde(rename = "i")]
    index: u64,
    #[serde(rename = "t")]
    time: f64,
}

/// Determine the temporal model from the payload's top-level keys.
///
/// The solar key is checked first, so a payload carrying both is solar.
pub fn classify(payload: &[u8]) -> Result<WallpaperType, ImportError> {
    let dictionary = parse_dictionary(payload)?;
    if dictionary.contains_key(SOLAR_KEY) {
        Ok(WallpaperType::Solar)
    } else if dictionary.contains_key(TIMED_KEY) {
        Ok(WallpaperType::Timed)
    } else {
        Err(ImportError::UnsupportedWallpaperType)
    }
}

/// Place every image named by a record of the `kind` scheme.
///
/// Images without a record keep `placement: None`. A record pointing past the
/// end of `images` is [`ImportError::IndexOutOfRange`].
pub fn associate(
    payload: &[u8],
    kind: WallpaperType,
    mut images: Vec<Image>,
) -> Result<Vec<Image>, ImportError> {
    let placements = match kind {
        WallpaperType::Solar => solar_placements(payload)?,
        WallpaperType::Timed => timed_placements(payload)?,
    };

    let count = images.len();
    for (index, placement) in placements {
        let image = usize::try_from(index)
            .ok()
            .and_then(|i| images.get_mut(i))
            .ok_or(ImportError::IndexOutOfRange { index, count })?;
        if image.placement.is_some() {
            debug!(index, "duplicate metadata record, keeping the later one");
        }
        image.placement = Some(placement);
    }

    Ok(images)
}

fn solar_placements(payload: &[u8]) -> Result<Vec<(u64, Placement)>, ImportError> {
    let metadata: SolarMetadata = plist::from_bytes(payload).map_err(malformed)?;
    let records = metadata.records.ok_or_else(|| missing_key(SOLAR_KEY))?;
    Ok(records
        .into_iter()
        .map(|r| {
            let position = SunPosition {
                azimuth: r.azimuth,
                elevation: r.elevation,
            };
            (r.index, Placement::Solar(position))
        })
        .collect())
}

fn timed_placements(payload: &[u8]) -> Result<Vec<(u64, Placement)>, ImportError> {
    let metadata: TimedMetadata = plist::from_bytes(payload).map_err(malformed)?;
    let records = metadata.records.ok_or_else(|| missing_key(TIMED_KEY))?;
    records
        .into_iter()
        .map(|r| {
            if !(0.0..=1.0).contains(&r.time) {
                return Err(ImportError::MalformedMetadata(format!(
                    "time {} for image {} is outside 0..=1",
                    r.time, r.index
                )));
            }
            Ok((r.index, Placement::Timed(r.time)))
        })
        .collect()
}

fn parse_dictionary(payload: &[u8]) -> Result<Dictionary, ImportError> {
    Value::from_reader(Cursor::new(payload))
        .map_err(malformed)?
        .into_dictionary()
        .ok_or_else(|| ImportError::MalformedMetadata("plist root is not a dictionary".into()))
}

fn malformed(e: plist::Error) -> ImportError {
    ImportError::MalformedMetadata(format!("invalid property list: {e}"))
}

/// Classification and association disagree about the scheme.
fn missing_key(key: &str) -> ImportError {
    ImportError::MalformedMetadata(format!("property list has no '{key}' records"))
}
