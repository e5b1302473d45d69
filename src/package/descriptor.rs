//! `metadata.json` model.
//!
//! ```json
//! {
//!   "KPlugin": { "Id": "mojave", "Name": "Mojave" },
//!   "Wallpaper": {
//!     "Type": "solar",
//!     "Preview": "preview.png",
//!     "MetaData": [
//!       { "Azimuth": 153.2, "Elevation": -12.6, "FileName": "0.png" }
//!     ]
//!   }
//! }
//! ```
//!
//! Timed entries carry `"Time"` instead of the two angles. `MetaData` follows
//! the wallpaper's image order.

use crate::wallpaper::{Placement, Wallpaper, WallpaperType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(rename = "KPlugin")]
    pub plugin: PluginInfo,
    #[serde(rename = "Wallpaper")]
    pub wallpaper: WallpaperInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WallpaperInfo {
    #[serde(rename = "Type")]
    pub kind: WallpaperType,
    pub preview: String,
    #[serde(rename = "MetaData")]
    pub meta_data: Vec<FrameInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameInfo {
    Solar {
        #[serde(rename = "Azimuth")]
        azimuth: f64,
        #[serde(rename = "Elevation")]
        elevation: f64,
        #[serde(rename = "FileName")]
        file_name: String,
    },
    Timed {
        #[serde(rename = "Time")]
        time: f64,
        #[serde(rename = "FileName")]
        file_name: String,
    },
}

impl FrameInfo {
    pub fn file_name(&self) -> &str {
        match self {
            Self::Solar { file_name, .. } | Self::Timed { file_name, .. } => file_name,
        }
    }
}

impl Descriptor {
    /// Describe `wallpaper`, pairing each image with `file_names[index]`.
    ///
    /// `file_names` must have one entry per image.
    pub fn new(
        id: &str,
        name: &str,
        wallpaper: &Wallpaper,
        file_names: &[String],
        preview: &str,
    ) -> Self {
        let meta_data = wallpaper
            .images()
            .iter()
            .zip(file_names)
            .filter_map(|(image, file_name)| {
                let file_name = file_name.clone();
                image.placement.map(|placement| match placement {
                    Placement::Solar(position) => FrameInfo::Solar {
                        azimuth: position.azimuth,
                        elevation: position.elevation,
                        file_name,
                    },
                    Placement::Timed(time) => FrameInfo::Timed { time, file_name },
                })
            })
            .collect();

        Self {
            plugin: PluginInfo {
                id: id.to_string(),
                name: name.to_string(),
            },
            wallpaper: WallpaperInfo {
                kind: wallpaper.kind(),
                preview: preview.to_string(),
                meta_data,
            },
        }
    }

    /// Indented JSON with a trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}
