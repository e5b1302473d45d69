//! HEIF/HEIC dynamic wallpaper importer.
//!
//! | Step | Where |
//! |---|---|
//! | Probe (extension / `ftyp` brand) | [`is_heic_file`] |
//! | Container read + HEVC decode | [`ContainerCodec`] (libheif with the `heic` feature) |
//! | XMP block → plist payload | [`xmp`] |
//! | Wallpaper type | [`metadata::classify`] |
//! | Frame placement | [`metadata::associate`] |
//!
//! The metadata is extracted and classified before the images are looked at,
//! so a file that is a plain HEIF photo fails fast with a metadata error.

pub mod codec;
#[cfg(feature = "heic")]
pub mod libheif;
pub mod metadata;
pub mod xmp;

pub use codec::{CodecError, ContainerCodec, DecodedContainer};

use super::{ImportError, Importer};
use crate::wallpaper::{Image, Wallpaper};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Major/compatible brands that identify a HEIF still-image container.
const HEIF_BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"heim", b"heis", b"hevc", b"hevx", b"mif1", b"msf1",
];

/// Importer for HEIF containers carrying `apple_desktop` metadata.
pub struct HeicImporter<C> {
    codec: C,
}

impl<C: ContainerCodec> HeicImporter<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// Run the whole import pipeline on an already-probed file.
    pub fn import(&self, path: &Path) -> Result<Wallpaper, ImportError> {
        let container = self
            .codec
            .read(path)
            .map_err(|e| ImportError::UnsupportedContainer(e.to_string()))?;

        let payload = xmp::extract_payload(&container.primary_metadata)?;
        let kind = metadata::classify(&payload)?;
        debug!(%kind, "classified wallpaper");

        if container.images.is_empty() {
            warn!("Dynamic wallpaper does not have any images");
            return Err(ImportError::NoImages);
        }
        let images = container.images.into_iter().map(Image::unplaced).collect();
        let images = metadata::associate(&payload, kind, images)?;

        Wallpaper::new(kind, images)
    }
}

impl<C: ContainerCodec> Importer for HeicImporter<C> {
    fn name(&self) -> &'static str {
        "heic"
    }

    fn can_import(&self, path: &Path) -> bool {
        is_heic_file(path)
    }

    fn load(&self, path: &Path) -> Result<Wallpaper, ImportError> {
        self.import(path)
    }
}

/// Whether `path` looks like a HEIF container, by extension or by sniffing
/// the leading `ftyp` box.
pub fn is_heic_file(path: &Path) -> bool {
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("heic") || e.eq_ignore_ascii_case("heif"));
    by_extension || sniff_heif_brand(path)
}

/// Check the `ftyp` box: `size(4) "ftyp" major(4) minor(4) compatible(4)*`.
fn sniff_heif_brand(path: &Path) -> bool {
    let mut header = [0u8; 64];
    let read = match File::open(path).and_then(|mut f| read_up_to(&mut f, &mut header)) {
        Ok(n) => n,
        Err(_) => return false,
    };
    is_heif_header(&header[..read])
}

fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

fn is_heif_header(data: &[u8]) -> bool {
    if data.len() < 16 || &data[4..8] != b"ftyp" {
        return false;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let end = box_size.clamp(16, data.len());

    let is_heif = |brand: &[u8]| HEIF_BRANDS.iter().any(|b| b.as_slice() == brand);
    // Major brand, then compatible brands after the 4-byte minor version.
    is_heif(&data[8..12]) || data[16..end].chunks_exact(4).any(is_heif)
}
