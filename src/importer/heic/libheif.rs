//! [`ContainerCodec`] backed by the system libheif (via `libheif-rs`).
//!
//! | Operation | libheif call |
//! |---|---|
//! | Open | `heif_context_read_from_file` |
//! | Top-level images | `heif_context_get_list_of_top_level_image_IDs` |
//! | Decode | `heif_decode_image` → interleaved RGB |
//! | Metadata | `heif_image_handle_get_metadata` on the primary handle |
//!
//! A frame that fails to decode fails the whole read; the importer never
//! sees a partial image list.

use super::codec::{CodecError, ContainerCodec, DecodedContainer};
use image::{DynamicImage, RgbImage};
use libheif_rs::{ColorSpace, HeifContext, ImageHandle, ItemId, LibHeif, RgbChroma};
use std::path::Path;

pub struct LibheifCodec {
    lib: LibHeif,
}

impl LibheifCodec {
    pub fn new() -> Self {
        Self {
            lib: LibHeif::new(),
        }
    }

    fn decode_handle(&self, handle: &ImageHandle) -> Result<DynamicImage, CodecError> {
        let image = self
            .lib
            .decode(handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
            .map_err(decode_error)?;
        let planes = image.planes();
        let plane = planes
            .interleaved
            .ok_or_else(|| CodecError::Decode("decoded image has no interleaved plane".into()))?;

        let width = plane.width;
        let height = plane.height;
        let row_bytes = width as usize * 3;
        let mut rgb = Vec::with_capacity(row_bytes * height as usize);
        for row in plane.data.chunks(plane.stride).take(height as usize) {
            rgb.extend_from_slice(&row[..row_bytes]);
        }

        RgbImage::from_raw(width, height, rgb)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| {
                CodecError::Decode("decoded plane is smaller than its dimensions".into())
            })
    }
}

impl Default for LibheifCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(e: libheif_rs::HeifError) -> CodecError {
    CodecError::Decode(e.to_string())
}

impl ContainerCodec for LibheifCodec {
    fn read(&self, path: &Path) -> Result<DecodedContainer, CodecError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| CodecError::Decode(format!("non UTF-8 path: {}", path.display())))?;
        let context = HeifContext::read_from_file(path_str).map_err(decode_error)?;

        let primary = context.primary_image_handle().map_err(decode_error)?;
        // An empty type filter selects every block, XMP or otherwise.
        let block_count = primary.number_of_metadata_blocks(b"").max(0) as usize;
        let mut block_ids: Vec<ItemId> = vec![0; block_count];
        let found = primary.metadata_block_ids(b"", &mut block_ids);
        let primary_metadata = block_ids[..found]
            .iter()
            .map(|&id| primary.metadata(id).map_err(decode_error))
            .collect::<Result<Vec<_>, _>>()?;

        let mut image_ids: Vec<ItemId> = vec![0; context.number_of_top_level_images()];
        let found = context.top_level_image_ids(&mut image_ids);
        let images = image_ids[..found]
            .iter()
            .map(|&id| {
                let handle = context.image_handle(id).map_err(decode_error)?;
                self.decode_handle(&handle)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DecodedContainer {
            images,
            primary_metadata,
        })
    }
}
