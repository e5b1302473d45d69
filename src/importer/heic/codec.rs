//! Container codec trait and shared types.
//!
//! The [`ContainerCodec`] trait is the seam between the HEIF importer and
//! whatever library actually parses the container and decodes HEVC frames.
//! The importer only needs two things from it: the decoded top-level images
//! in container order, and the raw metadata blocks attached to the primary
//! image.
//!
//! The production implementation is
//! [`LibheifCodec`](super::libheif::LibheifCodec), compiled with the `heic`
//! feature.

use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decoding failed: {0}")]
    Decode(String),
}

/// Everything the importer needs out of a container.
#[derive(Debug, Clone, Default)]
pub struct DecodedContainer {
    /// Top-level images, in container order.
    pub images: Vec<DynamicImage>,
    /// Raw metadata blocks attached to the primary image.
    pub primary_metadata: Vec<Vec<u8>>,
}

/// Reads a multi-image container from disk.
pub trait ContainerCodec {
    fn read(&self, path: &Path) -> Result<DecodedContainer, CodecError>;
}
