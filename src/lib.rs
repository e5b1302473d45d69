//! # Dynamic Wallpaper Importer
//!
//! Converts Apple-style dynamic wallpapers (multi-image HEIF files whose
//! primary image carries a solar or time-of-day schedule in XMP) into
//! wallpaper packages for a desktop dynamic wallpaper plugin.
//!
//! # Pipeline
//!
//! ```text
//! 1. Import   source.heic  →  Wallpaper          (frames + placements)
//! 2. Package  Wallpaper    →  <target>/<id>/     (frames, preview, metadata.json)
//! ```
//!
//! Import goes through an [`importer::ImporterRegistry`]: the first importer
//! that claims the file and loads it successfully wins. The HEIF importer
//! decodes the container through a [`importer::heic::ContainerCodec`], pulls
//! the base64 property list out of the primary image's XMP, classifies it as
//! solar or timed, and attaches each record to the frame it indexes.
//!
//! Packaging is done by [`package::PackageWriter`], which writes every frame,
//! a midnight/noon split preview, and the JSON descriptor into a staging
//! directory and then swaps it into place.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`wallpaper`] | In-memory model: `Wallpaper`, `Image`, `Placement`, `WallpaperType` |
//! | [`importer`] | `Importer` trait, first-match registry, `ImportError` |
//! | [`importer::heic`] | HEIF probing, XMP payload extraction, property-list decoding |
//! | [`package`] | Package layout, staged publish, `PackageError` |
//! | [`package::preview`] | Noon/midnight frame selection and preview compositing |
//! | [`package::descriptor`] | `metadata.json` model |
//! | [`package::encode`] | Output format resolution and image encoding |
//! | [`config`] | Optional TOML config: stock defaults, overlay merge, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Features
//!
//! - `heic` links `libheif` (via `libheif-rs`) and registers the HEIF
//!   importer in [`importer::ImporterRegistry::with_default_importers`].
//!   Without it the library still builds and all parsing logic is available,
//!   but the default registry is empty and every import fails with
//!   [`importer::ImportError::NoImporterFound`].

pub mod config;
pub mod importer;
pub mod output;
pub mod package;
pub mod wallpaper;

#[cfg(test)]
pub(crate) mod test_helpers;
