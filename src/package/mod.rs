//! Wallpaper package generation.
//!
//! Turns an imported [`Wallpaper`] into the directory layout consumed by the
//! desktop wallpaper plugin:
//!
//! ```text
//! <target>/<id>/
//! ├── metadata.json          # plugin identity + per-frame metadata
//! └── contents/images/
//!     ├── 0.<ext> .. N-1.<ext>
//!     └── preview.<ext>      # midnight | noon split
//! ```
//!
//! ## Publishing
//!
//! Nothing is written under `<target>/<id>` until the whole package has been
//! produced. The package is assembled in a hidden sibling directory
//! (`<target>/.<id>-XXXXXX`) and moved into place with `rename`. An existing
//! package with the same id is moved aside first and deleted once the new
//! one is in place, so re-running replaces the package wholesale and leaves
//! no stale frames behind. If publishing fails, the previous package is
//! restored.

pub mod descriptor;
pub mod encode;
pub mod preview;

pub use descriptor::Descriptor;
pub use encode::Quality;
pub use preview::PreviewSelection;

use crate::wallpaper::{Wallpaper, WallpaperType};
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Directory holding frames and preview, relative to the package root.
pub const IMAGES_DIR: &str = "contents/images";
/// Descriptor file name, relative to the package root.
pub const DESCRIPTOR_FILE: &str = "metadata.json";

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Invalid package option: {0}")]
    InvalidOption(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to encode {}: {message}", path.display())]
    EncodeFailure { path: PathBuf, message: String },
    #[error("Failed to write {}: {source}", path.display())]
    FileWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(
        "Failed to write {}: {source}; previous package kept at {} ({restore})",
        path.display(),
        kept.display()
    )]
    RestoreFailure {
        path: PathBuf,
        kept: PathBuf,
        #[source]
        source: io::Error,
        restore: io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PackageError {
    fn write(path: &Path, source: io::Error) -> Self {
        Self::FileWriteFailure {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Point paths inside the staging directory at their published location.
    fn rebase(self, staging: &Path, root: &Path) -> Self {
        let published = |path: PathBuf| match path.strip_prefix(staging) {
            Ok(relative) => root.join(relative),
            Err(_) => path,
        };
        match self {
            Self::EncodeFailure { path, message } => Self::EncodeFailure {
                path: published(path),
                message,
            },
            Self::FileWriteFailure { path, source } => Self::FileWriteFailure {
                path: published(path),
                source,
            },
            other => other,
        }
    }
}

/// Identity and encoding settings for a package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageOptions {
    /// Package id; also the package directory name.
    pub id: String,
    /// Human-readable wallpaper name.
    pub name: String,
    /// Image file extension (`png`, `jpg`, ...).
    pub format: String,
    pub quality: Quality,
}

impl PackageOptions {
    pub fn new(id: impl Into<String>, name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            format: format.into(),
            quality: Quality::default(),
        }
    }

    fn validate(&self) -> Result<ImageFormat, PackageError> {
        if self.id.is_empty() {
            return Err(PackageError::InvalidOption("id must not be empty".into()));
        }
        if self.id == "." || self.id == ".." || self.id.contains(['/', '\\']) {
            return Err(PackageError::InvalidOption(format!(
                "id '{}' is not a plain directory name",
                self.id
            )));
        }
        if self.format.is_empty() {
            return Err(PackageError::InvalidOption("format must not be empty".into()));
        }
        encode::resolve_format(&self.format)
    }
}

/// What a successful [`PackageWriter::write`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageSummary {
    pub root: PathBuf,
    pub kind: WallpaperType,
    /// Frame file names under [`IMAGES_DIR`], in image order.
    pub image_files: Vec<String>,
    pub preview_file: String,
    pub selection: PreviewSelection,
}

impl PackageSummary {
    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join(DESCRIPTOR_FILE)
    }
}

/// Writes wallpaper packages.
#[derive(Debug, Clone)]
pub struct PackageWriter {
    options: PackageOptions,
    format: ImageFormat,
}

impl PackageWriter {
    /// Validate `options` up front so a bad id or format fails before any I/O.
    pub fn new(options: PackageOptions) -> Result<Self, PackageError> {
        let format = options.validate()?;
        Ok(Self { options, format })
    }

    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    /// `<base>.<format>`
    pub fn file_name(&self, base: &str) -> String {
        format!("{base}.{}", self.options.format)
    }

    /// Write the package for `wallpaper` to `<target>/<id>`.
    ///
    /// `target` defaults to the current working directory.
    pub fn write(
        &self,
        wallpaper: Wallpaper,
        target: Option<&Path>,
    ) -> Result<PackageSummary, PackageError> {
        let target = match target {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().map_err(|e| PackageError::write(Path::new("."), e))?,
        };
        fs::create_dir_all(&target).map_err(|e| PackageError::write(&target, e))?;

        let staging = tempfile::Builder::new()
            .prefix(&format!(".{}-", self.options.id))
            .tempdir_in(&target)
            .map_err(|e| PackageError::write(&target, e))?;
        debug!(staging = %staging.path().display(), "assembling package");

        let root = target.join(&self.options.id);
        let (image_files, preview_file, selection) = self
            .assemble(&wallpaper, staging.path())
            .map_err(|e| e.rebase(staging.path(), &root))?;

        publish(staging, &root, &target, |from, to| fs::rename(from, to))?;
        info!(
            "Wrote {} wallpaper '{}' ({} images) to {}",
            wallpaper.kind(),
            self.options.id,
            image_files.len(),
            root.display()
        );

        Ok(PackageSummary {
            root,
            kind: wallpaper.kind(),
            image_files,
            preview_file,
            selection,
        })
    }

    /// Write frames, preview and descriptor under `dir`.
    fn assemble(
        &self,
        wallpaper: &Wallpaper,
        dir: &Path,
    ) -> Result<(Vec<String>, String, PreviewSelection), PackageError> {
        let images_dir = dir.join(IMAGES_DIR);
        fs::create_dir_all(&images_dir).map_err(|e| PackageError::write(&images_dir, e))?;

        let image_files = self.write_images(wallpaper, &images_dir)?;
        let (preview_file, selection) = self.write_preview(wallpaper, &images_dir)?;
        self.write_descriptor(wallpaper, &image_files, &preview_file, dir)?;
        Ok((image_files, preview_file, selection))
    }

    fn write_images(
        &self,
        wallpaper: &Wallpaper,
        images_dir: &Path,
    ) -> Result<Vec<String>, PackageError> {
        wallpaper
            .images()
            .iter()
            .enumerate()
            .map(|(index, image)| {
                let file_name = self.file_name(&index.to_string());
                self.save(&image.pixels, &images_dir.join(&file_name))?;
                Ok(file_name)
            })
            .collect()
    }

    fn write_preview(
        &self,
        wallpaper: &Wallpaper,
        images_dir: &Path,
    ) -> Result<(String, PreviewSelection), PackageError> {
        let selection = preview::select(wallpaper);
        debug!(
            midnight = selection.midnight,
            noon = selection.noon,
            "selected preview frames"
        );

        let images = wallpaper.images();
        let composed = preview::compose(
            &images[selection.midnight].pixels,
            &images[selection.noon].pixels,
        );

        let file_name = self.file_name("preview");
        self.save(
            &DynamicImage::ImageRgb8(composed),
            &images_dir.join(&file_name),
        )?;
        Ok((file_name, selection))
    }

    fn write_descriptor(
        &self,
        wallpaper: &Wallpaper,
        image_files: &[String],
        preview_file: &str,
        root: &Path,
    ) -> Result<(), PackageError> {
        let descriptor = Descriptor::new(
            &self.options.id,
            &self.options.name,
            wallpaper,
            image_files,
            preview_file,
        );
        let path = root.join(DESCRIPTOR_FILE);
        fs::write(&path, descriptor.to_json()?).map_err(|e| PackageError::write(&path, e))
    }

    fn save(&self, image: &DynamicImage, path: &Path) -> Result<(), PackageError> {
        encode::save_image(image, path, self.format, self.options.quality)
    }
}

/// Move the staged package to `root`, replacing any previous package.
///
/// `rename` is `fs::rename` outside of tests.
fn publish(
    staging: TempDir,
    root: &Path,
    target: &Path,
    rename: impl Fn(&Path, &Path) -> io::Result<()>,
) -> Result<(), PackageError> {
    if fs::symlink_metadata(root).is_err() {
        rename(staging.path(), root).map_err(|e| PackageError::write(root, e))?;
        let _ = staging.keep();
        return finish_publish(root);
    }

    // Parked old package; removed when `parking` drops.
    let parking = tempfile::Builder::new()
        .prefix(".replaced-")
        .tempdir_in(target)
        .map_err(|e| PackageError::write(target, e))?;
    let parked = parking.path().join("package");
    rename(root, &parked).map_err(|e| PackageError::write(root, e))?;

    if let Err(source) = rename(staging.path(), root) {
        if let Err(restore) = rename(&parked, root) {
            let kept = parking.keep().join("package");
            warn!(
                "Could not restore the previous package; it was kept at {}",
                kept.display()
            );
            return Err(PackageError::RestoreFailure {
                path: root.to_path_buf(),
                kept,
                source,
                restore,
            });
        }
        return Err(PackageError::write(root, source));
    }
    let _ = staging.keep();
    finish_publish(root)
}

/// Staging directories are created owner-only; open the package up like a
/// normal directory.
#[cfg(unix)]
fn finish_publish(root: &Path) -> Result<(), PackageError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(root, fs::Permissions::from_mode(0o755))
        .map_err(|e| PackageError::write(root, e))
}

#[cfg(not(unix))]
fn finish_publish(_root: &Path) -> Result<(), PackageError> {
    Ok(())
}
