//! Importers turn a wallpaper file into a [`Wallpaper`].
//!
//! Each container format gets its own [`Importer`]. The [`ImporterRegistry`]
//! holds them in priority order and commits to the first one that both
//! claims the file ([`Importer::can_import`]) and loads it successfully.
//! This is a first-match policy: when two importers could handle the same
//! file, registration order decides.
//!
//! | Importer | Formats | Feature |
//! |---|---|---|
//! | [`heic::HeicImporter`] | HEIF / HEIC (`apple_desktop` XMP) | `heic` for the libheif codec |

pub mod heic;

use crate::wallpaper::{Wallpaper, WallpaperType};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("No importer recognized {0}")]
    NoImporterFound(PathBuf),
    #[error("Unsupported container: {0}")]
    UnsupportedContainer(String),
    #[error("Expected exactly one metadata block on the primary image, found {0}")]
    NoMetadataBlock(usize),
    #[error("Malformed wallpaper metadata: {0}")]
    MalformedMetadata(String),
    #[error("Unsupported wallpaper type: metadata has neither solar nor timed records")]
    UnsupportedWallpaperType,
    #[error("Metadata record references image {index}, but the wallpaper has {count} images")]
    IndexOutOfRange { index: u64, count: usize },
    #[error("Dynamic wallpaper does not have any images")]
    NoImages,
    #[error("Image {index} has no metadata record")]
    MissingFrameMetadata { index: usize },
    #[error("Image {index} is not placed as a {expected} frame")]
    PlacementMismatch {
        index: usize,
        expected: WallpaperType,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A format-specific wallpaper loader.
pub trait Importer {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Cheap capability probe (extension or magic bytes). Must not decode.
    fn can_import(&self, path: &Path) -> bool;

    /// Fully import the wallpaper at `path`.
    fn load(&self, path: &Path) -> Result<Wallpaper, ImportError>;
}

/// Ordered set of importers with first-match dispatch.
#[derive(Default)]
pub struct ImporterRegistry {
    importers: Vec<Box<dyn Importer>>,
}

impl ImporterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every importer compiled into this build.
    pub fn with_default_importers() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "heic")]
        registry.register(Box::new(heic::HeicImporter::new(
            heic::libheif::LibheifCodec::new(),
        )));
        registry
    }

    /// Append an importer. Earlier registrations take priority.
    pub fn register(&mut self, importer: Box<dyn Importer>) {
        self.importers.push(importer);
    }

    pub fn is_empty(&self) -> bool {
        self.importers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.importers.iter().map(|i| i.name()).collect()
    }

    /// Load `path` with the first importer that claims it and succeeds.
    ///
    /// Returns [`ImportError::NoImporterFound`] when nothing claims the file,
    /// otherwise the first failure if every claiming importer failed.
    pub fn load(&self, path: &Path) -> Result<Wallpaper, ImportError> {
        if self.importers.is_empty() {
            warn!("No importers are registered");
        }

        let mut first_error = None;
        for importer in &self.importers {
            if !importer.can_import(path) {
                continue;
            }
            debug!(importer = importer.name(), path = %path.display(), "trying importer");
            match importer.load(path) {
                Ok(wallpaper) => return Ok(wallpaper),
                Err(err) => {
                    warn!(importer = importer.name(), "Could not load {}: {err}", path.display());
                    first_error.get_or_insert(err);
                }
            }
        }

        Err(first_error.unwrap_or_else(|| ImportError::NoImporterFound(path.to_path_buf())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::solid;
    use crate::wallpaper::Image;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Importer with scripted answers that counts how often it was asked to load.
    struct StubImporter {
        name: &'static str,
        claims: bool,
        fails: bool,
        loads: Rc<Cell<usize>>,
    }

    impl StubImporter {
        fn new(name: &'static str, claims: bool, fails: bool) -> (Self, Rc<Cell<usize>>) {
            let loads = Rc::new(Cell::new(0));
            let stub = Self {
                name,
                claims,
                fails,
                loads: Rc::clone(&loads),
            };
            (stub, loads)
        }
    }

    impl Importer for StubImporter {
        fn name(&self) -> &'static str {
            self.name
        }

        fn can_import(&self, _path: &Path) -> bool {
            self.claims
        }

        fn load(&self, _path: &Path) -> Result<Wallpaper, ImportError> {
            self.loads.set(self.loads.get() + 1);
            if self.fails {
                return Err(ImportError::MalformedMetadata(self.name.to_string()));
            }
            Wallpaper::new(
                WallpaperType::Timed,
                vec![Image::timed(solid(1, 1, 0), 0.5)],
            )
        }
    }

    #[test]
    fn empty_registry_reports_no_importer() {
        let registry = ImporterRegistry::new();
        assert!(registry.is_empty());
        let err = registry.load(Path::new("/tmp/wall.heic")).unwrap_err();
        assert!(matches!(err, ImportError::NoImporterFound(p) if p == Path::new("/tmp/wall.heic")));
    }

    #[test]
    fn skips_importers_that_do_not_claim_the_file() {
        let (skipped, skipped_loads) = StubImporter::new("skipped", false, false);
        let (chosen, chosen_loads) = StubImporter::new("chosen", true, false);
        let mut registry = ImporterRegistry::new();
        registry.register(Box::new(skipped));
        registry.register(Box::new(chosen));

        assert!(registry.load(Path::new("a.heic")).is_ok());
        assert_eq!(skipped_loads.get(), 0);
        assert_eq!(chosen_loads.get(), 1);
    }

    #[test]
    fn first_successful_importer_wins() {
        let (first, first_loads) = StubImporter::new("first", true, false);
        let (second, second_loads) = StubImporter::new("second", true, false);
        let mut registry = ImporterRegistry::new();
        registry.register(Box::new(first));
        registry.register(Box::new(second));

        registry.load(Path::new("a.heic")).unwrap();
        assert_eq!(first_loads.get(), 1);
        assert_eq!(second_loads.get(), 0);
        assert_eq!(registry.names(), vec!["first", "second"]);
    }

    #[test]
    fn falls_through_to_next_importer_after_failure() {
        let (broken, _) = StubImporter::new("broken", true, true);
        let (working, working_loads) = StubImporter::new("working", true, false);
        let mut registry = ImporterRegistry::new();
        registry.register(Box::new(broken));
        registry.register(Box::new(working));

        assert!(registry.load(Path::new("a.heic")).is_ok());
        assert_eq!(working_loads.get(), 1);
    }

    #[test]
    fn surfaces_first_failure_when_all_claiming_importers_fail() {
        let (a, _) = StubImporter::new("a", true, true);
        let (b, _) = StubImporter::new("b", true, true);
        let mut registry = ImporterRegistry::new();
        registry.register(Box::new(a));
        registry.register(Box::new(b));

        let err = registry.load(Path::new("a.heic")).unwrap_err();
        assert!(matches!(err, ImportError::MalformedMetadata(name) if name == "a"));
    }
}
