//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Import
//!
//! ```text
//! Imported mojave.heic (solar, 3 frames)
//! 001 azimuth 90.0, elevation -10.0
//! 002 azimuth 180.0, elevation 45.0
//! 003 azimuth 270.0, elevation 5.0
//! ```
//!
//! ## Package
//!
//! ```text
//! Package mojave → /home/me/wallpapers/mojave
//!     Descriptor: metadata.json
//!     Images: contents/images/0.png .. contents/images/2.png
//!     Preview: contents/images/preview.png
//!         Midnight: 001
//!         Noon: 002
//! ```
//!
//! Frame indices are 1-based positions in the wallpaper's image list.
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::package::{DESCRIPTOR_FILE, IMAGES_DIR, PackageSummary};
use crate::wallpaper::{Placement, Wallpaper};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn placement_detail(placement: Option<Placement>) -> String {
    match placement {
        Some(Placement::Solar(position)) => format!(
            "azimuth {:.1}, elevation {:.1}",
            position.azimuth, position.elevation
        ),
        Some(Placement::Timed(time)) => format!("time {:.3}", time),
        None => "unplaced".to_string(),
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ============================================================================
// Import
// ============================================================================

/// Format the imported wallpaper: one header, then one line per frame.
pub fn format_import_output(wallpaper: &Wallpaper, source: &Path) -> Vec<String> {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| source.display().to_string());

    let mut lines = vec![format!(
        "Imported {} ({}, {})",
        name,
        wallpaper.kind(),
        plural(wallpaper.len(), "frame")
    )];
    for (i, image) in wallpaper.images().iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            placement_detail(image.placement)
        ));
    }
    lines
}

pub fn print_import_output(wallpaper: &Wallpaper, source: &Path) {
    for line in format_import_output(wallpaper, source) {
        println!("{}", line);
    }
}

// ============================================================================
// Package
// ============================================================================

/// Format the written package: root, descriptor, image range, preview sources.
pub fn format_package_output(id: &str, summary: &PackageSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Package {} → {}", id, summary.root.display()),
        format!("{}Descriptor: {}", indent(1), DESCRIPTOR_FILE),
    ];

    match (summary.image_files.first(), summary.image_files.last()) {
        (Some(first), Some(last)) if summary.image_files.len() > 1 => lines.push(format!(
            "{}Images: {}/{} .. {}/{}",
            indent(1),
            IMAGES_DIR,
            first,
            IMAGES_DIR,
            last
        )),
        (Some(only), _) => lines.push(format!("{}Images: {}/{}", indent(1), IMAGES_DIR, only)),
        _ => {}
    }

    lines.push(format!(
        "{}Preview: {}/{}",
        indent(1),
        IMAGES_DIR,
        summary.preview_file
    ));
    lines.push(format!(
        "{}Midnight: {}",
        indent(2),
        format_index(summary.selection.midnight + 1)
    ));
    lines.push(format!(
        "{}Noon: {}",
        indent(2),
        format_index(summary.selection.noon + 1)
    ));
    lines
}

pub fn print_package_output(id: &str, summary: &PackageSummary) {
    for line in format_package_output(id, summary) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::PreviewSelection;
    use crate::test_helpers::{solar_wallpaper, timed_wallpaper};
    use crate::wallpaper::WallpaperType;
    use std::path::PathBuf;

    fn summary(image_count: usize) -> PackageSummary {
        PackageSummary {
            root: PathBuf::from("/out/mojave"),
            kind: WallpaperType::Solar,
            image_files: (0..image_count).map(|i| format!("{i}.png")).collect(),
            preview_file: "preview.png".into(),
            selection: PreviewSelection {
                midnight: 0,
                noon: 2,
            },
        }
    }

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn import_output_lists_solar_frames() {
        let wallpaper = solar_wallpaper(&[-10.0, 45.5]);
        let lines = format_import_output(&wallpaper, Path::new("/tmp/mojave.heic"));
        assert_eq!(
            lines,
            vec![
                "Imported mojave.heic (solar, 2 frames)",
                "001 azimuth 0.0, elevation -10.0",
                "002 azimuth 15.0, elevation 45.5",
            ]
        );
    }

    #[test]
    fn import_output_lists_timed_frames() {
        let wallpaper = timed_wallpaper(&[0.25]);
        let lines = format_import_output(&wallpaper, Path::new("day.heic"));
        assert_eq!(lines, vec!["Imported day.heic (timed, 1 frame)", "001 time 0.250"]);
    }

    #[test]
    fn package_output_shows_range_and_preview_sources() {
        let lines = format_package_output("mojave", &summary(3));
        assert_eq!(
            lines,
            vec![
                "Package mojave → /out/mojave",
                "    Descriptor: metadata.json",
                "    Images: contents/images/0.png .. contents/images/2.png",
                "    Preview: contents/images/preview.png",
                "        Midnight: 001",
                "        Noon: 003",
            ]
        );
    }

    #[test]
    fn package_output_single_image() {
        let lines = format_package_output("one", &summary(1));
        assert_eq!(lines[2], "    Images: contents/images/0.png");
    }
}
