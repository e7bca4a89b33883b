//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every file leads with its positional index and name; paths and sizes are
//! secondary context on indented lines. The same two-level shape is used for
//! batch progress, preset results and the preset listing.
//!
//! # Output Format
//!
//! ## Resize
//!
//! ```text
//! Resizing 3 files
//! 001 beach.jpg
//!     Source: photos/beach.jpg
//!     4000x3000 → 1500x1125: resized
//!     Output: resized/beach.jpg
//! 002 logo.png
//!     Source: photos/logo.png
//!     300x120: copied
//!     Output: resized/logo.png
//! 003 notes.txt
//!     Source: photos/notes.txt
//!     Failed: Not an image: declared type is 'text/plain'
//!
//! Resized 1, copied 1, failed 1
//! ```
//!
//! ## Presets
//!
//! ```text
//! Instagram
//!     ig-post-portrait  Post (Portrait / Feed)  1080 × 1350
//!         Grid may crop to a vertical layout; keep key content centered.
//! ```
//!
//! ## Crop and split
//!
//! ```text
//! Crop 16:9
//!     Source: beach.jpg
//!     4000x3000 → 4000x2250: cropped
//!     Output: ./beach-16x9.jpg
//! Split 3x1 into 400x400 tiles
//!     Source: post.jpg
//!     001 ./post-1-1.jpg
//!     002 ./post-1-2.jpg
//!     003 ./post-1-3.jpg
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and, where the CLI needs it, a `print_*` wrapper that writes to
//! stdout. Format functions are pure and do no I/O.

use crate::batch::{BatchEvent, BatchReport, CropTarget, FileStatus};
use crate::imaging::{Dimensions, GridTile, ResizeOutcome};
use crate::presets::Preset;
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn size(d: Dimensions) -> String {
    format!("{}x{}", d.width, d.height)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `4000x3000 → 1500x1125: resized` or `300x120: copied`.
fn size_change(original: Dimensions, dimensions: Dimensions, resized: bool) -> String {
    size_change_as(original, dimensions, resized, "resized")
}

fn size_change_as(
    original: Dimensions,
    dimensions: Dimensions,
    changed: bool,
    verb: &str,
) -> String {
    if changed {
        format!("{} → {}: {}", size(original), size(dimensions), verb)
    } else {
        format!("{}: copied", size(original))
    }
}

// ============================================================================
// Resize
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Started { total } => {
            let noun = if *total == 1 { "file" } else { "files" };
            vec![format!("Resizing {} {}", total, noun)]
        }
        BatchEvent::FileDone {
            index,
            source,
            output,
            status,
            original,
            dimensions,
        } => vec![
            format!("{} {}", format_index(*index), file_name(source)),
            format!("{}Source: {}", indent(1), source.display()),
            format!(
                "{}{}",
                indent(1),
                size_change(*original, *dimensions, *status == FileStatus::Resized)
            ),
            format!("{}Output: {}", indent(1), output.display()),
        ],
        BatchEvent::FileFailed {
            index,
            source,
            error,
        } => vec![
            format!("{} {}", format_index(*index), file_name(source)),
            format!("{}Source: {}", indent(1), source.display()),
            format!("{}Failed: {}", indent(1), error),
        ],
    }
}

/// One-line tally printed after a batch.
pub fn format_batch_summary(report: &BatchReport) -> String {
    format!(
        "Resized {}, copied {}, failed {}",
        report.count(FileStatus::Resized),
        report.count(FileStatus::Copied),
        report.count(FileStatus::Failed)
    )
}

// ============================================================================
// Presets
// ============================================================================

/// List presets grouped under their platform, in table order.
pub fn format_preset_list(presets: &[&Preset]) -> Vec<String> {
    let id_width = presets.iter().map(|p| p.id.len()).max().unwrap_or(0);
    let title_width = presets.iter().map(|p| p.title.len()).max().unwrap_or(0);

    let mut lines = Vec::new();
    let mut current = None;
    for preset in presets {
        if current != Some(preset.platform) {
            if current.is_some() {
                lines.push(String::new());
            }
            lines.push(preset.platform.to_string());
            current = Some(preset.platform);
        }
        lines.push(format!(
            "{}{:<id_width$}  {:<title_width$}  {}",
            indent(1),
            preset.id,
            preset.title,
            preset.size_label(),
        ));
        if !preset.notes.is_empty() {
            lines.push(format!("{}{}", indent(2), preset.notes));
        }
    }
    lines
}

pub fn print_preset_list(presets: &[&Preset]) {
    for line in format_preset_list(presets) {
        println!("{}", line);
    }
}

/// Result of applying one preset.
pub fn format_preset_result(
    preset: &Preset,
    source: &Path,
    output: &Path,
    outcome: &ResizeOutcome,
) -> Vec<String> {
    let original = outcome.original.unwrap_or(outcome.dimensions);
    vec![
        format!(
            "{} {} ({})",
            preset.platform,
            preset.title,
            preset.size_label()
        ),
        format!("{}Source: {}", indent(1), source.display()),
        format!(
            "{}{}",
            indent(1),
            size_change(original, outcome.dimensions, outcome.resized)
        ),
        format!("{}Output: {}", indent(1), output.display()),
    ]
}

pub fn print_preset_result(preset: &Preset, source: &Path, output: &Path, outcome: &ResizeOutcome) {
    for line in format_preset_result(preset, source, output, outcome) {
        println!("{}", line);
    }
}

// ============================================================================
// Crop and split
// ============================================================================

pub fn format_crop_result(
    target: &CropTarget,
    source: &Path,
    output: &Path,
    outcome: &ResizeOutcome,
) -> Vec<String> {
    let heading = match target {
        CropTarget::Aspect(ratio) => format!("Crop {}", ratio),
        CropTarget::Region(region) => format!("Crop {}", region),
    };
    let original = outcome.original.unwrap_or(outcome.dimensions);
    vec![
        heading,
        format!("{}Source: {}", indent(1), source.display()),
        format!(
            "{}{}",
            indent(1),
            size_change_as(original, outcome.dimensions, outcome.resized, "cropped")
        ),
        format!("{}Output: {}", indent(1), output.display()),
    ]
}

pub fn print_crop_result(
    target: &CropTarget,
    source: &Path,
    output: &Path,
    outcome: &ResizeOutcome,
) {
    for line in format_crop_result(target, source, output, outcome) {
        println!("{}", line);
    }
}

/// Grid split: heading with the tile size, then one line per tile in grid order.
pub fn format_split_result(
    columns: u32,
    rows: u32,
    source: &Path,
    tiles: &[(PathBuf, GridTile)],
) -> Vec<String> {
    let tile_size = tiles
        .first()
        .map(|(_, t)| format!(" into {}x{} tiles", t.region.width, t.region.height))
        .unwrap_or_default();
    let mut lines = vec![
        format!("Split {}x{}{}", columns, rows, tile_size),
        format!("{}Source: {}", indent(1), source.display()),
    ];
    lines.extend(tiles.iter().enumerate().map(|(i, (path, _))| {
        format!("{}{} {}", indent(1), format_index(i + 1), path.display())
    }));
    lines
}

pub fn print_split_result(columns: u32, rows: u32, source: &Path, tiles: &[(PathBuf, GridTile)]) {
    for line in format_split_result(columns, rows, source, tiles) {
        println!("{}", line);
    }
}
