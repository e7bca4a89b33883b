//! Batch processing of files on disk.
//!
//! Resizes every input file into an output directory. Directories given as
//! inputs are walked recursively and filtered to decodable extensions; their
//! relative layout is kept under the output directory.
//!
//! ## Output Structure
//!
//! ```text
//! resized/
//! ├── report.json                # Optional, see `--report`
//! ├── beach.jpg                  # Re-encoded (was 4000x3000)
//! ├── logo.png                   # Already inside the bound, copied verbatim
//! └── trips/
//!     └── alps.jpg               # From an input directory `photos/trips/alps.tif`
//! ```
//!
//! ## Parallel Processing
//!
//! Files are processed in parallel using [rayon](https://docs.rs/rayon). Each
//! file is independent: one that fails to read, is not an image, or does not
//! decode is recorded in the report and the rest carry on.
//!
//! ## Output Names
//!
//! Output paths are assigned up front, in input order, before anything is
//! written. Each input reserves both names it could end up with (its own, and
//! the one with the output format's extension), so no two inputs ever share a
//! path. Later inputs that would collide get a numeric suffix:
//!
//! ```text
//! a/photo.jpg  → resized/photo.jpg
//! b/photo.jpg  → resized/photo-1.jpg
//! c/photo.png  → resized/photo-2.png (copied) or resized/photo-2.jpg (resized)
//! ```
//!
//! An input whose output would land on the input itself (or on any other
//! input) is never written over; it fails instead.

use crate::imaging::{
    AspectRatio, Dimensions, EncodeParams, GridTile, ImageBackend, ImageFile, OutputFormat, Region,
    ResizeError, ResizeOutcome, crop_region, crop_to_aspect, fill_to_size, resize_with,
    split_grid, supported_input_extensions,
};
use crate::presets::Preset;
use log::warn;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to walk input directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{0}")]
    Resize(#[from] ResizeError),
    #[error("Refusing to overwrite source file {}", .0.display())]
    OverwritesSource(PathBuf),
}

/// A file to process and where its output goes, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInput {
    pub source: PathBuf,
    pub relative: PathBuf,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub max_size: u32,
    pub encode: EncodeParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Inside the bound; original bytes copied.
    Copied,
    /// Re-encoded at a smaller size.
    Resized,
    Failed,
}

/// Progress events, sent as each file finishes.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Started {
        total: usize,
    },
    FileDone {
        /// 1-based position in the input list.
        index: usize,
        source: PathBuf,
        output: PathBuf,
        status: FileStatus,
        original: Dimensions,
        dimensions: Dimensions,
    },
    FileFailed {
        index: usize,
        source: PathBuf,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a batch run, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub max_size: u32,
    pub format: OutputFormat,
    pub entries: Vec<ReportEntry>,
}

impl BatchReport {
    pub fn count(&self, status: FileStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), BatchError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Expand the CLI inputs into a flat, ordered file list.
///
/// Files are taken as given, even with unknown extensions, so a mistyped
/// input shows up as a failure instead of vanishing. Directories contribute
/// only files with a decodable extension, sorted by path.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<BatchInput>, BatchError> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            let name = input.file_name().map(PathBuf::from).unwrap_or_default();
            files.push(BatchInput {
                source: input.clone(),
                relative: name,
            });
            continue;
        }

        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !has_supported_extension(path) {
                continue;
            }
            let relative = path.strip_prefix(input).unwrap_or(path).to_path_buf();
            files.push(BatchInput {
                source: path.to_path_buf(),
                relative,
            });
        }
    }

    Ok(files)
}

/// Resize every input into `output_dir`.
///
/// Only I/O on the output directory itself aborts the run; per-file problems
/// end up as [`FileStatus::Failed`] entries.
pub fn run_batch(
    backend: &impl ImageBackend,
    inputs: &[BatchInput],
    output_dir: &Path,
    options: &BatchOptions,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchReport, BatchError> {
    std::fs::create_dir_all(output_dir)?;

    let send = |event: BatchEvent| {
        if let Some(tx) = &events {
            // Receiver gone means nobody is printing; keep working.
            let _ = tx.send(event);
        }
    };

    send(BatchEvent::Started {
        total: inputs.len(),
    });

    let slots = plan_outputs(inputs, output_dir, options.encode.format);
    let entries = inputs
        .par_iter()
        .zip(&slots)
        .enumerate()
        .map(|(i, (input, slot))| {
            let index = i + 1;
            match process_one(backend, input, slot, options) {
                Ok((output, outcome)) => {
                    let status = if outcome.resized {
                        FileStatus::Resized
                    } else {
                        FileStatus::Copied
                    };
                    let original = outcome.original.unwrap_or(outcome.dimensions);
                    send(BatchEvent::FileDone {
                        index,
                        source: input.source.clone(),
                        output: output.clone(),
                        status,
                        original,
                        dimensions: outcome.dimensions,
                    });
                    ReportEntry {
                        source: input.source.display().to_string(),
                        output: Some(output.display().to_string()),
                        status,
                        original: Some(original),
                        dimensions: Some(outcome.dimensions),
                        error: None,
                    }
                }
                Err(e) => {
                    warn!("{}: {}", input.source.display(), e);
                    send(BatchEvent::FileFailed {
                        index,
                        source: input.source.clone(),
                        error: e.to_string(),
                    });
                    ReportEntry {
                        source: input.source.display().to_string(),
                        output: None,
                        status: FileStatus::Failed,
                        original: None,
                        dimensions: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    Ok(BatchReport {
        max_size: options.max_size,
        format: options.encode.format,
        entries,
    })
}

/// The two paths one input may be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OutputSlot {
    /// Passthrough: the input's own extension.
    copied: PathBuf,
    /// Re-encoded: the output format's extension.
    converted: PathBuf,
    /// Either path is an input file; nothing may be written.
    overwrites_source: bool,
}

/// Assign every input a pair of output paths no other input uses.
fn plan_outputs(inputs: &[BatchInput], output_dir: &Path, format: OutputFormat) -> Vec<OutputSlot> {
    let sources: HashSet<String> = inputs.iter().map(|i| path_key(&i.source)).collect();
    let mut claimed: HashSet<String> = HashSet::new();

    inputs
        .iter()
        .map(|input| {
            let target = output_dir.join(&input.relative);
            let own = resolve(&input.source);
            let mut n = 0;
            loop {
                let copied = numbered(&target, n, None);
                let converted = numbered(&target, n, Some(format.extension()));
                if resolve(&copied) == own || resolve(&converted) == own {
                    return OutputSlot {
                        copied,
                        converted,
                        overwrites_source: true,
                    };
                }

                let keys = [path_key(&copied), path_key(&converted)];
                if keys
                    .iter()
                    .all(|k| !claimed.contains(k) && !sources.contains(k))
                {
                    claimed.extend(keys);
                    return OutputSlot {
                        copied,
                        converted,
                        overwrites_source: false,
                    };
                }
                n += 1;
            }
        })
        .collect()
}

/// `dir/photo.jpg` → `dir/photo-<n>.<ext>`; `n == 0` leaves the stem alone.
fn numbered(target: &Path, n: usize, extension: Option<&str>) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = extension
        .map(str::to_string)
        .or_else(|| target.extension().map(|e| e.to_string_lossy().into_owned()));

    let mut name = if n == 0 { stem } else { format!("{stem}-{n}") };
    if let Some(ext) = extension {
        name.push('.');
        name.push_str(&ext);
    }
    target.with_file_name(name)
}

/// Absolute form of `path`, following symlinks as far as the path exists.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => resolve(parent).join(name),
        _ => path.to_path_buf(),
    }
}

/// Case-folded so `Photo.JPG` and `photo.jpg` count as one name, as they do
/// on case-insensitive filesystems.
fn path_key(path: &Path) -> String {
    resolve(path).to_string_lossy().to_lowercase()
}

fn process_one(
    backend: &impl ImageBackend,
    input: &BatchInput,
    slot: &OutputSlot,
    options: &BatchOptions,
) -> Result<(PathBuf, ResizeOutcome), BatchError> {
    if slot.overwrites_source {
        return Err(BatchError::OverwritesSource(input.source.clone()));
    }

    let file = ImageFile::read(&input.source)?;
    let outcome = resize_with(backend, file, options.max_size, &options.encode)?;

    let output = if outcome.resized {
        slot.converted.clone()
    } else {
        slot.copied.clone()
    };
    write_output(&output, &outcome.file.bytes)?;
    Ok((output, outcome))
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), BatchError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Apply a social-media preset to one file.
///
/// Output is `<stem>-<preset id>.<ext>` in `output_dir`; a source that already
/// has the preset size keeps its own bytes and extension.
pub fn apply_preset(
    backend: &impl ImageBackend,
    source: &Path,
    preset: &Preset,
    output_dir: &Path,
    encode: &EncodeParams,
) -> Result<(PathBuf, ResizeOutcome), BatchError> {
    let file = ImageFile::read(source)?;
    let outcome = fill_to_size(backend, file, preset.dimensions(), encode)?;
    write_derived(source, output_dir, preset.id, outcome, encode)
}

/// How [`apply_crop`] picks the area to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropTarget {
    /// Largest centered area with this ratio.
    Aspect(AspectRatio),
    /// Exactly this rectangle.
    Region(Region),
}

impl CropTarget {
    fn suffix(&self) -> String {
        match self {
            CropTarget::Aspect(ratio) => format!("{}x{}", ratio.width(), ratio.height()),
            CropTarget::Region(_) => "crop".to_string(),
        }
    }
}

/// Crop one file into `output_dir` as `<stem>-16x9.<ext>` (aspect) or
/// `<stem>-crop.<ext>` (region).
pub fn apply_crop(
    backend: &impl ImageBackend,
    source: &Path,
    target: CropTarget,
    output_dir: &Path,
    encode: &EncodeParams,
) -> Result<(PathBuf, ResizeOutcome), BatchError> {
    let file = ImageFile::read(source)?;
    let outcome = match target {
        CropTarget::Aspect(ratio) => crop_to_aspect(backend, file, ratio, encode)?,
        CropTarget::Region(region) => crop_region(backend, file, region, encode)?,
    };
    write_derived(source, output_dir, &target.suffix(), outcome, encode)
}

/// Split one file into grid tiles, each written to `output_dir` under its
/// tile name (`<stem>-<row>-<column>.<ext>`).
pub fn apply_split(
    backend: &impl ImageBackend,
    source: &Path,
    columns: u32,
    rows: u32,
    tile_aspect: Option<AspectRatio>,
    output_dir: &Path,
    encode: &EncodeParams,
) -> Result<Vec<(PathBuf, GridTile)>, BatchError> {
    let file = ImageFile::read(source)?;
    let tiles = split_grid(backend, file, columns, rows, tile_aspect, encode)?;

    tiles
        .into_iter()
        .map(|tile| -> Result<(PathBuf, GridTile), BatchError> {
            let output = output_dir.join(&tile.file.name);
            write_output(&output, &tile.file.bytes)?;
            Ok((output, tile))
        })
        .collect()
}

/// Write a single-file result as `<stem>-<suffix>.<ext>`. A passthrough keeps
/// the source's extension; anything re-encoded takes the output format's.
/// The suffix means the name can never be the source's own.
fn write_derived(
    source: &Path,
    output_dir: &Path,
    suffix: &str,
    outcome: ResizeOutcome,
    encode: &EncodeParams,
) -> Result<(PathBuf, ResizeOutcome), BatchError> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let extension = if outcome.resized {
        encode.format.extension().to_string()
    } else {
        source
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    let output = if extension.is_empty() {
        output_dir.join(format!("{}-{}", stem, suffix))
    } else {
        output_dir.join(format!("{}-{}.{}", stem, suffix, extension))
    };
    write_output(&output, &outcome.file.bytes)?;
    Ok((output, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RustBackend;
    use crate::imaging::backend::tests::MockBackend;
    use crate::presets::find_preset;
    use crate::test_helpers::{create_test_png, dimensions_on_disk, write_test_jpeg};
    use tempfile::TempDir;

    fn options(max_size: u32) -> BatchOptions {
        BatchOptions {
            max_size,
            encode: EncodeParams::default(),
        }
    }

    #[test]
    fn collect_walks_directories_and_keeps_files() {
        let tmp = TempDir::new().unwrap();
        let photos = tmp.path().join("photos");
        write_test_jpeg(&photos.join("b.jpg"), 8, 8);
        write_test_jpeg(&photos.join("trips/a.jpg"), 8, 8);
        std::fs::write(photos.join("notes.txt"), "skip me").unwrap();
        let loose = tmp.path().join("readme.txt");
        std::fs::write(&loose, "keep me").unwrap();

        let inputs = collect_inputs(&[photos.clone(), loose.clone()]).unwrap();
        let relatives: Vec<_> = inputs.iter().map(|i| i.relative.clone()).collect();

        assert_eq!(
            relatives,
            vec![
                PathBuf::from("b.jpg"),
                PathBuf::from("trips/a.jpg"),
                PathBuf::from("readme.txt"),
            ]
        );
        assert_eq!(inputs[2].source, loose);
    }

    #[test]
    fn batch_resizes_copies_and_isolates_failures() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let out = tmp.path().join("out");
        write_test_jpeg(&src.join("big.jpg"), 400, 300);
        write_test_jpeg(&src.join("small.jpg"), 100, 80);
        std::fs::write(src.join("broken.jpg"), b"not really a jpeg").unwrap();
        std::fs::write(src.join("notes.txt"), b"text").unwrap();

        let inputs = collect_inputs(&[
            src.join("big.jpg"),
            src.join("small.jpg"),
            src.join("broken.jpg"),
            src.join("notes.txt"),
        ])
        .unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        let report =
            run_batch(&RustBackend::new(), &inputs, &out, &options(200), Some(tx)).unwrap();

        assert_eq!(report.count(FileStatus::Resized), 1);
        assert_eq!(report.count(FileStatus::Copied), 1);
        assert_eq!(report.count(FileStatus::Failed), 2);
        assert_eq!(report.entries[0].dimensions, Some(Dimensions::from((200, 150))));
        assert!(report.entries[3].error.as_deref().unwrap().contains("Not an image"));

        assert_eq!(dimensions_on_disk(&out.join("big.jpg")), (200, 150));
        assert_eq!(
            std::fs::read(out.join("small.jpg")).unwrap(),
            std::fs::read(src.join("small.jpg")).unwrap()
        );
        assert!(!out.join("broken.jpg").exists());

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], BatchEvent::Started { total: 4 }));
    }

    #[test]
    fn same_named_inputs_get_distinct_outputs() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let first = tmp.path().join("a/photo.jpg");
        let second = tmp.path().join("b/photo.jpg");
        write_test_jpeg(&first, 400, 300);
        write_test_jpeg(&second, 300, 600);

        let inputs = collect_inputs(&[first, second]).unwrap();
        let report = run_batch(&RustBackend::new(), &inputs, &out, &options(200), None).unwrap();

        assert_eq!(report.count(FileStatus::Resized), 2);
        let outputs: Vec<_> = report.entries.iter().map(|e| e.output.clone().unwrap()).collect();
        assert_ne!(outputs[0], outputs[1]);
        assert_eq!(dimensions_on_disk(&out.join("photo.jpg")), (200, 150));
        assert_eq!(dimensions_on_disk(&out.join("photo-1.jpg")), (100, 200));
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
    }

    #[test]
    fn converted_extension_does_not_replace_copied_file() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let out = tmp.path().join("out");
        write_test_jpeg(&src.join("photo.jpg"), 100, 80);
        std::fs::write(src.join("photo.png"), create_test_png(400, 300)).unwrap();

        let inputs = collect_inputs(&[src.clone()]).unwrap();
        let report = run_batch(&RustBackend::new(), &inputs, &out, &options(200), None).unwrap();

        assert_eq!(report.count(FileStatus::Copied), 1);
        assert_eq!(report.count(FileStatus::Resized), 1);
        // photo.jpg is copied as-is; the re-encoded png may not take its name
        assert_eq!(
            std::fs::read(out.join("photo.jpg")).unwrap(),
            std::fs::read(src.join("photo.jpg")).unwrap()
        );
        assert_eq!(dimensions_on_disk(&out.join("photo-1.jpg")), (200, 150));
    }

    #[test]
    fn same_named_directories_merge_without_loss() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        write_test_jpeg(&tmp.path().join("2023/cover.jpg"), 50, 50);
        write_test_jpeg(&tmp.path().join("2024/cover.jpg"), 60, 40);

        let inputs =
            collect_inputs(&[tmp.path().join("2023"), tmp.path().join("2024")]).unwrap();
        let report = run_batch(&RustBackend::new(), &inputs, &out, &options(200), None).unwrap();

        assert_eq!(report.count(FileStatus::Copied), 2);
        assert_eq!(dimensions_on_disk(&out.join("cover.jpg")), (50, 50));
        assert_eq!(dimensions_on_disk(&out.join("cover-1.jpg")), (60, 40));
    }

    #[test]
    fn output_into_input_directory_never_overwrites_sources() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write_test_jpeg(&src.join("big.jpg"), 400, 300);
        let before = std::fs::read(src.join("big.jpg")).unwrap();

        let inputs = collect_inputs(&[src.clone()]).unwrap();
        let report = run_batch(&RustBackend::new(), &inputs, &src, &options(200), None).unwrap();

        assert_eq!(report.count(FileStatus::Failed), 1);
        assert!(report.entries[0].error.as_deref().unwrap().contains("overwrite"));
        assert_eq!(std::fs::read(src.join("big.jpg")).unwrap(), before);
    }

    #[test]
    fn planned_names_avoid_other_inputs() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        // A loose input already sitting in the output directory keeps its name
        let resident = out.join("photo.jpg");
        write_test_jpeg(&resident, 10, 10);
        let other = tmp.path().join("in/photo.png");
        std::fs::create_dir_all(other.parent().unwrap()).unwrap();
        std::fs::write(&other, create_test_png(10, 10)).unwrap();

        let inputs = collect_inputs(&[other, resident]).unwrap();
        let slots = plan_outputs(&inputs, &out, OutputFormat::Jpeg);

        assert_eq!(slots[0].copied.file_name().unwrap(), "photo-1.png");
        assert_eq!(slots[0].converted.file_name().unwrap(), "photo-1.jpg");
        assert!(!slots[0].overwrites_source);
        assert!(slots[1].overwrites_source);
    }

    #[test]
    fn resized_output_takes_format_extension() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("scan.tiff");
        std::fs::write(&source, b"pretend tiff").unwrap();
        let inputs = collect_inputs(&[source]).unwrap();

        let backend = MockBackend::with_dimensions(vec![Dimensions::from((3000, 2000))]);
        let out = tmp.path().join("out");
        let report = run_batch(&backend, &inputs, &out, &options(300), None).unwrap();

        assert_eq!(report.entries[0].status, FileStatus::Resized);
        assert!(out.join("scan.jpg").exists());
        assert_eq!(std::fs::read(out.join("scan.jpg")).unwrap(), b"mock 300x200");
    }

    #[test]
    fn report_serializes_without_empty_fields() {
        let report = BatchReport {
            max_size: 100,
            format: OutputFormat::Jpeg,
            entries: vec![ReportEntry {
                source: "a.txt".into(),
                output: None,
                status: FileStatus::Failed,
                original: None,
                dimensions: None,
                error: Some("Not an image".into()),
            }],
        };

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("report.json");
        report.write_json(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["format"], "jpeg");
        assert_eq!(json["entries"][0]["status"], "failed");
        assert!(json["entries"][0].get("output").is_none());
    }

    #[test]
    fn preset_output_is_named_after_preset() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("portrait.jpg");
        write_test_jpeg(&source, 300, 500);
        let preset = find_preset("tt-profile").unwrap();

        let (output, outcome) = apply_preset(
            &RustBackend::new(),
            &source,
            preset,
            &tmp.path().join("out"),
            &EncodeParams::default(),
        )
        .unwrap();

        assert!(outcome.resized);
        assert_eq!(output.file_name().unwrap(), "portrait-tt-profile.jpg");
        assert_eq!(dimensions_on_disk(&output), (200, 200));
    }

    #[test]
    fn crop_output_is_named_after_ratio() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("beach.jpg");
        write_test_jpeg(&source, 320, 240);
        let ratio: AspectRatio = "16:9".parse().unwrap();

        let (output, outcome) = apply_crop(
            &RustBackend::new(),
            &source,
            CropTarget::Aspect(ratio),
            &tmp.path().join("out"),
            &EncodeParams::default(),
        )
        .unwrap();

        assert_eq!(output.file_name().unwrap(), "beach-16x9.jpg");
        assert_eq!(outcome.dimensions, Dimensions::from((320, 180)));
        assert_eq!(dimensions_on_disk(&output), (320, 180));
    }

    #[test]
    fn crop_region_out_of_bounds_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("shot.jpg");
        write_test_jpeg(&source, 100, 100);
        let out = tmp.path().join("out");

        let err = apply_crop(
            &RustBackend::new(),
            &source,
            CropTarget::Region("50x50+60+0".parse().unwrap()),
            &out,
            &EncodeParams::default(),
        )
        .unwrap_err();

        assert!(matches!(err, BatchError::Resize(ResizeError::InvalidGeometry(_))));
        assert!(!out.exists());
    }

    #[test]
    fn split_writes_every_tile() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("panorama.jpg");
        write_test_jpeg(&source, 300, 100);
        let out = tmp.path().join("tiles");

        let written = apply_split(
            &RustBackend::new(),
            &source,
            3,
            1,
            None,
            &out,
            &EncodeParams::default(),
        )
        .unwrap();

        assert_eq!(written.len(), 3);
        for (column, (path, tile)) in written.iter().enumerate() {
            assert_eq!(
                path.file_name().unwrap().to_string_lossy(),
                format!("panorama-1-{}.jpg", column + 1)
            );
            assert_eq!(tile.column as usize, column + 1);
            assert_eq!(dimensions_on_disk(path), (100, 100));
        }
    }

    #[test]
    fn preset_rejects_non_image() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("notes.txt");
        std::fs::write(&source, "x").unwrap();

        let err = apply_preset(
            &MockBackend::new(),
            &source,
            find_preset("yt-thumb").unwrap(),
            tmp.path(),
            &EncodeParams::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BatchError::Resize(ResizeError::NotAnImage { .. })));
    }
}
