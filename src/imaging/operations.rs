//! High-level image operations.
//!
//! These functions combine calculations with backend execution: validate the
//! input, decode it, decide the target size, and only then draw and encode.
//!
//! ## Resize contract
//!
//! | Input | Outcome |
//! |---|---|
//! | declared type is not `image/*` | [`ResizeError::NotAnImage`], nothing decoded |
//! | bytes don't decode | [`ResizeError::Decode`] |
//! | longer side ≤ bound | original file returned untouched, `resized = false` |
//! | longer side > bound | redrawn + re-encoded, `resized = true`, original size reported |
//!
//! Cropping ([`crop_to_aspect`], [`crop_region`]) and [`split_grid`] share the
//! same type check and decode step, then copy regions out of the one decoded
//! bitmap.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{
    AspectRatio, Region, calculate_fill_dimensions, center_crop_offset, fit_within, grid_tiles,
    largest_aspect_crop,
};
use super::file::ImageFile;
use super::params::EncodeParams;
use log::debug;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Not an image: declared type is '{media_type}'")]
    NotAnImage { media_type: String },
    #[error("Size bound must be positive")]
    InvalidBound,
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Decode failed: {0}")]
    Decode(#[source] BackendError),
    #[error("Encode failed: {0}")]
    Encode(#[source] BackendError),
    #[error("Malformed data URI: {0}")]
    MalformedDataUri(String),
    #[error("Resize worker stopped: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ResizeError>;

/// What a resize produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeOutcome {
    /// The output file. On passthrough this is the input, byte for byte.
    pub file: ImageFile,
    pub resized: bool,
    /// Size before resizing; `None` on passthrough.
    pub original: Option<Dimensions>,
    /// Size of `file`'s image.
    pub dimensions: Dimensions,
}

impl ResizeOutcome {
    fn passthrough(file: ImageFile, dimensions: Dimensions) -> Self {
        Self {
            file,
            resized: false,
            original: None,
            dimensions,
        }
    }
}

fn check_input(file: &ImageFile) -> Result<()> {
    if !file.is_image() {
        return Err(ResizeError::NotAnImage {
            media_type: file.media_type.clone(),
        });
    }
    Ok(())
}

fn decode<B: ImageBackend>(backend: &B, file: &ImageFile) -> Result<(B::Bitmap, Dimensions)> {
    let bitmap = backend.decode(&file.bytes).map_err(ResizeError::Decode)?;
    let dims = backend.dimensions(&bitmap);
    if dims.width == 0 || dims.height == 0 {
        return Err(ResizeError::Decode(BackendError::ProcessingFailed(format!(
            "{} decoded to an empty {}x{} bitmap",
            file.name, dims.width, dims.height
        ))));
    }
    Ok((bitmap, dims))
}

fn encoded_file<B: ImageBackend>(
    backend: &B,
    surface: &B::Bitmap,
    name: String,
    encode: &EncodeParams,
) -> Result<ImageFile> {
    let bytes = backend.encode(surface, encode).map_err(ResizeError::Encode)?;
    Ok(ImageFile {
        name,
        media_type: encode.format.mime_type().to_string(),
        bytes,
    })
}

/// Shrink `file` so its longer side is at most `max_size`, encoding as JPEG.
///
/// See [`resize_with`] for the full contract.
pub fn resize(
    backend: &impl ImageBackend,
    file: ImageFile,
    max_size: u32,
) -> Result<ResizeOutcome> {
    resize_with(backend, file, max_size, &EncodeParams::default())
}

/// Shrink `file` so its longer side is at most `max_size`.
///
/// The declared media type is checked before anything is decoded. Images
/// already inside the bound are returned as-is without re-encoding; anything
/// larger is drawn once onto a surface of the [`fit_within`] size and encoded
/// with `encode`.
pub fn resize_with(
    backend: &impl ImageBackend,
    file: ImageFile,
    max_size: u32,
    encode: &EncodeParams,
) -> Result<ResizeOutcome> {
    check_input(&file)?;
    if max_size == 0 {
        return Err(ResizeError::InvalidBound);
    }

    let (bitmap, original) = decode(backend, &file)?;
    let target = fit_within(original.width, original.height, max_size);

    if target.is_unchanged(original.width, original.height) {
        debug!(
            "{}: {}x{} fits in {}, passing through",
            file.name, original.width, original.height, max_size
        );
        return Ok(ResizeOutcome::passthrough(file, original));
    }

    let (width, height) = target.to_pixels();
    debug!(
        "{}: {}x{} -> {}x{} ({})",
        file.name, original.width, original.height, width, height, encode.format
    );
    let surface = backend.draw_scaled(&bitmap, width, height);
    drop(bitmap);

    Ok(ResizeOutcome {
        file: encoded_file(backend, &surface, file.name, encode)?,
        resized: true,
        original: Some(original),
        dimensions: Dimensions { width, height },
    })
}

/// Resize on a blocking worker and resolve once.
///
/// The media type is checked before the worker is spawned, so a non-image
/// rejects without any decode taking place. There is no cancellation; wrap
/// the future in `tokio::time::timeout` to bound it. Must be polled inside a
/// Tokio runtime.
pub async fn resize_async<B>(
    backend: Arc<B>,
    file: ImageFile,
    max_size: u32,
) -> Result<ResizeOutcome>
where
    B: ImageBackend + Send + Sync + 'static,
{
    check_input(&file)?;
    tokio::task::spawn_blocking(move || resize(backend.as_ref(), file, max_size)).await?
}

/// Cover `target` exactly: scale until both sides reach it, then center-crop.
///
/// Unlike [`resize_with`] this may enlarge a small source. An image that
/// already has exactly the target size is passed through untouched.
pub fn fill_to_size(
    backend: &impl ImageBackend,
    file: ImageFile,
    target: Dimensions,
    encode: &EncodeParams,
) -> Result<ResizeOutcome> {
    check_input(&file)?;
    if target.width == 0 || target.height == 0 {
        return Err(ResizeError::InvalidBound);
    }

    let (bitmap, original) = decode(backend, &file)?;
    if original == target {
        debug!("{}: already {}x{}", file.name, target.width, target.height);
        return Ok(ResizeOutcome::passthrough(file, original));
    }

    let (fill_w, fill_h) = calculate_fill_dimensions(
        (original.width, original.height),
        (target.width, target.height),
    );
    let (x, y) = center_crop_offset((fill_w, fill_h), (target.width, target.height));
    debug!(
        "{}: {}x{} -> fill {}x{} -> crop {}x{} at ({}, {})",
        file.name,
        original.width,
        original.height,
        fill_w,
        fill_h,
        target.width,
        target.height,
        x,
        y
    );

    let filled = backend.draw_scaled(&bitmap, fill_w, fill_h);
    drop(bitmap);
    let surface = backend.crop(&filled, x, y, target.width, target.height);

    Ok(ResizeOutcome {
        file: encoded_file(backend, &surface, file.name, encode)?,
        resized: true,
        original: Some(original),
        dimensions: target,
    })
}

/// Center-crop the largest area with the given aspect ratio.
///
/// An image that already has the ratio is passed through untouched. Never
/// scales; the output keeps the source's pixel density.
pub fn crop_to_aspect(
    backend: &impl ImageBackend,
    file: ImageFile,
    ratio: AspectRatio,
    encode: &EncodeParams,
) -> Result<ResizeOutcome> {
    check_input(&file)?;
    let (bitmap, original) = decode(backend, &file)?;

    let (width, height) = largest_aspect_crop((original.width, original.height), ratio);
    let (x, y) = center_crop_offset((original.width, original.height), (width, height));
    let region = Region {
        x,
        y,
        width,
        height,
    };
    debug!("{}: {} crop of {}x{} is {}", file.name, ratio, original.width, original.height, region);
    cut(backend, file, bitmap, original, region, encode)
}

/// Crop an explicit region.
///
/// Fails with [`ResizeError::InvalidGeometry`] when the region is empty or
/// reaches outside the decoded image. A region covering the whole image is a
/// passthrough.
pub fn crop_region(
    backend: &impl ImageBackend,
    file: ImageFile,
    region: Region,
    encode: &EncodeParams,
) -> Result<ResizeOutcome> {
    check_input(&file)?;
    let (bitmap, original) = decode(backend, &file)?;

    if !region.fits_within((original.width, original.height)) {
        return Err(ResizeError::InvalidGeometry(format!(
            "region {} is outside the {}x{} image",
            region, original.width, original.height
        )));
    }
    cut(backend, file, bitmap, original, region, encode)
}

fn cut<B: ImageBackend>(
    backend: &B,
    file: ImageFile,
    bitmap: B::Bitmap,
    original: Dimensions,
    region: Region,
    encode: &EncodeParams,
) -> Result<ResizeOutcome> {
    if region.is_whole((original.width, original.height)) {
        return Ok(ResizeOutcome::passthrough(file, original));
    }

    let surface = backend.crop(&bitmap, region.x, region.y, region.width, region.height);
    drop(bitmap);

    Ok(ResizeOutcome {
        file: encoded_file(backend, &surface, file.name, encode)?,
        resized: true,
        original: Some(original),
        dimensions: Dimensions {
            width: region.width,
            height: region.height,
        },
    })
}

/// One piece of a [`split_grid`] result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTile {
    /// 1-based, top to bottom.
    pub row: u32,
    /// 1-based, left to right.
    pub column: u32,
    /// Where the tile was cut from in the source.
    pub region: Region,
    /// Named `<stem>-<row>-<column>.<ext>`.
    pub file: ImageFile,
}

/// Cut `file` into a `columns`×`rows` grid of equal tiles, row by row.
///
/// With `tile_aspect` every tile gets that shape (e.g. 1:1 for a profile grid)
/// and the grid is centered on the image. Each tile is encoded separately.
pub fn split_grid(
    backend: &impl ImageBackend,
    file: ImageFile,
    columns: u32,
    rows: u32,
    tile_aspect: Option<AspectRatio>,
    encode: &EncodeParams,
) -> Result<Vec<GridTile>> {
    check_input(&file)?;
    if columns == 0 || rows == 0 {
        return Err(ResizeError::InvalidGeometry(format!(
            "grid must have at least one column and row, got {columns}x{rows}"
        )));
    }

    let (bitmap, original) = decode(backend, &file)?;
    let regions = grid_tiles((original.width, original.height), columns, rows, tile_aspect)
        .ok_or_else(|| {
            ResizeError::InvalidGeometry(format!(
                "{}x{} is too small for a {}x{} grid",
                original.width, original.height, columns, rows
            ))
        })?;

    let stem = Path::new(&file.name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    debug!(
        "{}: {}x{} into {}x{} tiles of {}x{}",
        file.name,
        original.width,
        original.height,
        columns,
        rows,
        regions[0].width,
        regions[0].height
    );

    regions
        .into_iter()
        .enumerate()
        .map(|(i, region)| -> Result<GridTile> {
            let i = i as u32;
            let (row, column) = (i / columns + 1, i % columns + 1);
            let surface = backend.crop(&bitmap, region.x, region.y, region.width, region.height);
            let name = format!("{}-{}-{}.{}", stem, row, column, encode.format.extension());
            Ok(GridTile {
                row,
                column,
                region,
                file: encoded_file(backend, &surface, name, encode)?,
            })
        })
        .collect()
}
