//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the host side of every operation: it decodes
//! bytes into a bitmap, redraws bitmaps onto new raster surfaces, and encodes
//! surfaces back to bytes. The operations in [`operations`](super::operations)
//! only decide *what* to draw.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Bitmaps are plain owned
//! values, so every decode buffer and raster surface is released when the
//! operation returns, on success and on every error path alike.

use super::params::EncodeParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of a decoded bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Trait for image processing backends.
///
/// `Bitmap` is both the decoded source and the raster surface a scaled draw
/// produces. Backends are shared across rayon workers, hence `Sync`.
pub trait ImageBackend: Sync {
    type Bitmap;

    /// Decode encoded bytes (JPEG, PNG, ...) into a bitmap.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Bitmap, BackendError>;

    /// Natural size of a bitmap.
    fn dimensions(&self, bitmap: &Self::Bitmap) -> Dimensions;

    /// Allocate a `width`×`height` surface and draw `bitmap` scaled into it.
    fn draw_scaled(&self, bitmap: &Self::Bitmap, width: u32, height: u32) -> Self::Bitmap;

    /// Copy a `width`×`height` region starting at `(x, y)` onto a new surface.
    fn crop(&self, bitmap: &Self::Bitmap, x: u32, y: u32, width: u32, height: u32)
    -> Self::Bitmap;

    /// Serialize a surface to bytes.
    fn encode(&self, surface: &Self::Bitmap, params: &EncodeParams)
    -> Result<Vec<u8>, BackendError>;
}
