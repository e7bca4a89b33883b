//! Image processing in pure Rust, with no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Shrink to bound** | [`fit_within`] + `resize_exact` (Lanczos3) |
//! | **Fill to preset** | [`calculate_fill_dimensions`] + center crop |
//! | **Crop** | [`largest_aspect_crop`] or an explicit [`Region`] + `crop_imm` |
//! | **Split** | [`grid_tiles`], one crop + encode per tile |
//! | **Encode** | JPEG (default), PNG, lossless WebP, AVIF (rav1e) |
//! | **Data URIs** | `base64` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing how output is encoded
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod data_uri;
mod file;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    AspectRatio, ParseGeometryError, Region, ScaledSize, calculate_fill_dimensions,
    center_crop_offset, fit_within, grid_tiles, largest_aspect_crop,
};
pub use data_uri::{Blob, decode_data_uri, encode_data_uri};
pub use file::{ImageFile, is_image_media_type, media_type_for_path};
pub use operations::{
    GridTile, ResizeError, ResizeOutcome, crop_region, crop_to_aspect, fill_to_size, resize,
    resize_async, resize_with, split_grid,
};
pub use params::{EncodeParams, OutputFormat, Quality};
pub use rust_backend::{RustBackend, supported_input_extensions};
