//! # pixfit
//!
//! Aspect-preserving image downscaling and social-media size presets, in pure
//! Rust. Every operation is a plain function over bytes: decode, decide a
//! size, redraw once, encode.
//!
//! # The Resize Contract
//!
//! ```text
//! ImageFile ──check type──▶ decode ──fit_within──▶ unchanged? ──yes──▶ original bytes
//!                                                      │
//!                                                      no
//!                                                      ▼
//!                                     draw_scaled ──▶ encode ──▶ new bytes
//! ```
//!
//! - **Never upscales.** The longer side is bounded; smaller images are left alone.
//! - **Passthrough is byte-identical.** An image that already fits is returned
//!   as the very bytes that came in, never recompressed.
//! - **Type is checked first.** A file whose declared media type isn't
//!   `image/*` is rejected before the decoder ever sees it.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Dimension policy, backend trait, resize/fill operations, data URIs |
//! | [`presets`] | Static table of social-media target sizes |
//! | [`batch`] | Parallel resizing of files and directories on disk, JSON reports |
//! | [`config`] | `pixfit.toml` loading, validation and merging onto stock defaults |
//! | [`output`] | CLI output formatting for batch progress and presets |
//!
//! # Design Decisions
//!
//! ## Backend Trait Over Direct `image` Calls
//!
//! Operations talk to an [`imaging::ImageBackend`] rather than to the `image`
//! crate. The operation code decides sizes; the backend owns pixels. Tests run
//! the full decision logic against a recording mock whose bitmaps are just
//! dimensions, so a 4000×3000 scenario costs nothing to test.
//!
//! ## Round, Don't Floor
//!
//! Scaled sizes stay fractional until the surface is allocated and are then
//! rounded to the nearest pixel (never below one). The result is the same on
//! every platform.
//!
//! ## Owned Bitmaps
//!
//! Decoded bitmaps and raster surfaces are ordinary owned values. Whatever
//! path an operation exits by, including every error path, they are dropped
//! with it; nothing is cached between calls.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod output;
pub mod presets;

#[cfg(test)]
pub(crate) mod test_helpers;
