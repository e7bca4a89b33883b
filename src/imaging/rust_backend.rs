//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::load_from_memory` (format sniffed from magic bytes) |
//! | Scaled draw | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Crop | `image::DynamicImage::crop_imm` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder` (lossless) |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{EncodeParams, OutputFormat};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
///
/// AVIF is deliberately absent: the `image` crate's `"avif"` feature only
/// enables the **encoder**. `ImageFormat::reading_enabled()` still reports
/// `true` for AVIF in that configuration, so it cannot be trusted alone.
const DECODE_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("gif", ImageFormat::Gif),
    ("bmp", ImageFormat::Bmp),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    DECODE_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_failed(format: OutputFormat, e: image::ImageError) -> BackendError {
    BackendError::ProcessingFailed(format!("{} encode failed: {}", format, e))
}

impl ImageBackend for RustBackend {
    type Bitmap = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        image::load_from_memory(bytes)
            .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode image: {}", e)))
    }

    fn dimensions(&self, bitmap: &DynamicImage) -> Dimensions {
        Dimensions {
            width: bitmap.width(),
            height: bitmap.height(),
        }
    }

    fn draw_scaled(&self, bitmap: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        bitmap.resize_exact(width, height, FilterType::Lanczos3)
    }

    fn crop(&self, bitmap: &DynamicImage, x: u32, y: u32, width: u32, height: u32) -> DynamicImage {
        bitmap.crop_imm(x, y, width, height)
    }

    fn encode(
        &self,
        surface: &DynamicImage,
        params: &EncodeParams,
    ) -> Result<Vec<u8>, BackendError> {
        let mut buf = Vec::new();
        let quality = params.quality.value() as u8;

        match params.format {
            OutputFormat::Jpeg => {
                // JPEG has no alpha channel; flatten by dropping it.
                let rgb = DynamicImage::ImageRgb8(surface.to_rgb8());
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
                rgb.write_with_encoder(encoder)
                    .map_err(|e| encode_failed(params.format, e))?;
            }
            OutputFormat::Png => {
                let rgba = DynamicImage::ImageRgba8(surface.to_rgba8());
                let encoder = image::codecs::png::PngEncoder::new(&mut buf);
                rgba.write_with_encoder(encoder)
                    .map_err(|e| encode_failed(params.format, e))?;
            }
            OutputFormat::Webp => {
                let rgba = DynamicImage::ImageRgba8(surface.to_rgba8());
                let encoder = image::codecs::webp::WebPEncoder::new_lossless(&mut buf);
                rgba.write_with_encoder(encoder)
                    .map_err(|e| encode_failed(params.format, e))?;
            }
            OutputFormat::Avif => {
                let rgba = DynamicImage::ImageRgba8(surface.to_rgba8());
                let encoder =
                    image::codecs::avif::AvifEncoder::new_with_speed_quality(&mut buf, 6, quality);
                rgba.write_with_encoder(encoder)
                    .map_err(|e| encode_failed(params.format, e))?;
            }
        }

        Ok(buf)
    }
}
