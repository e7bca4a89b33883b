//! Shared test utilities for the pixfit test suite.
//!
//! Synthesizes small encoded images in memory so tests never depend on
//! fixture files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let file = jpeg_file("photo.jpg", 400, 300);
//! let outcome = resize(&RustBackend::new(), file, 200).unwrap();
//! ```

use crate::imaging::ImageFile;
use image::{ImageEncoder, RgbImage, RgbaImage};
use std::path::Path;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Encode a gradient of the given size as JPEG.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Encode a half-transparent gradient of the given size as PNG.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 64, 200])
    });
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .unwrap();
    buf
}

pub fn jpeg_file(name: &str, width: u32, height: u32) -> ImageFile {
    ImageFile::new(name, "image/jpeg", create_test_jpeg(width, height))
}

pub fn png_file(name: &str, width: u32, height: u32) -> ImageFile {
    ImageFile::new(name, "image/png", create_test_png(width, height))
}

/// Write a JPEG of the given size to `path`, creating parent directories.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, create_test_jpeg(width, height)).unwrap();
}

/// Decoded `(width, height)` of an encoded image on disk.
pub fn dimensions_on_disk(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}
