//! End-to-end checks of the public library API against real encoded images.
//!
//! Run with: cargo test --test resize_library

use image::{ImageEncoder, RgbImage};
use pixfit::imaging::{
    AspectRatio, Dimensions, ImageFile, ResizeError, RustBackend, crop_region, crop_to_aspect,
    decode_data_uri, encode_data_uri, fill_to_size, resize, resize_async, split_grid,
};
use pixfit::presets::find_preset;
use std::sync::Arc;

fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 200])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

fn decoded_size(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes).unwrap();
    (img.width(), img.height())
}

#[test]
fn landscape_upload_is_bounded_on_width() {
    let file = ImageFile::new("wide.jpg", "image/jpeg", jpeg(640, 480));
    let outcome = resize(&RustBackend::new(), file, 320).unwrap();

    assert!(outcome.resized);
    assert_eq!(outcome.original, Some(Dimensions { width: 640, height: 480 }));
    assert_eq!(decoded_size(&outcome.file.bytes), (320, 240));
}

#[test]
fn square_upload_is_bounded_on_height() {
    let file = ImageFile::new("square.jpg", "image/jpeg", jpeg(200, 200));
    let outcome = resize(&RustBackend::new(), file, 100).unwrap();
    assert_eq!(decoded_size(&outcome.file.bytes), (100, 100));
}

#[test]
fn fitting_upload_comes_back_byte_identical() {
    let bytes = jpeg(300, 120);
    let file = ImageFile::new("banner.jpg", "image/jpeg", bytes.clone());

    let outcome = resize(&RustBackend::new(), file, 300).unwrap();

    assert!(!outcome.resized);
    assert_eq!(outcome.original, None);
    assert_eq!(outcome.file.bytes, bytes);
}

#[test]
fn text_upload_is_rejected() {
    let file = ImageFile::new("notes.txt", "text/plain", b"just words".to_vec());
    let err = resize(&RustBackend::new(), file, 100).unwrap_err();
    assert!(matches!(err, ResizeError::NotAnImage { .. }));
}

#[test]
fn mislabelled_bytes_fail_to_decode() {
    let file = ImageFile::new("fake.png", "image/png", b"just words".to_vec());
    let err = resize(&RustBackend::new(), file, 100).unwrap_err();
    assert!(matches!(err, ResizeError::Decode(_)));
}

#[test]
fn data_uri_upload_can_be_resized() {
    let uri = encode_data_uri("image/jpeg", &jpeg(90, 60));
    let file = decode_data_uri(&uri).unwrap().into_file("pasted");

    let outcome = resize(&RustBackend::new(), file, 45).unwrap();
    assert_eq!(decoded_size(&outcome.file.bytes), (45, 30));
}

#[test]
fn preset_produces_exact_size() {
    let preset = find_preset("li-post-link").unwrap();
    let file = ImageFile::new("photo.jpg", "image/jpeg", jpeg(800, 800));

    let outcome = fill_to_size(
        &RustBackend::new(),
        file,
        preset.dimensions(),
        &Default::default(),
    )
    .unwrap();

    assert_eq!(decoded_size(&outcome.file.bytes), (1200, 627));
}

#[tokio::test]
async fn async_resize_resolves_once() {
    let file = ImageFile::new("tall.jpg", "image/jpeg", jpeg(120, 360));
    let outcome = resize_async(Arc::new(RustBackend::new()), file, 90)
        .await
        .unwrap();

    assert!(outcome.resized);
    assert_eq!(decoded_size(&outcome.file.bytes), (30, 90));
}

#[test]
fn square_crop_for_an_avatar() {
    let file = ImageFile::new("me.jpg", "image/jpeg", jpeg(640, 480));
    let square: AspectRatio = "1:1".parse().unwrap();

    let outcome = crop_to_aspect(&RustBackend::new(), file, square, &Default::default()).unwrap();

    assert_eq!(outcome.original, Some(Dimensions { width: 640, height: 480 }));
    assert_eq!(decoded_size(&outcome.file.bytes), (480, 480));
}

#[test]
fn region_crop_outside_the_image_fails() {
    let file = ImageFile::new("me.jpg", "image/jpeg", jpeg(64, 64));
    let err = crop_region(
        &RustBackend::new(),
        file,
        "32x32+48+0".parse().unwrap(),
        &Default::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ResizeError::InvalidGeometry(_)));
}

#[test]
fn carousel_split_gives_square_tiles() {
    let file = ImageFile::new("wide.jpg", "image/jpeg", jpeg(900, 400));

    let tiles = split_grid(
        &RustBackend::new(),
        file,
        3,
        1,
        Some("1:1".parse().unwrap()),
        &Default::default(),
    )
    .unwrap();

    assert_eq!(tiles.len(), 3);
    for tile in &tiles {
        assert_eq!(decoded_size(&tile.file.bytes), (300, 300));
    }
    assert_eq!(tiles[2].file.name, "wide-1-3.jpg");
}
