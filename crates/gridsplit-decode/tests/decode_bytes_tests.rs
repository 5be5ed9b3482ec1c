//! Tests decoding of encoded image bytes and files.

use std::io::Cursor;

use gridsplit_decode::{
    BytesImageLoader, DecodeError, FileImageLoader, ImageLoader, decode_image_bytes,
};

fn encode_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let buffer = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("png encoding should succeed");
    bytes
}

#[test]
fn decode_bytes_tests_reads_png_dimensions_and_pixels() {
    let bytes = encode_png(5, 3, [10, 20, 30, 128]);
    let image = decode_image_bytes(&bytes).expect("png should decode");
    assert_eq!((image.width, image.height), (5, 3));
    assert_eq!(image.rgba.len(), 5 * 3 * 4);
    assert_eq!(image.pixel(4, 2), [10, 20, 30, 128]);
}

#[test]
fn decode_bytes_tests_rejects_garbage() {
    let error = BytesImageLoader::new(b"definitely not an image".to_vec())
        .load()
        .expect_err("garbage should not decode");
    assert!(matches!(error, DecodeError::Decode(_)));
}

#[test]
fn decode_bytes_tests_reports_missing_file() {
    let loader = FileImageLoader::new("/nonexistent/gridsplit/input.png");
    let error = loader.load().expect_err("missing file should fail");
    assert!(matches!(error, DecodeError::Io { .. }));
    assert!(error.to_string().contains("input.png"));
}

#[test]
fn decode_bytes_tests_sniffs_format_without_extension() {
    let dir = std::env::temp_dir().join(format!("gridsplit-decode-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    let path = dir.join("upload.bin");
    std::fs::write(&path, encode_png(2, 2, [255, 0, 0, 255])).expect("fixture should write");

    let image = FileImageLoader::new(&path).load().expect("png should decode");
    assert_eq!(image.pixel(1, 1), [255, 0, 0, 255]);

    let _ = std::fs::remove_dir_all(&dir);
}
