use rasterlab_core::buffer::PixelFormat;
use rasterlab_io::codec::{decode, encode};
use rasterlab_io::error::IoError;
use rasterlab_test_harness::assertions::assert_buffers_eq;
use rasterlab_test_harness::builders::PixelBufferBuilder;
use rasterlab_test_harness::fixtures;

#[test]
fn test_decode_gray_png() {
    let dir = fixtures::fixture_dir();
    let buf = PixelBufferBuilder::gray(9, 4).noise(21).build();
    let path = fixtures::write_png(dir.path(), "gray", &buf);

    let decoded = decode(&path).unwrap();
    assert_eq!(decoded.format(), PixelFormat::Grayscale8);
    assert_buffers_eq(&decoded, &buf);
}

#[test]
fn test_encode_then_decode_rgb_png() {
    let dir = fixtures::fixture_dir();
    let buf = PixelBufferBuilder::rgb(5, 7).gradient().build();
    let path = dir.path().join("out.png");

    encode(&buf, &path).unwrap();
    assert_buffers_eq(&decode(&path).unwrap(), &buf);
}

#[test]
fn test_decode_missing_file() {
    let dir = fixtures::fixture_dir();
    let res = decode(&dir.path().join("missing.png"));
    assert!(matches!(res, Err(IoError::Io(_))));
}

#[test]
fn test_decode_garbage() {
    let dir = fixtures::fixture_dir();
    let path = dir.path().join("garbage.png");
    std::fs::write(&path, b"definitely not an image").unwrap();
    assert!(matches!(decode(&path), Err(IoError::Decode { .. })));
}

#[test]
fn test_encode_unknown_extension() {
    let dir = fixtures::fixture_dir();
    let buf = PixelBufferBuilder::gray(2, 2).build();
    let res = encode(&buf, &dir.path().join("out.unknownext"));
    assert!(matches!(res, Err(IoError::Encode { .. })));
}
