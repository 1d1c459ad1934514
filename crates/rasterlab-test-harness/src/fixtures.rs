use std::path::{Path, PathBuf};

use image::{GrayImage, RgbImage};
use rasterlab_core::buffer::{PixelBuffer, PixelFormat};

/// Write `buf` as a PNG into `output_dir` and return its path.
pub fn write_png(output_dir: &Path, name: &str, buf: &PixelBuffer) -> PathBuf {
    let output_path = output_dir.join(format!("{name}.png"));
    let data = buf.data().to_vec();
    let saved = match buf.format() {
        PixelFormat::Grayscale8 => GrayImage::from_raw(buf.width(), buf.height(), data)
            .expect("gray buffer size")
            .save(&output_path),
        PixelFormat::Rgb888 => RgbImage::from_raw(buf.width(), buf.height(), data)
            .expect("rgb buffer size")
            .save(&output_path),
    };
    saved.expect("failed to write test png");
    assert!(output_path.exists(), "test image was not created: {name}");
    output_path
}

/// Write a JSON document (recipe, kernel) into `output_dir`.
pub fn write_json(output_dir: &Path, name: &str, json: &str) -> PathBuf {
    let output_path = output_dir.join(format!("{name}.json"));
    std::fs::write(&output_path, json).expect("failed to write test json");
    output_path
}

/// Get a temporary directory for test fixtures that persists for the test run.
pub fn fixture_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("failed to create temp dir for fixtures")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::PixelBufferBuilder;

    #[test]
    fn test_write_png() {
        let dir = fixture_dir();
        let buf = PixelBufferBuilder::rgb(3, 2).gradient().build();
        let path = write_png(dir.path(), "gradient", &buf);
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0, "written png should not be empty");
    }
}
