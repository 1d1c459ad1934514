//! Conversion between image files and [`PixelBuffer`]s.
//!
//! 8-bit luma images decode to Grayscale8. Everything else decodes to RGB888:
//! alpha is dropped and deeper samples are reduced to 8 bits.

use std::path::Path;

use image::{DynamicImage, GrayImage, RgbImage};
use rasterlab_core::buffer::{PixelBuffer, PixelFormat};
use rasterlab_core::error::CoreError;

use crate::error::{IoError, Result};

/// Convert a decoded image into a pixel buffer.
pub fn from_dynamic(image: DynamicImage) -> Result<PixelBuffer> {
    let (width, height) = (image.width(), image.height());
    let (format, data) = match image {
        DynamicImage::ImageLuma8(gray) => (PixelFormat::Grayscale8, gray.into_raw()),
        other if other.color().has_color() => (PixelFormat::Rgb888, other.to_rgb8().into_raw()),
        other => (PixelFormat::Grayscale8, other.to_luma8().into_raw()),
    };
    Ok(PixelBuffer::from_raw(width, height, format, data)?)
}

/// Convert a pixel buffer into an image the `image` crate can encode.
pub fn to_dynamic(buf: &PixelBuffer) -> Result<DynamicImage> {
    let (width, height) = (buf.width(), buf.height());
    let data = buf.data().to_vec();
    let len = data.len();
    let image = match buf.format() {
        PixelFormat::Grayscale8 => {
            GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8)
        }
        PixelFormat::Rgb888 => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
    };
    image.ok_or_else(|| {
        IoError::Core(CoreError::DataLength {
            expected: buf.pixel_count() * buf.channels(),
            actual: len,
        })
    })
}

/// Read and decode an image file. The format is detected from the content.
pub fn decode(path: &Path) -> Result<PixelBuffer> {
    let image = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| IoError::Decode {
            path: path.display().to_string(),
            source,
        })?;
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "decoded image"
    );
    from_dynamic(image)
}

/// Encode `buf` to `path`; the file format follows the extension.
pub fn encode(buf: &PixelBuffer, path: &Path) -> Result<()> {
    to_dynamic(buf)?
        .save(path)
        .map_err(|source| IoError::Encode {
            path: path.display().to_string(),
            source,
        })?;
    tracing::debug!(
        path = %path.display(),
        width = buf.width(),
        height = buf.height(),
        "encoded image"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_from_dynamic_luma() {
        let img = GrayImage::from_raw(2, 1, vec![3, 9]).unwrap();
        let buf = from_dynamic(DynamicImage::ImageLuma8(img)).unwrap();
        assert_eq!(buf.format(), PixelFormat::Grayscale8);
        assert_eq!(buf.data(), &[3, 9]);
    }

    #[test]
    fn test_from_dynamic_drops_alpha() {
        let mut img = RgbaImage::new(1, 1);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 7]));
        let buf = from_dynamic(DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(buf.format(), PixelFormat::Rgb888);
        assert_eq!(buf.data(), &[10, 20, 30]);
    }

    #[test]
    fn test_from_dynamic_luma16_reduces_depth() {
        let img = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_raw(1, 1, vec![65535])
            .unwrap();
        let buf = from_dynamic(DynamicImage::ImageLuma16(img)).unwrap();
        assert_eq!(buf.format(), PixelFormat::Grayscale8);
        assert_eq!(buf.data(), &[255]);
    }

    #[test]
    fn test_from_dynamic_empty_image() {
        let res = from_dynamic(DynamicImage::new_rgb8(0, 4));
        assert!(matches!(res, Err(IoError::Core(_))));
    }

    #[test]
    fn test_to_dynamic_keeps_layout() {
        let buf = PixelBuffer::from_raw(1, 2, PixelFormat::Rgb888, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let img = to_dynamic(&buf).unwrap();
        assert_eq!((img.width(), img.height()), (1, 2));
        assert_eq!(img.to_rgb8().into_raw(), vec![1, 2, 3, 4, 5, 6]);
    }
}
