use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Sample layout of a [`PixelBuffer`]. Both formats use 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    Grayscale8,
    Rgb888,
}

impl PixelFormat {
    /// Number of interleaved samples per pixel.
    pub fn channels(&self) -> usize {
        match self {
            Self::Grayscale8 => 1,
            Self::Rgb888 => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Grayscale8 => "Grayscale8",
            Self::Rgb888 => "RGB888",
        }
    }
}

/// Rec. 601 luma, rounded to the nearest integer.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// An owned, row-major grid of 8-bit samples.
///
/// The sample vector always holds exactly `width * height * channels` bytes
/// and both dimensions are non-zero; every constructor checks this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a black buffer.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        let len = expected_len(width, height, format)?;
        Ok(Self {
            width,
            height,
            format,
            data: vec![0u8; len],
        })
    }

    /// Wrap existing interleaved samples.
    pub fn from_raw(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let expected = expected_len(width, height, format)?;
        if data.len() != expected {
            return Err(CoreError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Used by transforms that have already produced a correctly sized grid.
    pub(crate) fn from_parts(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * format.channels()
        );
        Self {
            width,
            height,
            format,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes in one row.
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Samples of the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Result<&[u8]> {
        let idx = self.index(x, y)?;
        Ok(&self.data[idx..idx + self.channels()])
    }

    /// Overwrite the pixel at (x, y). `samples` must hold one value per channel.
    pub fn set(&mut self, x: u32, y: u32, samples: &[u8]) -> Result<()> {
        let idx = self.index(x, y)?;
        let channels = self.channels();
        if samples.len() != channels {
            return Err(CoreError::invalid(
                "samples",
                format!(
                    "{} pixels take {channels} sample(s), got {}",
                    self.format.display_name(),
                    samples.len()
                ),
            ));
        }
        self.data[idx..idx + channels].copy_from_slice(samples);
        Ok(())
    }

    /// Convert to another format. Color to gray uses [`luma`]; gray to color
    /// replicates the single channel.
    pub fn convert(&self, format: PixelFormat) -> PixelBuffer {
        match (self.format, format) {
            (PixelFormat::Rgb888, PixelFormat::Grayscale8) => {
                let data = self
                    .data
                    .chunks_exact(3)
                    .map(|px| luma(px[0], px[1], px[2]))
                    .collect();
                Self::from_parts(self.width, self.height, format, data)
            }
            (PixelFormat::Grayscale8, PixelFormat::Rgb888) => {
                let data = self.data.iter().flat_map(|&v| [v, v, v]).collect();
                Self::from_parts(self.width, self.height, format, data)
            }
            _ => self.clone(),
        }
    }

    /// Sample of channel `c` with coordinates clamped to the nearest edge.
    pub(crate) fn sample_clamped(&self, x: i64, y: i64, c: usize) -> u8 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.data[(y * self.width as usize + x) * self.channels() + c]
    }

    fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(CoreError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y as usize * self.width as usize + x as usize) * self.channels())
    }
}

fn expected_len(width: u32, height: u32, format: PixelFormat) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(CoreError::EmptyBuffer);
    }
    Ok(width as usize * height as usize * format.channels())
}
