//! Per-pixel transforms. Every operation here is a lookup table applied to
//! each channel, so grayscale and color buffers share one code path.

use rayon::prelude::*;

use crate::buffer::{PixelBuffer, PixelFormat};
use crate::error::{CoreError, Result};

/// A 256-entry sample remapping table.
pub type Lut = [u8; 256];

pub const BRIGHTNESS_RANGE: std::ops::RangeInclusive<i32> = -255..=255;
pub const MAX_CONTRAST: f64 = 10.0;

/// Build a table by evaluating `f` for every sample value.
pub fn build_lut(f: impl Fn(u8) -> u8) -> Lut {
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        *out = f(v as u8);
    }
    lut
}

/// Apply one table per channel. A single table is shared by all channels.
pub(crate) fn remap_channels(input: &PixelBuffer, luts: &[Lut]) -> PixelBuffer {
    let channels = input.channels();
    debug_assert!(luts.len() == 1 || luts.len() == channels);

    let mut data = input.data().to_vec();
    // Row-based parallelism to avoid rayon micro-task overhead
    data.par_chunks_exact_mut(input.row_len()).for_each(|row| {
        for pixel in row.chunks_exact_mut(channels) {
            for (c, sample) in pixel.iter_mut().enumerate() {
                let lut = &luts[c.min(luts.len() - 1)];
                *sample = lut[*sample as usize];
            }
        }
    });
    PixelBuffer::from_parts(input.width(), input.height(), input.format(), data)
}

/// Luma conversion; the result is always Grayscale8.
pub fn grayscale(input: &PixelBuffer) -> PixelBuffer {
    input.convert(PixelFormat::Grayscale8)
}

/// Adds `delta` to every sample, clamped to 0..=255.
pub fn brightness(input: &PixelBuffer, delta: i32) -> Result<PixelBuffer> {
    if !BRIGHTNESS_RANGE.contains(&delta) {
        return Err(CoreError::invalid(
            "brightness",
            format!("delta {delta} is outside [-255, 255]"),
        ));
    }
    let lut = build_lut(|v| (v as i32 + delta).clamp(0, 255) as u8);
    Ok(remap_channels(input, &[lut]))
}

/// Scales every sample by `factor`, rounded and clamped to 0..=255.
pub fn contrast(input: &PixelBuffer, factor: f64) -> Result<PixelBuffer> {
    if !(factor > 0.0 && factor <= MAX_CONTRAST) {
        return Err(CoreError::invalid(
            "contrast",
            format!("factor {factor} is outside (0, {MAX_CONTRAST}]"),
        ));
    }
    let lut = build_lut(|v| (v as f64 * factor).round().clamp(0.0, 255.0) as u8);
    Ok(remap_channels(input, &[lut]))
}

/// Inverts every sample.
pub fn negative(input: &PixelBuffer) -> PixelBuffer {
    let lut = build_lut(|v| 255 - v);
    remap_channels(input, &[lut])
}
