//! Histogram analysis and the remaps built on cumulative distributions:
//! equalization, gray-level quantization and histogram matching.

use crate::buffer::{PixelBuffer, PixelFormat};
use crate::error::{CoreError, Result};
use crate::point::{Lut, build_lut, remap_channels};

pub const BINS: usize = 256;

/// Per-channel frequency counts of sample values 0..=255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    format: PixelFormat,
    bins: Vec<Vec<u64>>,
}

impl Histogram {
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.bins.len()
    }

    /// The 256 bins of one channel (R, G, B order for color buffers).
    pub fn channel(&self, c: usize) -> Option<&[u64]> {
        self.bins.get(c).map(|b| b.as_slice())
    }

    /// Sum of all bins of one channel; equals the source pixel count.
    pub fn total(&self, c: usize) -> u64 {
        self.channel(c).map_or(0, |b| b.iter().sum())
    }
}

/// Count sample values per channel.
pub fn histogram(input: &PixelBuffer) -> Histogram {
    let channels = input.channels();
    let mut bins = vec![vec![0u64; BINS]; channels];
    for pixel in input.data().chunks_exact(channels) {
        for (c, &v) in pixel.iter().enumerate() {
            bins[c][v as usize] += 1;
        }
    }
    Histogram {
        format: input.format(),
        bins,
    }
}

/// Cumulative distribution of one channel scaled to 0..=255.
///
/// Each bin is scaled and rounded on its own before being accumulated, and the
/// running sum saturates at 255, so the table is non-decreasing. A zero pixel
/// count yields an all-zero table.
pub fn cdf(bins: &[u64], total_pixels: u64) -> Lut {
    let mut out = [0u8; BINS];
    if total_pixels == 0 {
        return out;
    }
    let scale = 255.0 / total_pixels as f64;
    let mut acc: u64 = 0;
    for (i, slot) in out.iter_mut().enumerate() {
        let count = bins.get(i).copied().unwrap_or(0);
        // Counts may exceed the pixel total, so the step can be huge.
        let step = (scale * count as f64).round() as u64;
        acc = acc.saturating_add(step).min(255);
        *slot = acc as u8;
    }
    out
}

/// Remap each channel through its own cumulative distribution.
pub fn equalize(input: &PixelBuffer) -> PixelBuffer {
    let hist = histogram(input);
    let total = input.pixel_count() as u64;
    let luts: Vec<Lut> = hist.bins.iter().map(|b| cdf(b, total)).collect();
    remap_channels(input, &luts)
}

/// Reduce the gray-level count to `levels` evenly sized bins spanning the
/// occupied value range. The result is Grayscale8.
///
/// When `levels` already covers the occupied range nothing is merged and the
/// grayscale conversion of `input` is returned, so color input still comes
/// back as Grayscale8.
pub fn quantize(input: &PixelBuffer, levels: u32) -> Result<PixelBuffer> {
    if levels == 0 {
        return Err(CoreError::invalid("levels", "must be greater than zero"));
    }
    let gray = input.convert(PixelFormat::Grayscale8);
    let (t1, t2) = gray
        .data()
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = t2 as u32 - t1 as u32 + 1;
    if levels >= range {
        return Ok(gray);
    }

    let width = range as f64 / levels as f64;
    let t1 = t1 as f64;
    let lut = build_lut(|v| {
        let bin = ((v as f64 - t1 + 0.5) / width).floor();
        (t1 - 0.5 + (bin + 0.5) * width).round().clamp(0.0, 255.0) as u8
    });
    Ok(remap_channels(&gray, &[lut]))
}

/// Table mapping each source value to the smallest reference value whose
/// cumulative share reaches the source's. Values with no match map to 255.
pub fn matching_table(source: &Lut, reference: &Lut) -> Lut {
    let mut table = [0u8; BINS];
    let mut j = 0usize;
    for (i, slot) in table.iter_mut().enumerate() {
        // Both tables are non-decreasing, so the search resumes where the
        // previous value stopped.
        if i > 0 && source[i] < source[i - 1] {
            j = 0;
        }
        while j < BINS && reference[j] < source[i] {
            j += 1;
        }
        *slot = j.min(BINS - 1) as u8;
    }
    table
}

/// Reshape the gray-level distribution of `input` to follow `reference`.
/// Both are converted to Grayscale8 first.
pub fn match_histogram(input: &PixelBuffer, reference: &PixelBuffer) -> PixelBuffer {
    let src = input.convert(PixelFormat::Grayscale8);
    let refr = reference.convert(PixelFormat::Grayscale8);

    let src_cdf = cdf(&histogram(&src).bins[0], src.pixel_count() as u64);
    let ref_cdf = cdf(&histogram(&refr).bins[0], refr.pixel_count() as u64);
    let table = matching_table(&src_cdf, &ref_cdf);
    remap_channels(&src, &[table])
}

/// Bar heights for drawing one channel as a chart of the given pixel height.
/// The tallest bin fills the full height.
pub fn histogram_chart(hist: &Histogram, channel: usize, height: u32) -> Result<Vec<u32>> {
    let bins = hist.channel(channel).ok_or_else(|| {
        CoreError::invalid(
            "channel",
            format!("{channel} is not a channel of a {} histogram", hist.format.display_name()),
        )
    })?;
    let max = bins.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return Ok(vec![0; BINS]);
    }
    Ok(bins
        .iter()
        .map(|&count| (count as f64 / max as f64 * height as f64).round() as u32)
        .collect())
}
