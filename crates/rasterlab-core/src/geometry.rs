//! Flips and quarter-turn rotations. These are pure index permutations: the
//! output holds exactly the input samples, rearranged.

use crate::buffer::PixelBuffer;

/// Build a `width` x `height` output where pixel (x, y) is copied from the
/// input pixel returned by `source(x, y)`.
fn remap(
    input: &PixelBuffer,
    width: u32,
    height: u32,
    source: impl Fn(u32, u32) -> (u32, u32),
) -> PixelBuffer {
    let channels = input.channels();
    let src_stride = input.row_len();
    let src = input.data();
    let mut data = Vec::with_capacity(src.len());
    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = source(x, y);
            let si = sy as usize * src_stride + sx as usize * channels;
            data.extend_from_slice(&src[si..si + channels]);
        }
    }
    PixelBuffer::from_parts(width, height, input.format(), data)
}

/// Mirror left to right.
pub fn flip_horizontal(input: &PixelBuffer) -> PixelBuffer {
    let channels = input.channels();
    let mut data = Vec::with_capacity(input.data().len());
    for row in input.data().chunks_exact(input.row_len()) {
        for pixel in row.chunks_exact(channels).rev() {
            data.extend_from_slice(pixel);
        }
    }
    PixelBuffer::from_parts(input.width(), input.height(), input.format(), data)
}

/// Mirror top to bottom.
pub fn flip_vertical(input: &PixelBuffer) -> PixelBuffer {
    let mut data = Vec::with_capacity(input.data().len());
    for row in input.data().chunks_exact(input.row_len()).rev() {
        data.extend_from_slice(row);
    }
    PixelBuffer::from_parts(input.width(), input.height(), input.format(), data)
}

/// Rotate 90 degrees counter-clockwise. Width and height swap.
pub fn rotate_left(input: &PixelBuffer) -> PixelBuffer {
    let w = input.width();
    remap(input, input.height(), w, |x, y| (w - 1 - y, x))
}

/// Rotate 90 degrees clockwise. Width and height swap.
pub fn rotate_right(input: &PixelBuffer) -> PixelBuffer {
    let h = input.height();
    remap(input, h, input.width(), |x, y| (y, h - 1 - x))
}
