use std::collections::BTreeSet;

use rasterlab_core::buffer::PixelBuffer;
use rasterlab_core::histogram::Histogram;

/// Assert two buffers have the same shape, format and samples, reporting the
/// first differing pixel.
pub fn assert_buffers_eq(actual: &PixelBuffer, expected: &PixelBuffer) {
    assert_eq!(
        (actual.width(), actual.height()),
        (expected.width(), expected.height()),
        "dimensions differ"
    );
    assert_eq!(actual.format(), expected.format(), "formats differ");
    if actual.data() != expected.data() {
        let channels = actual.channels();
        let idx = actual
            .data()
            .iter()
            .zip(expected.data())
            .position(|(a, b)| a != b)
            .unwrap_or(0)
            / channels;
        let x = idx as u32 % actual.width();
        let y = idx as u32 / actual.width();
        panic!(
            "pixel ({x}, {y}) differs: {:?} != {:?}",
            actual.get(x, y).unwrap(),
            expected.get(x, y).unwrap()
        );
    }
}

/// Assert every channel of `hist` sums to `pixels`.
pub fn assert_histogram_sums(hist: &Histogram, pixels: u64) {
    for c in 0..hist.channels() {
        assert_eq!(
            hist.total(c),
            pixels,
            "channel {c} sums to {}, expected {pixels}",
            hist.total(c)
        );
    }
}

/// Assert the buffer holds at most `max` distinct sample values.
pub fn assert_distinct_values_at_most(buf: &PixelBuffer, max: usize) {
    let distinct: BTreeSet<u8> = buf.data().iter().copied().collect();
    assert!(
        distinct.len() <= max,
        "found {} distinct values {:?}, expected at most {max}",
        distinct.len(),
        distinct
    );
}

/// Assert `table` never decreases.
pub fn assert_non_decreasing(table: &[u8]) {
    for (i, w) in table.windows(2).enumerate() {
        assert!(w[0] <= w[1], "table decreases at {}: {} > {}", i + 1, w[0], w[1]);
    }
}
