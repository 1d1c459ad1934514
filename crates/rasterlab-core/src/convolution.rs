//! Spatial filtering with square kernels.
//!
//! Weights are used exactly as supplied, without normalization. The kernel is
//! laid over the image without flipping: weight `(row, col)` multiplies the
//! sample at `(x + col - c, y + row - c)` where `c` is the center offset.
//! Samples outside the image repeat the nearest edge pixel.

use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::{CoreError, Result};

pub const GAUSSIAN: [f64; 9] = [
    0.0625, 0.125, 0.0625, //
    0.125, 0.25, 0.125, //
    0.0625, 0.125, 0.0625,
];
pub const LAPLACIAN: [f64; 9] = [
    0.0, -1.0, 0.0, //
    -1.0, 4.0, -1.0, //
    0.0, -1.0, 0.0,
];
pub const HIGH_PASS: [f64; 9] = [
    -1.0, -1.0, -1.0, //
    -1.0, 8.0, -1.0, //
    -1.0, -1.0, -1.0,
];
pub const PREWITT_HX: [f64; 9] = [
    -1.0, 0.0, 1.0, //
    -1.0, 0.0, 1.0, //
    -1.0, 0.0, 1.0,
];
pub const PREWITT_HY: [f64; 9] = [
    -1.0, -1.0, -1.0, //
    0.0, 0.0, 0.0, //
    1.0, 1.0, 1.0,
];
pub const SOBEL_HX: [f64; 9] = [
    -1.0, 0.0, 1.0, //
    -2.0, 0.0, 2.0, //
    -1.0, 0.0, 1.0,
];
pub const SOBEL_HY: [f64; 9] = [
    -1.0, -2.0, -1.0, //
    0.0, 0.0, 0.0, //
    1.0, 2.0, 1.0,
];

#[derive(Deserialize)]
struct RawKernel {
    size: usize,
    weights: Vec<f64>,
}

/// An N x N grid of weights, N odd. Stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

impl<'de> Deserialize<'de> for Kernel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawKernel::deserialize(deserializer)?;
        Kernel::new(raw.size, raw.weights).map_err(serde::de::Error::custom)
    }
}

impl Kernel {
    pub fn new(size: usize, weights: Vec<f64>) -> Result<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(CoreError::InvalidKernel(format!(
                "size must be odd and at least 1, got {size}"
            )));
        }
        if weights.len() != size * size {
            return Err(CoreError::InvalidKernel(format!(
                "{size}x{size} kernel needs {} weights, got {}",
                size * size,
                weights.len()
            )));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite()) {
            return Err(CoreError::InvalidKernel(format!("weight {bad} is not finite")));
        }
        Ok(Self { size, weights })
    }

    /// Build from nested rows; every row must be as long as there are rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|r| r.len() != size) {
            return Err(CoreError::InvalidKernel(format!(
                "kernel is not square: {size} rows but a row of {}",
                row.len()
            )));
        }
        Self::new(size, rows.concat())
    }

    /// The 1x1 kernel `[1]`.
    pub fn identity() -> Self {
        Self {
            size: 1,
            weights: vec![1.0],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Offset of the center element from the top-left corner.
    pub fn center(&self) -> usize {
        (self.size - 1) / 2
    }

    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights[row * self.size + col]
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Named 3x3 filters offered by the kernel dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KernelPreset {
    Gaussian,
    Laplacian,
    HighPass,
    PrewittHx,
    PrewittHy,
    SobelHx,
    SobelHy,
}

impl KernelPreset {
    pub fn all() -> &'static [KernelPreset] {
        &[
            Self::Gaussian,
            Self::Laplacian,
            Self::HighPass,
            Self::PrewittHx,
            Self::PrewittHy,
            Self::SobelHx,
            Self::SobelHy,
        ]
    }

    /// Stable kebab-case identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::Laplacian => "laplacian",
            Self::HighPass => "high-pass",
            Self::PrewittHx => "prewitt-hx",
            Self::PrewittHy => "prewitt-hy",
            Self::SobelHx => "sobel-hx",
            Self::SobelHy => "sobel-hy",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gaussian => "Gaussian Filter",
            Self::Laplacian => "Laplacian Filter",
            Self::HighPass => "High-Pass Filter",
            Self::PrewittHx => "Prewitt Hx",
            Self::PrewittHy => "Prewitt Hy",
            Self::SobelHx => "Sobel Hx",
            Self::SobelHy => "Sobel Hy",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.name() == name)
    }

    pub fn weights(&self) -> &'static [f64; 9] {
        match self {
            Self::Gaussian => &GAUSSIAN,
            Self::Laplacian => &LAPLACIAN,
            Self::HighPass => &HIGH_PASS,
            Self::PrewittHx => &PREWITT_HX,
            Self::PrewittHy => &PREWITT_HY,
            Self::SobelHx => &SOBEL_HX,
            Self::SobelHy => &SOBEL_HY,
        }
    }

    pub fn kernel(&self) -> Kernel {
        Kernel {
            size: 3,
            weights: self.weights().to_vec(),
        }
    }
}

/// Weighted neighborhood sum for every pixel and channel, rounded and clamped
/// to 0..=255. Output has the input's dimensions and format.
pub fn convolve(input: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let channels = input.channels();
    let width = input.width() as usize;
    let center = kernel.center() as i64;
    let size = kernel.size();

    let mut data = vec![0u8; input.data().len()];
    // Reads only touch the input, so rows can be filled independently.
    data.par_chunks_exact_mut(input.row_len())
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                for c in 0..channels {
                    let mut acc = 0.0f64;
                    for ky in 0..size {
                        let sy = y as i64 + ky as i64 - center;
                        for kx in 0..size {
                            let w = kernel.weight(ky, kx);
                            if w == 0.0 {
                                continue;
                            }
                            let sx = x as i64 + kx as i64 - center;
                            acc += w * input.sample_clamped(sx, sy, c) as f64;
                        }
                    }
                    row[x * channels + c] = acc.round().clamp(0.0, 255.0) as u8;
                }
            }
        });
    PixelBuffer::from_parts(input.width(), input.height(), input.format(), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelFormat;

    fn gray(width: u32, height: u32, data: Vec<u8>) -> PixelBuffer {
        PixelBuffer::from_raw(width, height, PixelFormat::Grayscale8, data).unwrap()
    }

    #[test]
    fn test_kernel_rejects_even_size() {
        assert!(matches!(
            Kernel::new(2, vec![0.0; 4]),
            Err(CoreError::InvalidKernel(_))
        ));
        assert!(Kernel::new(0, vec![]).is_err());
    }

    #[test]
    fn test_kernel_rejects_wrong_weight_count() {
        assert!(Kernel::new(3, vec![0.0; 8]).is_err());
    }

    #[test]
    fn test_kernel_rejects_non_finite() {
        let mut w = vec![0.0; 9];
        w[4] = f64::INFINITY;
        assert!(Kernel::new(3, w).is_err());
    }

    #[test]
    fn test_kernel_from_rows_not_square() {
        let rows = vec![vec![0.0, 1.0, 0.0], vec![0.0, 1.0]];
        assert!(Kernel::from_rows(&rows).is_err());
    }

    #[test]
    fn test_kernel_deserialize_validates() {
        let ok: Kernel = serde_json::from_str(r#"{"size":1,"weights":[2.0]}"#).unwrap();
        assert_eq!(ok.weight(0, 0), 2.0);
        assert!(serde_json::from_str::<Kernel>(r#"{"size":2,"weights":[1,1,1,1]}"#).is_err());
    }

    #[test]
    fn test_identity_like_kernel_on_zero_buffer() {
        let buf = gray(4, 4, vec![0; 16]);
        let k = Kernel::from_rows(&[
            vec![0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();
        assert_eq!(convolve(&buf, &k), buf);
    }

    #[test]
    fn test_identity_kernel_keeps_content() {
        let buf = PixelBuffer::from_raw(2, 2, PixelFormat::Rgb888, (0..12).collect()).unwrap();
        assert_eq!(convolve(&buf, &Kernel::identity()), buf);
    }

    #[test]
    fn test_gaussian_on_flat_image_is_flat() {
        // Edge replication keeps border pixels flat too.
        let buf = gray(3, 3, vec![100; 9]);
        let result = convolve(&buf, &KernelPreset::Gaussian.kernel());
        assert!(result.data().iter().all(|&v| v == 100));
    }

    #[test]
    fn test_edge_replication_at_corner() {
        // Kernel picks the up-left neighbor; at (0,0) that is (0,0) itself.
        let buf = gray(2, 2, vec![10, 20, 30, 40]);
        let k = Kernel::new(3, vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        let result = convolve(&buf, &k);
        assert_eq!(result.data(), &[10, 10, 10, 10]);
    }

    #[test]
    fn test_sobel_hx_vertical_edge() {
        let buf = gray(4, 1, vec![0, 0, 100, 100]);
        let result = convolve(&buf, &KernelPreset::SobelHx.kernel());
        // Single row replicated vertically: response = 4 * (right - left)
        assert_eq!(result.data(), &[0, 255, 255, 0]);
    }

    #[test]
    fn test_negative_response_clamps_to_zero() {
        let buf = gray(3, 1, vec![100, 0, 100]);
        let result = convolve(&buf, &KernelPreset::Laplacian.kernel());
        // Center: 4*0 - 100 - 100 = -200 -> 0
        assert_eq!(result.data()[1], 0);
        assert_eq!(result.data()[0], 100);
    }

    #[test]
    fn test_no_normalization() {
        let buf = gray(1, 1, vec![50]);
        let k = Kernel::new(1, vec![2.0]).unwrap();
        assert_eq!(convolve(&buf, &k).data(), &[100]);
    }

    #[test]
    fn test_five_by_five_box() {
        let buf = gray(3, 3, vec![9; 9]);
        let k = Kernel::new(5, vec![1.0 / 25.0; 25]).unwrap();
        assert_eq!(convolve(&buf, &k).data(), &[9; 9]);
    }

    #[test]
    fn test_preset_names_roundtrip() {
        for preset in KernelPreset::all() {
            assert_eq!(KernelPreset::from_name(preset.name()), Some(*preset));
        }
        assert_eq!(KernelPreset::from_name("emboss"), None);
    }

    #[test]
    fn test_gaussian_sums_to_one() {
        let sum: f64 = GAUSSIAN.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }
}
