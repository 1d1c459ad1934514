use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rasterlab_core::buffer::{PixelBuffer, PixelFormat};

enum Fill {
    Solid(Vec<u8>),
    Gradient,
    Noise { seed: u64, lo: u8, hi: u8 },
}

/// Builder for test PixelBuffers with sensible defaults (8x6 black grayscale).
pub struct PixelBufferBuilder {
    width: u32,
    height: u32,
    format: PixelFormat,
    fill: Fill,
}

impl PixelBufferBuilder {
    pub fn gray(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Grayscale8,
            fill: Fill::Solid(vec![0]),
        }
    }

    pub fn rgb(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Rgb888,
            fill: Fill::Solid(vec![0, 0, 0]),
        }
    }

    /// Every pixel set to `samples` (one value per channel).
    pub fn solid(mut self, samples: &[u8]) -> Self {
        self.fill = Fill::Solid(samples.to_vec());
        self
    }

    /// Samples rise left to right and top to bottom, channels offset from
    /// each other so they differ.
    pub fn gradient(mut self) -> Self {
        self.fill = Fill::Gradient;
        self
    }

    /// Uniform random samples in `0..=255`, reproducible from `seed`.
    pub fn noise(self, seed: u64) -> Self {
        self.noise_in(seed, 0, 255)
    }

    /// Uniform random samples in `lo..=hi`.
    pub fn noise_in(mut self, seed: u64, lo: u8, hi: u8) -> Self {
        self.fill = Fill::Noise { seed, lo, hi };
        self
    }

    pub fn build(self) -> PixelBuffer {
        let channels = self.format.channels();
        let pixels = self.width as usize * self.height as usize;
        let data: Vec<u8> = match self.fill {
            Fill::Solid(samples) => {
                assert_eq!(samples.len(), channels, "solid fill needs one sample per channel");
                samples.iter().copied().cycle().take(pixels * channels).collect()
            }
            Fill::Gradient => {
                let span = (self.width + self.height).max(2) as usize - 1;
                (0..pixels * channels)
                    .map(|i| {
                        let p = i / channels;
                        let c = i % channels;
                        let x = p % self.width as usize;
                        let y = p / self.width as usize;
                        ((((x + y) * 255) / span + c * 40) % 256) as u8
                    })
                    .collect()
            }
            Fill::Noise { seed, lo, hi } => {
                let mut rng = StdRng::seed_from_u64(seed);
                (0..pixels * channels).map(|_| rng.gen_range(lo..=hi)).collect()
            }
        };
        PixelBuffer::from_raw(self.width, self.height, self.format, data)
            .expect("invalid buffer in test builder")
    }
}

/// A handful of seeded buffers of mixed shape and format for property checks.
pub fn sample_buffers() -> Vec<PixelBuffer> {
    vec![
        PixelBufferBuilder::gray(1, 1).solid(&[100]).build(),
        PixelBufferBuilder::gray(7, 3).noise(1).build(),
        PixelBufferBuilder::gray(16, 16).noise_in(2, 40, 90).build(),
        PixelBufferBuilder::gray(5, 9).gradient().build(),
        PixelBufferBuilder::rgb(4, 6).noise(3).build(),
        PixelBufferBuilder::rgb(13, 2).gradient().build(),
        PixelBufferBuilder::rgb(1, 8).solid(&[255, 0, 128]).build(),
    ]
}
