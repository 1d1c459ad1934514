use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::convolution::{self, Kernel, KernelPreset};
use crate::error::Result;
use crate::{geometry, histogram, point};

/// A kernel given either by preset name or as explicit weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KernelSpec {
    Preset(KernelPreset),
    Custom(Kernel),
}

impl KernelSpec {
    pub fn kernel(&self) -> Kernel {
        match self {
            Self::Preset(preset) => preset.kernel(),
            Self::Custom(kernel) => kernel.clone(),
        }
    }
}

impl From<KernelPreset> for KernelSpec {
    fn from(preset: KernelPreset) -> Self {
        Self::Preset(preset)
    }
}

impl From<Kernel> for KernelSpec {
    fn from(kernel: Kernel) -> Self {
        Self::Custom(kernel)
    }
}

/// A single-buffer transform together with its parameters.
///
/// Histogram matching is not listed here because it needs a second image;
/// see [`crate::editor::Editor::match_histogram`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Grayscale,
    Brightness { delta: i32 },
    Contrast { factor: f64 },
    Negative,
    Equalize,
    Quantize { levels: u32 },
    FlipHorizontal,
    FlipVertical,
    RotateLeft,
    RotateRight,
    Convolve { kernel: KernelSpec },
}

impl Operation {
    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Grayscale => "Grayscale",
            Self::Brightness { .. } => "Brightness",
            Self::Contrast { .. } => "Contrast",
            Self::Negative => "Negative",
            Self::Equalize => "Equalize",
            Self::Quantize { .. } => "Quantize",
            Self::FlipHorizontal => "Flip Horizontal",
            Self::FlipVertical => "Flip Vertical",
            Self::RotateLeft => "Rotate Left",
            Self::RotateRight => "Rotate Right",
            Self::Convolve { .. } => "Convolve",
        }
    }

    /// Flips and rotations. These are no-ops when there is no image.
    pub fn is_geometric(&self) -> bool {
        matches!(
            self,
            Self::FlipHorizontal | Self::FlipVertical | Self::RotateLeft | Self::RotateRight
        )
    }

    /// Run the transform, returning a new buffer. Parameters are validated
    /// before any pixel is touched.
    pub fn apply(&self, input: &PixelBuffer) -> Result<PixelBuffer> {
        let output = match self {
            Self::Grayscale => point::grayscale(input),
            Self::Brightness { delta } => point::brightness(input, *delta)?,
            Self::Contrast { factor } => point::contrast(input, *factor)?,
            Self::Negative => point::negative(input),
            Self::Equalize => histogram::equalize(input),
            Self::Quantize { levels } => histogram::quantize(input, *levels)?,
            Self::FlipHorizontal => geometry::flip_horizontal(input),
            Self::FlipVertical => geometry::flip_vertical(input),
            Self::RotateLeft => geometry::rotate_left(input),
            Self::RotateRight => geometry::rotate_right(input),
            Self::Convolve { kernel } => convolution::convolve(input, &kernel.kernel()),
        };
        tracing::debug!(
            op = self.display_name(),
            width = output.width(),
            height = output.height(),
            format = output.format().display_name(),
            "applied operation"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelFormat;
    use crate::error::CoreError;

    fn gray(data: Vec<u8>) -> PixelBuffer {
        PixelBuffer::from_raw(data.len() as u32, 1, PixelFormat::Grayscale8, data).unwrap()
    }

    #[test]
    fn test_apply_brightness() {
        let result = Operation::Brightness { delta: 10 }
            .apply(&gray(vec![0, 250]))
            .unwrap();
        assert_eq!(result.data(), &[10, 255]);
    }

    #[test]
    fn test_apply_invalid_parameter() {
        let err = Operation::Contrast { factor: 11.0 }
            .apply(&gray(vec![1]))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter { name: "contrast", .. }));
    }

    #[test]
    fn test_apply_convolve_preset() {
        let op = Operation::Convolve {
            kernel: KernelPreset::Gaussian.into(),
        };
        assert_eq!(op.apply(&gray(vec![80; 3])).unwrap().data(), &[80, 80, 80]);
    }

    #[test]
    fn test_is_geometric() {
        assert!(Operation::RotateLeft.is_geometric());
        assert!(Operation::FlipVertical.is_geometric());
        assert!(!Operation::Negative.is_geometric());
        assert!(!Operation::Quantize { levels: 2 }.is_geometric());
    }

    #[test]
    fn test_serde_tagged_form() {
        let op: Operation = serde_json::from_str(r#"{"op":"brightness","delta":-20}"#).unwrap();
        assert_eq!(op, Operation::Brightness { delta: -20 });

        let op: Operation = serde_json::from_str(r#"{"op":"flip_horizontal"}"#).unwrap();
        assert_eq!(op, Operation::FlipHorizontal);
    }

    #[test]
    fn test_serde_kernel_preset_or_custom() {
        let op: Operation =
            serde_json::from_str(r#"{"op":"convolve","kernel":"sobel-hy"}"#).unwrap();
        assert_eq!(
            op,
            Operation::Convolve {
                kernel: KernelSpec::Preset(KernelPreset::SobelHy)
            }
        );

        let op: Operation =
            serde_json::from_str(r#"{"op":"convolve","kernel":{"size":1,"weights":[0.5]}}"#)
                .unwrap();
        match op {
            Operation::Convolve {
                kernel: KernelSpec::Custom(k),
            } => assert_eq!(k.weights(), &[0.5]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_serde_rejects_bad_kernel() {
        let res = serde_json::from_str::<Operation>(
            r#"{"op":"convolve","kernel":{"size":2,"weights":[1,1,1,1]}}"#,
        );
        assert!(res.is_err());
    }
}
