//! Parsing of `--op` values such as `brightness=40` or `convolve=sobel-hx`.

use std::path::Path;

use rasterlab_core::convolution::{Kernel, KernelPreset};
use rasterlab_core::operation::{KernelSpec, Operation};

/// Parse one operation specification. Used as a clap value parser.
pub fn parse_op(spec: &str) -> Result<Operation, String> {
    let (name, value) = match spec.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (spec.trim(), None),
    };

    let op = match (name, value) {
        ("grayscale" | "gray", None) => Operation::Grayscale,
        ("negative" | "invert", None) => Operation::Negative,
        ("equalize", None) => Operation::Equalize,
        ("flip-h" | "flip-horizontal", None) => Operation::FlipHorizontal,
        ("flip-v" | "flip-vertical", None) => Operation::FlipVertical,
        ("rotate-left", None) => Operation::RotateLeft,
        ("rotate-right", None) => Operation::RotateRight,
        ("brightness", Some(v)) => Operation::Brightness {
            delta: v
                .parse()
                .map_err(|_| format!("brightness expects an integer, got `{v}`"))?,
        },
        ("contrast", Some(v)) => Operation::Contrast {
            factor: v
                .parse()
                .map_err(|_| format!("contrast expects a number, got `{v}`"))?,
        },
        ("quantize", Some(v)) => Operation::Quantize {
            levels: v
                .parse()
                .map_err(|_| format!("quantize expects a positive integer, got `{v}`"))?,
        },
        ("convolve", Some(v)) => Operation::Convolve {
            kernel: parse_kernel(v)?,
        },
        ("brightness" | "contrast" | "quantize" | "convolve", None) => {
            return Err(format!("`{name}` needs a value, e.g. `{name}=...`"));
        }
        _ => return Err(format!("unknown operation `{spec}`")),
    };
    Ok(op)
}

/// A preset name, a JSON kernel file, or inline rows like `0,-1,0;-1,5,-1;0,-1,0`.
fn parse_kernel(value: &str) -> Result<KernelSpec, String> {
    if let Some(preset) = KernelPreset::from_name(value) {
        return Ok(KernelSpec::Preset(preset));
    }
    if value.contains(';') || value.contains(',') {
        let rows = value
            .split(';')
            .map(|row| {
                row.split(',')
                    .map(|w| {
                        w.trim()
                            .parse::<f64>()
                            .map_err(|_| format!("invalid kernel weight `{}`", w.trim()))
                    })
                    .collect::<Result<Vec<f64>, String>>()
            })
            .collect::<Result<Vec<_>, String>>()?;
        return Kernel::from_rows(&rows)
            .map(KernelSpec::Custom)
            .map_err(|e| e.to_string());
    }
    let path = Path::new(value);
    if path.exists() {
        let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        let kernel: Kernel = serde_json::from_str(&json).map_err(|e| e.to_string())?;
        return Ok(KernelSpec::Custom(kernel));
    }
    let known: Vec<&str> = KernelPreset::all().iter().map(|p| p.name()).collect();
    Err(format!(
        "unknown kernel `{value}` (presets: {})",
        known.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_ops() {
        assert_eq!(parse_op("negative"), Ok(Operation::Negative));
        assert_eq!(parse_op("flip-h"), Ok(Operation::FlipHorizontal));
        assert_eq!(parse_op("rotate-right"), Ok(Operation::RotateRight));
    }

    #[test]
    fn test_parse_valued_ops() {
        assert_eq!(
            parse_op("brightness=-40"),
            Ok(Operation::Brightness { delta: -40 })
        );
        assert_eq!(
            parse_op("contrast=1.5"),
            Ok(Operation::Contrast { factor: 1.5 })
        );
        assert_eq!(parse_op("quantize=4"), Ok(Operation::Quantize { levels: 4 }));
    }

    #[test]
    fn test_parse_kernel_preset() {
        assert_eq!(
            parse_op("convolve=prewitt-hy"),
            Ok(Operation::Convolve {
                kernel: KernelSpec::Preset(KernelPreset::PrewittHy)
            })
        );
    }

    #[test]
    fn test_parse_inline_kernel() {
        let op = parse_op("convolve=0,0,0;0,2,0;0,0,0").unwrap();
        match op {
            Operation::Convolve {
                kernel: KernelSpec::Custom(k),
            } => {
                assert_eq!(k.size(), 3);
                assert_eq!(k.weight(1, 1), 2.0);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(parse_op("convolve=1,2;3,4").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_op("brightness").is_err());
        assert!(parse_op("brightness=abc").is_err());
        assert!(parse_op("quantize=-2").is_err());
        assert!(parse_op("sharpen").is_err());
        assert!(parse_op("negative=3").is_err());
        assert!(parse_op("convolve=emboss").is_err());
    }
}
