use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;

use rasterlab_core::convolution::KernelPreset;
use rasterlab_core::editor::Editor;
use rasterlab_core::histogram::{self, histogram_chart};
use rasterlab_core::operation::Operation;
use rasterlab_core::recipe::Recipe;
use rasterlab_io::codec;

use crate::op_arg::parse_op;

#[derive(Parser, Debug)]
#[command(name = "rasterlab")]
#[command(about = "Point, histogram, geometric and convolution transforms for raster images")]
pub struct Cli {
    /// Log every applied operation
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply operations to an image and write the result
    Apply {
        /// Source image
        input: PathBuf,

        /// Destination image; the format follows the extension
        output: PathBuf,

        /// Operation such as `negative`, `brightness=40`, `contrast=1.5`,
        /// `quantize=4`, `convolve=sobel-hx`. Repeatable, applied in order.
        #[arg(short, long = "op", value_parser = parse_op)]
        ops: Vec<Operation>,

        /// JSON recipe whose operations run before any `--op`
        #[arg(short, long)]
        recipe: Option<PathBuf>,

        /// Reference image for histogram matching, applied last
        #[arg(short = 'm', long = "match")]
        reference: Option<PathBuf>,
    },
    /// Print the per-channel histogram of an image as JSON
    Histogram {
        input: PathBuf,

        /// Also emit bar heights scaled to this chart height
        #[arg(long)]
        chart_height: Option<u32>,
    },
    /// List the built-in convolution kernels
    Kernels,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Apply {
            input,
            output,
            ops,
            recipe,
            reference,
        } => apply(&input, &output, &ops, recipe.as_deref(), reference.as_deref()),
        Commands::Histogram {
            input,
            chart_height,
        } => {
            let report = histogram_report(&input, chart_height)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::Kernels => {
            println!("{}", serde_json::to_string_pretty(&kernel_listing())?);
            Ok(())
        }
    }
}

/// Load `input`, run the recipe, the listed operations and optional histogram
/// matching, then write `output`. Nothing is written if any step fails.
pub fn apply(
    input: &Path,
    output: &Path,
    ops: &[Operation],
    recipe: Option<&Path>,
    reference: Option<&Path>,
) -> anyhow::Result<()> {
    let image = codec::decode(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    let mut editor = Editor::with_image(image);

    if let Some(path) = recipe {
        let recipe = Recipe::load(path)
            .with_context(|| format!("failed to read recipe {}", path.display()))?;
        tracing::debug!(
            name = recipe.name.as_deref().unwrap_or("unnamed"),
            steps = recipe.operations.len(),
            "running recipe"
        );
        editor.apply_all(&recipe.operations)?;
    }
    editor.apply_all(ops)?;

    if let Some(path) = reference {
        let reference = codec::decode(path)
            .with_context(|| format!("failed to load reference {}", path.display()))?;
        editor.match_histogram(&reference)?;
    }

    let working = editor
        .working()
        .context("editor has no working image")?;
    codec::encode(working, output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(
        output = %output.display(),
        steps = editor.applied().len(),
        "wrote image"
    );
    Ok(())
}

/// Histogram of `input` as a JSON document.
pub fn histogram_report(
    input: &Path,
    chart_height: Option<u32>,
) -> anyhow::Result<serde_json::Value> {
    let image = codec::decode(input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    let hist = histogram::histogram(&image);

    let names: &[&str] = match hist.channels() {
        1 => &["gray"],
        _ => &["red", "green", "blue"],
    };
    let mut channels = Vec::with_capacity(hist.channels());
    for (c, name) in names.iter().enumerate() {
        let mut entry = json!({
            "channel": name,
            "total": hist.total(c),
            "bins": hist.channel(c),
        });
        if let Some(height) = chart_height {
            let bars = histogram_chart(&hist, c, height)?;
            entry["chart"] = json!(bars);
        }
        channels.push(entry);
    }

    Ok(json!({
        "width": image.width(),
        "height": image.height(),
        "format": image.format(),
        "channels": channels,
    }))
}

/// Preset kernels with their weights.
pub fn kernel_listing() -> serde_json::Value {
    KernelPreset::all()
        .iter()
        .map(|p| {
            json!({
                "name": p.name(),
                "label": p.display_name(),
                "weights": p.weights().to_vec(),
            })
        })
        .collect()
}
