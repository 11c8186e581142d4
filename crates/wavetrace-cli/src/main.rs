//! wavetrace: CLI for extracting wave silhouettes from raster images.
//!
//! Runs the extraction pipeline on a given image file with configurable
//! parameters and prints the resulting curve description as JSON.
//! Useful for:
//!
//! - Inspecting the fitted segment expressions for an image
//! - Tuning the smoothing sigma and noise-rejection ratio
//! - Producing the full-curve SVG for embedding elsewhere
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin wavetrace -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use wavetrace_pipeline::PipelineConfig;

/// Wave-silhouette extraction for raster images.
///
/// Decodes the image, extracts the per-column silhouette, fits piecewise
/// cubic segments, and prints the serialized curve description (segments
/// with their expressions and mini SVGs, plus the full-curve SVG) to
/// stdout. Diagnostics go to stderr.
#[derive(Parser)]
#[command(name = "wavetrace", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Gaussian pre-smoothing sigma (0 disables smoothing).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_SMOOTH_SIGMA)]
    smooth_sigma: f32,

    /// Noise-rejection multiplier: a column's strongest gradient must
    /// exceed this times the column mean to count as a detected edge.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_NOISE_RATIO)]
    noise_ratio: f64,

    /// Target segment count divisor (segments ≈ width / divisor).
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_SEGMENT_DIVISOR, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    segment_divisor: u32,

    /// Hard cap on the number of fitted segments.
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_MAX_SEGMENTS, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    max_segments: u32,

    /// Write the full-curve SVG to a file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, all other pipeline parameter flags are ignored.
    /// The JSON must be a valid `PipelineConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Build a [`PipelineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored. Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<PipelineConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(PipelineConfig {
        smooth_sigma: cli.smooth_sigma,
        noise_ratio: cli.noise_ratio,
        segment_divisor: cli.segment_divisor,
        max_segments: cli.max_segments,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&cli.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Image: {} ({} bytes)",
        cli.image_path.display(),
        image_bytes.len(),
    );

    let result = match wavetrace_pipeline::process(&image_bytes, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Pipeline error: {e}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!(
        "Extracted {} segments from {}x{} image",
        result.segments.len(),
        result.dimensions.width,
        result.dimensions.height,
    );

    let description = wavetrace_export::describe_curve(result);

    if let Some(ref svg_path) = cli.svg {
        match std::fs::write(svg_path, &description.svg) {
            Ok(()) => {
                eprintln!(
                    "SVG written to {} ({} bytes)",
                    svg_path.display(),
                    description.svg.len(),
                );
            }
            Err(e) => {
                eprintln!("Error writing SVG to {}: {e}", svg_path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&description)
    } else {
        serde_json::to_string(&description)
    };
    match json {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing curve description: {e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
