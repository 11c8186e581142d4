//! wavetrace-pipeline: Pure wave-silhouette extraction pipeline (sans-IO).
//!
//! Converts raster images into piecewise cubic curve descriptions
//! through: grayscale -> optional blur -> per-column gradient
//! extraction -> segmented least-squares fitting.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns structured data. Rendering and serialization
//! live in `wavetrace-export`.

pub mod blur;
pub mod extract;
pub mod fit;
pub mod grayscale;
pub mod types;

pub use fit::MIN_POINTS_PER_SEGMENT;
pub use types::{
    Dimensions, PatternSignal, PipelineConfig, PipelineError, PolySegment, ProcessResult,
};

/// Run the full extraction pipeline.
///
/// Takes raw image bytes (PNG, JPEG, BMP, WebP) and a configuration,
/// then produces a [`ProcessResult`] containing the extracted pattern
/// signal, the fitted cubic segments, and the source image dimensions.
/// The dimensions are needed by export serializers to set coordinate
/// spaces (e.g., SVG `viewBox`).
///
/// # Pipeline steps
///
/// 1. Decode image and convert to grayscale
/// 2. Optional Gaussian blur (noise reduction)
/// 3. Per-column strongest-gradient pattern extraction
/// 4. Piecewise cubic least-squares fitting
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized. Returns [`PipelineError::InvalidInput`] if the image
/// is too narrow for a cubic fit, and [`PipelineError::Solver`] if the
/// least-squares solve fails.
pub fn process(
    image_bytes: &[u8],
    config: &PipelineConfig,
) -> Result<ProcessResult, PipelineError> {
    // 1. Decode and convert to grayscale.
    let gray = grayscale::decode_and_grayscale(image_bytes)?;
    let dimensions = Dimensions {
        width: gray.width(),
        height: gray.height(),
    };

    // 2. Optional Gaussian blur.
    let smoothed = blur::gaussian_blur(&gray, config.smooth_sigma);

    // 3. Per-column pattern extraction.
    let pattern = extract::extract_pattern(&smoothed, config);

    // 4. Piecewise cubic fitting.
    let segments = fit::fit_segments(&pattern, dimensions.width, config)?;

    Ok(ProcessResult {
        pattern,
        segments,
        dimensions,
    })
}
