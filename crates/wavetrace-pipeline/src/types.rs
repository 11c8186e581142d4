//! Shared types for the wavetrace extraction pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference the
/// luminance raster without depending on `image` directly.
pub use image::GrayImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The 1-D wave signal extracted from a luminance image.
///
/// One value per image column: index = x-coordinate, value = the
/// detected y-coordinate of the silhouette (or the midpoint fallback
/// when the column holds no reliable edge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSignal(Vec<f64>);

impl PatternSignal {
    /// Create a signal from per-column y-values.
    #[must_use]
    pub const fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Returns `true` if the signal has no columns.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of columns in the signal.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// All per-column values, ordered by x.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Consumes the signal and returns the underlying values.
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.0
    }
}

/// One piece of the piecewise cubic curve: a contiguous x-range with
/// its fitted polynomial `y = a3·x³ + a2·x² + a1·x + a0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolySegment {
    /// First x-coordinate of the domain (inclusive).
    pub x_start: u32,
    /// Last x-coordinate of the domain (inclusive).
    pub x_end: u32,
    /// Cubic coefficient.
    pub a3: f64,
    /// Quadratic coefficient.
    pub a2: f64,
    /// Linear coefficient.
    pub a1: f64,
    /// Constant coefficient.
    pub a0: f64,
    /// Human-readable formula annotated with the domain interval.
    pub expression: String,
    /// Standalone mini rendering of this segment, when generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
}

impl PolySegment {
    /// Evaluate the cubic at `x`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        self.a3
            .mul_add(x, self.a2)
            .mul_add(x, self.a1)
            .mul_add(x, self.a0)
    }

    /// Number of columns in the domain (inclusive span).
    #[must_use]
    pub const fn span(&self) -> u32 {
        self.x_end - self.x_start + 1
    }

    /// Whether `x` lies inside the segment's domain.
    #[must_use]
    pub const fn contains(&self, x: u32) -> bool {
        x >= self.x_start && x <= self.x_end
    }

    /// Min/max of the cubic evaluated at every integer x in the domain.
    #[must_use]
    pub fn y_range(&self) -> (f64, f64) {
        let mut min = self.eval(f64::from(self.x_start));
        let mut max = min;
        for x in self.x_start..=self.x_end {
            let y = self.eval(f64::from(x));
            if y < min {
                min = y;
            }
            if y > max {
                max = y;
            }
        }
        (min, max)
    }
}

/// Configuration for the extraction pipeline.
///
/// The defaults are the fixed policy knobs of the extraction contract;
/// changing them changes which curves are produced, so downstream
/// consumers expecting the stock behavior should stick to
/// [`PipelineConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Gaussian pre-smoothing sigma applied to the luminance image
    /// before extraction. Non-positive values disable smoothing.
    pub smooth_sigma: f32,

    /// A column's strongest gradient must exceed `noise_ratio` times the
    /// column's mean gradient to count as a detected edge; otherwise the
    /// column falls back to the vertical midpoint.
    pub noise_ratio: f64,

    /// Target segment count is `width / segment_divisor`.
    pub segment_divisor: u32,

    /// Hard cap on the number of fitted segments.
    pub max_segments: u32,
}

impl PipelineConfig {
    /// Default pre-smoothing sigma (disabled).
    pub const DEFAULT_SMOOTH_SIGMA: f32 = 0.0;
    /// Default noise-rejection multiplier.
    pub const DEFAULT_NOISE_RATIO: f64 = 1.5;
    /// Default target-segment divisor.
    pub const DEFAULT_SEGMENT_DIVISOR: u32 = 16;
    /// Default segment-count cap.
    pub const DEFAULT_MAX_SEGMENTS: u32 = 32;
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            smooth_sigma: Self::DEFAULT_SMOOTH_SIGMA,
            noise_ratio: Self::DEFAULT_NOISE_RATIO,
            segment_divisor: Self::DEFAULT_SEGMENT_DIVISOR,
            max_segments: Self::DEFAULT_MAX_SEGMENTS,
        }
    }
}

/// Result of running the extraction pipeline.
///
/// Contains the fitted segments plus the raw pattern signal and the
/// source dimensions needed by downstream consumers (e.g. the SVG
/// serializers, which size documents from `dimensions`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    /// The per-column signal the segments were fitted to.
    pub pattern: PatternSignal,

    /// Fitted cubic segments in ascending domain order.
    pub segments: Vec<PolySegment>,

    /// Dimensions of the source image in pixels.
    pub dimensions: Dimensions,
}

/// Errors that can occur during pipeline processing.
///
/// Uses custom `Serialize`/`Deserialize` because `image::ImageError`
/// does not implement serde traits. The `ImageDecode` variant is
/// serialized as its `Display` string.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Malformed arguments to the segment fitter.
    #[error("invalid fit input: {0}")]
    InvalidInput(String),

    /// The least-squares solve failed on a non-degenerate segment.
    /// Fatal for the whole fitting call, not just the one segment.
    #[error("least-squares solver failed: {0}")]
    Solver(String),
}

/// Serde-compatible proxy for `PipelineError`.
///
/// `image::ImageError` does not implement serde, so the `ImageDecode`
/// variant stores its `Display` string instead. A deserialized
/// `ImageDecode` becomes an `InvalidInput` carrying the original
/// message (the typed error cannot be reconstructed).
#[derive(Serialize, Deserialize)]
enum PipelineErrorProxy {
    ImageDecode(String),
    EmptyInput,
    InvalidInput(String),
    Solver(String),
}

impl Serialize for PipelineError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = match self {
            Self::ImageDecode(e) => PipelineErrorProxy::ImageDecode(e.to_string()),
            Self::EmptyInput => PipelineErrorProxy::EmptyInput,
            Self::InvalidInput(s) => PipelineErrorProxy::InvalidInput(s.clone()),
            Self::Solver(s) => PipelineErrorProxy::Solver(s.clone()),
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PipelineError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = PipelineErrorProxy::deserialize(deserializer)?;
        Ok(match proxy {
            PipelineErrorProxy::ImageDecode(msg) => {
                Self::InvalidInput(format!("image decode error: {msg}"))
            }
            PipelineErrorProxy::EmptyInput => Self::EmptyInput,
            PipelineErrorProxy::InvalidInput(s) => Self::InvalidInput(s),
            PipelineErrorProxy::Solver(s) => Self::Solver(s),
        })
    }
}
