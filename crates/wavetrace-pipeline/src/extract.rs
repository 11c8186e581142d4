//! Per-column pattern extraction via strongest vertical gradient.
//!
//! Scans the luminance image column by column, recording the y-position
//! of the strongest brightness transition in each column. Columns whose
//! strongest gradient does not clearly stand out from the column's mean
//! gradient are treated as holding no reliable edge and fall back to the
//! vertical midpoint, which keeps flat or noisy regions from injecting
//! jitter into the fitted curve.
//!
//! This stage never fails: it always yields one value per column.

use image::GrayImage;

use crate::types::{PatternSignal, PipelineConfig};

/// Extract the wave pattern from a luminance image.
///
/// Returns a [`PatternSignal`] whose length equals the image width. A
/// column's value is the y of its strongest vertical gradient when that
/// gradient exceeds `config.noise_ratio` times the column mean, and
/// `height / 2` otherwise. Images too short to hold a gradient
/// (`height < 2`) yield the fallback for every column.
#[must_use = "returns the extracted pattern signal"]
pub fn extract_pattern(gray: &GrayImage, config: &PipelineConfig) -> PatternSignal {
    let (width, height) = gray.dimensions();
    let fallback = f64::from(height) / 2.0;

    let values = (0..width)
        .map(|x| column_value(gray, x, height, fallback, config.noise_ratio))
        .collect();
    PatternSignal::new(values)
}

/// Detected y for one column, or the midpoint fallback.
fn column_value(gray: &GrayImage, x: u32, height: u32, fallback: f64, noise_ratio: f64) -> f64 {
    if height < 2 {
        return fallback;
    }

    let mut max_gradient = 0.0_f64;
    let mut max_y = 0_u32;
    let mut gradient_sum = 0.0_f64;

    for y in 1..height {
        let above = f64::from(gray.get_pixel(x, y - 1).0[0]);
        let below = f64::from(gray.get_pixel(x, y).0[0]);
        let gradient = (below - above).abs();
        if gradient > max_gradient {
            max_gradient = gradient;
            max_y = y;
        }
        gradient_sum += gradient;
    }

    let mean_gradient = gradient_sum / f64::from(height - 1);
    if max_gradient > noise_ratio * mean_gradient {
        f64::from(max_y)
    } else {
        fallback
    }
}
