//! Piecewise cubic least-squares fitting of the pattern signal.
//!
//! The signal's domain `[0, width-1]` is partitioned into equal-width
//! contiguous segments (the last absorbs any remainder) and a cubic
//! `y = a3·x³ + a2·x² + a1·x + a0` is fitted to each by dense
//! least squares. Constant-valued segments are skipped outright: they
//! would make the system singular and carry no curve information.

use nalgebra::{DMatrix, DVector};

use crate::types::{PatternSignal, PipelineConfig, PipelineError, PolySegment};

/// Minimum sample count for a stable cubic fit (four coefficients).
pub const MIN_POINTS_PER_SEGMENT: u32 = 4;

/// Singular-value cutoff for the least-squares solve.
const SOLVE_EPS: f64 = 1e-12;

/// Fit cubic polynomial segments to a pattern signal.
///
/// The number of segments targets `width / config.segment_divisor`,
/// capped at `config.max_segments`, floored at one, and never more than
/// `width / 4`. Segments are laid out left to right with equal width;
/// the last segment absorbs the remainder so the returned domains cover
/// `[0, width-1]` exactly, in ascending contiguous order. A segment
/// whose target values are all identical is skipped and contributes no
/// output.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidInput`] when the signal is empty or
/// shorter than [`MIN_POINTS_PER_SEGMENT`], or when `width` (clamped to
/// the signal length) is zero or below the minimum. Returns
/// [`PipelineError::Solver`] when the least-squares decomposition fails
/// on a non-constant segment; this aborts the whole call.
#[allow(clippy::float_cmp)] // exact-constant detection is intentional
pub fn fit_segments(
    pattern: &PatternSignal,
    width: u32,
    config: &PipelineConfig,
) -> Result<Vec<PolySegment>, PipelineError> {
    if pattern.is_empty() {
        return Err(PipelineError::InvalidInput("pattern signal is empty".to_string()));
    }
    if width == 0 {
        return Err(PipelineError::InvalidInput("width must be positive".to_string()));
    }
    let len = u32::try_from(pattern.len())
        .map_err(|_| PipelineError::InvalidInput("pattern signal too long".to_string()))?;
    let width = width.min(len);
    if width < MIN_POINTS_PER_SEGMENT {
        return Err(PipelineError::InvalidInput(format!(
            "need at least {MIN_POINTS_PER_SEGMENT} points for a cubic fit, got {width}",
        )));
    }

    // Segmentation policy: target width/divisor segments, bounded both
    // by the hard cap and by how many 4-point segments actually fit.
    let max_segments = width / MIN_POINTS_PER_SEGMENT;
    let divisor = config.segment_divisor.max(1);
    let mut segment_count = (width / divisor)
        .clamp(1, config.max_segments.max(1))
        .min(max_segments);
    let mut segment_width = width / segment_count;
    if segment_width < MIN_POINTS_PER_SEGMENT {
        segment_count = 1;
        segment_width = width;
    }

    let mut segments = Vec::with_capacity(segment_count as usize);

    for i in 0..segment_count {
        let x0 = i * segment_width;
        // Exclusive end; the last segment absorbs the division remainder.
        let x1 = if i + 1 == segment_count {
            width
        } else {
            (i + 1) * segment_width
        };

        let targets = &pattern.values()[x0 as usize..x1 as usize];
        let first = targets[0];
        if targets.iter().all(|&y| y == first) {
            // Degenerate segment: underdetermined fit, skip silently.
            continue;
        }

        let coeffs = solve_cubic(x0, targets)?;
        let expression = format_expression(x0, x1 - 1, &coeffs);
        segments.push(PolySegment {
            x_start: x0,
            x_end: x1 - 1,
            a3: coeffs[0],
            a2: coeffs[1],
            a1: coeffs[2],
            a0: coeffs[3],
            expression,
            svg: None,
        });
    }

    Ok(segments)
}

/// Least-squares cubic through `(x0 + j, targets[j])`.
///
/// Builds the design matrix with rows `[x³, x², x, 1]` and solves via
/// singular value decomposition, which handles the tall 4-column system
/// with stability comparable to a QR factorization.
fn solve_cubic(x0: u32, targets: &[f64]) -> Result<[f64; 4], PipelineError> {
    let rows = targets.len();
    let design = DMatrix::from_fn(rows, 4, |r, c| {
        #[allow(clippy::cast_possible_truncation)]
        let x = f64::from(x0 + r as u32);
        match c {
            0 => x * x * x,
            1 => x * x,
            2 => x,
            _ => 1.0,
        }
    });
    let rhs = DVector::from_column_slice(targets);

    let solution = design
        .svd(true, true)
        .solve(&rhs, SOLVE_EPS)
        .map_err(|e| PipelineError::Solver(e.to_string()))?;

    Ok([solution[0], solution[1], solution[2], solution[3]])
}

/// Fixed-point rendering of the cubic, annotated with its domain.
fn format_expression(x_start: u32, x_end: u32, coeffs: &[f64; 4]) -> String {
    format!(
        "for x ∈ [{x_start},{x_end}]: y = {:.6}·x³ {:+.6}·x² {:+.6}·x {:+.6}",
        coeffs[0], coeffs[1], coeffs[2], coeffs[3],
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    /// y = x² sampled at x = 0..size-1 (a cubic with a3 = 0).
    fn quadratic(size: usize) -> PatternSignal {
        PatternSignal::new((0..size).map(|x| (x * x) as f64).collect())
    }

    fn fit(pattern: &PatternSignal, width: u32) -> Vec<PolySegment> {
        fit_segments(pattern, width, &config()).unwrap()
    }

    #[test]
    fn segment_counts_follow_policy() {
        // (size, expected segments): width/16 capped at 32, floored at 1.
        for (size, expected) in [(128, 8), (64, 4), (256, 16), (33, 2), (12, 1), (4, 1)] {
            let segments = fit(&quadratic(size), size as u32);
            assert_eq!(segments.len(), expected, "size {size}");
        }
    }

    #[test]
    fn huge_width_caps_at_32_segments() {
        let segments = fit(&quadratic(1024), 1024);
        assert_eq!(segments.len(), 32);
    }

    #[test]
    fn segments_are_contiguous_and_cover_domain() {
        let segments = fit(&quadratic(33), 33);
        assert_eq!(segments[0].x_start, 0);
        assert_eq!(segments.last().unwrap().x_end, 32);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].x_end + 1, pair[1].x_start, "gap or overlap");
        }
    }

    #[test]
    fn last_segment_absorbs_remainder() {
        // width 33 → 2 segments of nominal width 16; the second takes 17.
        let segments = fit(&quadratic(33), 33);
        assert_eq!((segments[0].x_start, segments[0].x_end), (0, 15));
        assert_eq!((segments[1].x_start, segments[1].x_end), (16, 32));
    }

    #[test]
    fn no_segment_narrower_than_minimum() {
        for size in [7_u32, 33, 64, 100, 255] {
            let segments = fit(&quadratic(size as usize), size);
            for seg in &segments {
                assert!(
                    seg.span() >= MIN_POINTS_PER_SEGMENT,
                    "size {size}: segment [{},{}] too narrow",
                    seg.x_start,
                    seg.x_end,
                );
            }
        }
    }

    #[test]
    fn quadratic_fit_is_exact_within_tolerance() {
        for size in [16_usize, 64, 128] {
            let pattern = quadratic(size);
            let segments = fit(&pattern, size as u32);
            for seg in &segments {
                for x in seg.x_start..=seg.x_end {
                    let expected = f64::from(x) * f64::from(x);
                    let actual = seg.eval(f64::from(x));
                    assert!(
                        (actual - expected).abs() <= 1.0,
                        "size {size}, x {x}: expected {expected}, got {actual}",
                    );
                }
            }
        }
    }

    #[test]
    fn width_larger_than_signal_is_clamped() {
        let segments = fit(&quadratic(4), 8);
        assert_eq!(segments.len(), 1);
        assert_eq!((segments[0].x_start, segments[0].x_end), (0, 3));
    }

    #[test]
    fn empty_signal_is_invalid() {
        let result = fit_segments(&PatternSignal::new(vec![]), 4, &config());
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn zero_width_is_invalid() {
        let result = fit_segments(&quadratic(4), 0, &config());
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn signal_below_minimum_is_invalid() {
        let result = fit_segments(&PatternSignal::new(vec![0.0, 1.0]), 2, &config());
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn width_below_minimum_after_clamp_is_invalid() {
        let result = fit_segments(&quadratic(8), 2, &config());
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn constant_signal_yields_no_segments() {
        let flat = PatternSignal::new(vec![2.0; 8]);
        let segments = fit(&flat, 8);
        assert!(segments.is_empty(), "constant segments must be skipped");
    }

    #[test]
    fn constant_candidate_segment_is_dropped_among_live_ones() {
        // 32 columns → 2 segments of 16. The first half is constant and
        // must be skipped; the second half carries the curve.
        let mut values: Vec<f64> = vec![5.0; 16];
        values.extend((16..32).map(|x| (x * x) as f64));
        let segments = fit(&PatternSignal::new(values), 32);
        assert_eq!(segments.len(), 1);
        assert_eq!((segments[0].x_start, segments[0].x_end), (16, 31));
    }

    #[test]
    fn expression_is_domain_annotated_fixed_point() {
        let segments = fit(&quadratic(12), 12);
        let expr = &segments[0].expression;
        assert!(expr.starts_with("for x ∈ [0,11]: y = "), "got {expr}");
        // One leading term plus three explicitly signed terms.
        assert_eq!(expr.matches("·x").count(), 3, "got {expr}");
        assert!(expr.contains("·x³") && expr.contains("·x²"), "got {expr}");
    }

    #[test]
    fn custom_divisor_changes_segment_count() {
        let tight = PipelineConfig {
            segment_divisor: 8,
            ..PipelineConfig::default()
        };
        let segments = fit_segments(&quadratic(64), 64, &tight).unwrap();
        assert_eq!(segments.len(), 8);
    }
}
