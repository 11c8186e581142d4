//! SVG serializers for fitted curves.
//!
//! Two renderings are produced:
//!
//! - [`curve_svg`]: the full curve as a single `<polyline>` in the
//!   source image's pixel coordinate space, built with the [`svg`]
//!   crate.
//! - [`segment_svg`]: a standalone mini view of one segment, rescaled
//!   into a fixed-height band with both axes mirrored. Downstream
//!   viewers embed these inline, so the markup (manual string
//!   formatting) is a compatibility contract.
//!
//! [`describe_curve`] bundles both into the terminal
//! [`CurveDescription`] artifact.
//!
//! These are pure functions with no I/O -- they return `String`s.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use svg::Document;
use svg::node::element::Polyline;

use wavetrace_pipeline::{Dimensions, PolySegment, ProcessResult};

/// Height in pixels of the per-segment mini SVG.
pub const MINI_HEIGHT: u32 = 40;

/// Terminal artifact of the extraction pipeline: the fitted segments
/// (each carrying its mini SVG), the full-curve SVG, and the source
/// dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveDescription {
    /// Fitted cubic segments in ascending domain order, each with its
    /// standalone mini rendering attached.
    pub segments: Vec<PolySegment>,

    /// Full-curve SVG document in pixel coordinates.
    pub svg: String,

    /// Dimensions of the source image in pixels.
    pub dimensions: Dimensions,
}

/// Serialize the fitted curve into a full-size SVG document string.
///
/// Emits a single open `<polyline>` sampled at every integer x in
/// `[0, width)`. Each x is evaluated against the first segment whose
/// domain contains it; x-values no segment covers render as `y = 0`.
/// Coordinates are raw pixels, y formatted to two decimals.
#[must_use]
pub fn curve_svg(dimensions: Dimensions, segments: &[PolySegment]) -> String {
    let (w, h) = (dimensions.width, dimensions.height);

    let points = (0..w)
        .map(|x| {
            let y = segments
                .iter()
                .find(|seg| seg.contains(x))
                .map_or(0.0, |seg| seg.eval(f64::from(x)));
            format!("{x},{y:.2}")
        })
        .collect::<Vec<_>>()
        .join(" ");

    let polyline = Polyline::new()
        .set("fill", "none")
        .set("stroke", "lime")
        .set("stroke-width", 1)
        .set("points", points);

    let doc = Document::new()
        .set("width", w)
        .set("height", h)
        .set("viewBox", (0, 0, w, h))
        .add(polyline);

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

/// Serialize one segment into a standalone mini SVG string.
///
/// The document is `span × height` with the segment's y-values rescaled
/// into the band `[0, height-4]`: the vertical extremes of the cubic
/// over the domain map to the band edges, and a flat segment (zero
/// range) normalizes against a range of 1, landing on the band's top
/// edge. Both axes are mirrored relative to the plain plot -- x runs
/// right to left and y is flipped twice during scaling. Embedders rely
/// on this exact orientation.
///
/// Segments spanning fewer than 2 columns cannot form a visible line
/// and yield an empty string.
#[must_use]
#[allow(clippy::float_cmp)] // a flat segment has exactly min == max
pub fn segment_svg(segment: &PolySegment, height: u32) -> String {
    let span = segment.span();
    if span < 2 {
        return String::new();
    }

    let (min_y, max_y) = segment.y_range();
    let mut y_range = max_y - min_y;
    if y_range == 0.0 {
        y_range = 1.0;
    }

    let band_top = f64::from(height) - 2.0;
    let band_span = f64::from(height) - 4.0;

    let mut points = String::new();
    for i in 0..span {
        let x = segment.x_start + i;
        let y = segment.eval(f64::from(x));
        // Mirror x, then scale y into the band and mirror it back.
        let px = span - 1 - i;
        let py = band_top - ((y - min_y) / y_range) * band_span;
        let py = band_top - py;
        if !points.is_empty() {
            points.push(' ');
        }
        let _ = write!(points, "{px},{py:.1}");
    }

    format!(
        r##"<svg width="{span}" height="{height}" viewBox="0 0 {span} {height}" style="background:#f8fafd;border-radius:4px;border:1px solid #e1e4e8;"><polyline fill="none" stroke="#3498db" stroke-width="2" points="{points}"/></svg>"##,
    )
}

/// Bundle a pipeline result into the terminal [`CurveDescription`].
///
/// Attaches a [`MINI_HEIGHT`]-tall mini SVG to every segment wide
/// enough to render one (`None` otherwise) and generates the full-curve
/// document.
#[must_use]
pub fn describe_curve(result: ProcessResult) -> CurveDescription {
    let svg = curve_svg(result.dimensions, &result.segments);

    let mut segments = result.segments;
    for seg in &mut segments {
        let mini = segment_svg(seg, MINI_HEIGHT);
        seg.svg = if mini.is_empty() { None } else { Some(mini) };
    }

    CurveDescription {
        segments,
        svg,
        dimensions: result.dimensions,
    }
}
