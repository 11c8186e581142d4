//! wavetrace-export: Pure SVG serializers (sans-IO)
//!
//! Converts fitted curve segments into SVG markup and bundles the
//! terminal [`CurveDescription`] artifact. Future formats: PNG raster,
//! G-code.

pub mod svg;

pub use svg::{CurveDescription, MINI_HEIGHT, curve_svg, describe_curve, segment_svg};
