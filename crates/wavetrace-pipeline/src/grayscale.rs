//! Image decoding and luminance reduction.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces the
//! single-channel luminance image the pattern extractor scans.
//!
//! First pipeline step: raw bytes in, `GrayImage` out.

use image::GrayImage;

use crate::types::PipelineError;

/// Decode raw image bytes and reduce to luminance.
///
/// Any format the `image` crate can decode is accepted, including
/// already-grayscale sources (a no-op in luminance terms). RGB pixels
/// are reduced with the standard perceptual weighting
/// `0.299*R + 0.587*G + 0.114*B`.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty and
/// [`PipelineError::ImageDecode`] if the data cannot be decoded.
pub fn decode_and_grayscale(bytes: &[u8]) -> Result<GrayImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_luma8())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Encode an RGBA image as an in-memory PNG.
    fn encode_png(img: &image::RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
        encode_png(&img)
    }

    #[test]
    fn empty_input_returns_error() {
        let result = decode_and_grayscale(&[]);
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn corrupt_bytes_return_decode_error() {
        let result = decode_and_grayscale(&[0x00, 0x01, 0xFF]);
        assert!(matches!(result, Err(PipelineError::ImageDecode(_))));
    }

    #[test]
    fn dimensions_preserved() {
        let gray = decode_and_grayscale(&solid_png(13, 29, [40, 80, 120])).unwrap();
        assert_eq!(gray.width(), 13);
        assert_eq!(gray.height(), 29);
    }

    #[test]
    fn white_stays_white() {
        let gray = decode_and_grayscale(&solid_png(2, 2, [255, 255, 255])).unwrap();
        assert!(gray.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn luminance_weighting_orders_channels() {
        // Weighted reduction, not a plain average: green carries the
        // highest weight, blue the lowest.
        let g = decode_and_grayscale(&solid_png(1, 1, [0, 255, 0])).unwrap().get_pixel(0, 0).0[0];
        let r = decode_and_grayscale(&solid_png(1, 1, [255, 0, 0])).unwrap().get_pixel(0, 0).0[0];
        let b = decode_and_grayscale(&solid_png(1, 1, [0, 0, 255])).unwrap().get_pixel(0, 0).0[0];
        assert!(g > r && r > b, "expected G > R > B, got R={r} G={g} B={b}");
    }
}
