//! Optional Gaussian pre-smoothing of the luminance image.
//!
//! Wraps [`imageproc::filter::gaussian_blur_f32`] to suppress
//! high-frequency noise that would otherwise produce spurious gradient
//! maxima in the pattern extractor. Disabled by default
//! (`smooth_sigma = 0`); the stock extraction contract scans the
//! unsmoothed luminance image.

use image::GrayImage;

/// Apply Gaussian blur to a luminance image.
///
/// Non-positive sigma values return the image unchanged, since
/// `imageproc`'s underlying function panics on `sigma <= 0.0`.
#[must_use = "returns the smoothed image"]
pub fn gaussian_blur(image: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 {
        return image.clone();
    }

    imageproc::filter::gaussian_blur_f32(image, sigma)
}
