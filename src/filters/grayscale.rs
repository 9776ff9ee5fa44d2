//! Grayscale conversion filter.
//!
//! Uses the classic luminosity weights 0.21 / 0.71 / 0.08, which sum to
//! exactly 1.0 so that a pixel with R = G = B maps onto itself.

use crate::grid::PixelGrid;
use crate::pixel::Pixel;

/// Luminosity coefficients
pub const LUMA_R: f64 = 0.21;
pub const LUMA_G: f64 = 0.71;
pub const LUMA_B: f64 = 0.08;

/// Rounded luminosity of a single pixel.
#[inline]
pub fn luma(pixel: &Pixel) -> i32 {
    (LUMA_R * pixel.red as f64 + LUMA_G * pixel.green as f64 + LUMA_B * pixel.blue as f64)
        .round() as i32
}

/// Convert to grayscale (luminosity method).
///
/// Output has R = G = B = luminosity, alpha preserved.
pub fn grayscale(input: &PixelGrid) -> PixelGrid {
    input.map(|p| {
        let gray = luma(p);
        Pixel::new(gray, gray, gray, p.alpha)
    })
}
