//! Threshold filter.

use crate::grid::PixelGrid;
use crate::pixel::Pixel;

use super::grayscale::luma;

/// Threshold used when the caller does not supply one.
pub const DEFAULT_THRESHOLD: f64 = 128.0;

/// Apply binary threshold on the grayscale value.
///
/// # Arguments
/// * `input` - Source grid
/// * `threshold` - Cut-off (0-255)
///
/// # Returns
/// Grid where R = G = B = 255 if luminosity >= threshold, 0 otherwise; alpha
/// preserved
pub fn threshold(input: &PixelGrid, threshold: f64) -> PixelGrid {
    input.map(|p| {
        let value = if luma(p) as f64 >= threshold { 255 } else { 0 };
        Pixel::new(value, value, value, p.alpha)
    })
}
