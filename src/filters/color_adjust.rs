//! Color adjustment filters: Invert, Add, Brightness, Darkness.
//!
//! These are pixel-wise operations that don't require spatial context.
//! Alpha is always preserved unchanged. No clamping happens here; values
//! outside 0-255 survive until the grid is written to a byte buffer.

use crate::grid::PixelGrid;
use crate::pixel::Pixel;

// ============================================================================
// Invert
// ============================================================================

/// Invert colors: each RGB channel becomes `255 - channel`, saturating at the
/// `i32` range.
pub fn invert(input: &PixelGrid) -> PixelGrid {
    let flip = |channel: i32| 255i32.saturating_sub(channel);
    input.map(|p| Pixel::new(flip(p.red), flip(p.green), flip(p.blue), p.alpha))
}

// ============================================================================
// Add / Brightness / Darkness
// ============================================================================

/// Add `value` to the R, G and B channels, rounding to the nearest integer.
///
/// # Arguments
/// * `input` - Source grid
/// * `value` - Offset, may be negative or fractional
pub fn add(input: &PixelGrid, value: f64) -> PixelGrid {
    let shift = |channel: i32| (channel as f64 + value).round() as i32;
    input.map(|p| Pixel::new(shift(p.red), shift(p.green), shift(p.blue), p.alpha))
}

/// Brighten by `value` (same as [`add`]).
pub fn brightness(input: &PixelGrid, value: f64) -> PixelGrid {
    add(input, value)
}

/// Darken by `value` (same as `add(input, -value)`).
pub fn darkness(input: &PixelGrid, value: f64) -> PixelGrid {
    add(input, -value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelGrid {
        PixelGrid::from_fn(4, 3, |x, y| {
            Pixel::new((x * 60) as i32, (y * 100) as i32, 17, (x * 50 + 5) as i32)
        })
        .unwrap()
    }

    #[test]
    fn test_invert_values() {
        let img = PixelGrid::new(1, 1, Pixel::new(0, 100, 255, 77)).unwrap();
        let result = invert(&img);
        assert_eq!(result[(0, 0)], Pixel::new(255, 155, 0, 77));
    }

    #[test]
    fn test_invert_extreme_channels() {
        let img = PixelGrid::new(1, 1, Pixel::new(i32::MIN, i32::MAX, -1, 255)).unwrap();
        let result = invert(&img);

        assert_eq!(result[(0, 0)], Pixel::new(i32::MAX, 255 - i32::MAX, 256, 255));
        assert_eq!(crate::convert::grid_to_buffer(&result), vec![255, 0, 255, 255]);
    }

    #[test]
    fn test_invert_twice_identity() {
        let img = sample();
        assert_eq!(invert(&invert(&img)), img);
    }

    #[test]
    fn test_add_does_not_clamp() {
        let img = PixelGrid::new(1, 1, Pixel::new(250, 10, 128, 255)).unwrap();

        let brighter = brightness(&img, 20.0);
        assert_eq!(brighter[(0, 0)], Pixel::new(270, 30, 148, 255));

        let darker = darkness(&img, 20.0);
        assert_eq!(darker[(0, 0)], Pixel::new(230, -10, 108, 255));
    }

    #[test]
    fn test_add_rounds_fractional_values() {
        let img = PixelGrid::new(1, 1, Pixel::new(10, 10, 10, 200)).unwrap();
        let result = add(&img, 2.5);
        assert_eq!(result[(0, 0)], Pixel::new(13, 13, 13, 200));
    }

    #[test]
    fn test_adjustments_preserve_dimensions_and_alpha() {
        let img = sample();
        for result in [invert(&img), brightness(&img, 40.0), darkness(&img, 40.0)] {
            assert_eq!(result.dimensions(), img.dimensions());
            for (x, y, p) in result.iter() {
                assert_eq!(p.alpha, img[(x, y)].alpha);
            }
        }
    }
}
