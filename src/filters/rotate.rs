//! Image rotation and mirroring functions.
//!
//! - 180°: (x, y) -> (W - 1 - x, H - 1 - y)
//! - Horizontal flip: (x, y) -> (W - 1 - x, y)

use crate::grid::PixelGrid;

/// Rotate 180 degrees.
///
/// # Returns
/// Rotated grid - same dimensions
pub fn rotate_180(input: &PixelGrid) -> PixelGrid {
    let (w, h) = input.dimensions();
    let mut result = input.clone();

    for y in 0..h {
        for x in 0..w {
            result.set(x, y, input[(w - 1 - x, h - 1 - y)]);
        }
    }

    result
}

/// Flip horizontally (mirror left-right).
///
/// # Returns
/// Flipped grid - same dimensions
pub fn flip_horizontal(input: &PixelGrid) -> PixelGrid {
    let (w, h) = input.dimensions();
    let mut result = input.clone();

    for y in 0..h {
        for x in 0..w {
            result.set(x, y, input[(w - 1 - x, y)]);
        }
    }

    result
}
