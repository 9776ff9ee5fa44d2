//! 3x3 convolution shared by the blur and sharpen filters.
//!
//! Kernels are column-major: `kernel[k][l]` weights the neighbor at
//! `(x + k - 1, y + l - 1)`. All four channels (alpha included) are
//! convolved independently and rounded to the nearest integer.

use serde::{Deserialize, Serialize};

use crate::grid::PixelGrid;
use crate::pixel::Pixel;

/// 3x3 weight matrix indexed `[k][l]` (x offset, then y offset).
pub type Kernel3x3 = [[f64; 3]; 3];

/// How [`filter_3x3`] treats the one-pixel border.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Only interior pixels are convolved; the border stays fully
    /// transparent.
    #[default]
    Transparent,
    /// Every pixel is convolved, sampling out-of-range neighbors from the
    /// nearest edge pixel.
    Clamp,
}

/// Convolve one output pixel. Neighbor coordinates are clamped to the grid,
/// which is a no-op for interior pixels.
fn convolve_pixel(input: &PixelGrid, kernel: &Kernel3x3, x: usize, y: usize) -> Pixel {
    let (width, height) = input.dimensions();
    let (mut red, mut green, mut blue, mut alpha) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);

    for l in 0..3 {
        let sy = (y as isize + l as isize - 1).clamp(0, height as isize - 1) as usize;
        for k in 0..3 {
            let sx = (x as isize + k as isize - 1).clamp(0, width as isize - 1) as usize;
            let weight = kernel[k][l];
            let p = &input[(sx, sy)];

            red += weight * p.red as f64;
            green += weight * p.green as f64;
            blue += weight * p.blue as f64;
            alpha += weight * p.alpha as f64;
        }
    }

    Pixel::new(
        red.round() as i32,
        green.round() as i32,
        blue.round() as i32,
        alpha.round() as i32,
    )
}

/// Apply a 3x3 convolution.
///
/// With [`EdgePolicy::Transparent`] only `x in [1, width-2]`,
/// `y in [1, height-2]` is computed and every border pixel is (0, 0, 0, 0);
/// grids narrower or shorter than 3 come back fully transparent.
///
/// # Arguments
/// * `input` - Source grid
/// * `kernel` - Column-major weights
/// * `edges` - Border handling
///
/// # Returns
/// New grid with the same dimensions
pub fn filter_3x3(input: &PixelGrid, kernel: &Kernel3x3, edges: EdgePolicy) -> PixelGrid {
    let (width, height) = input.dimensions();

    match edges {
        EdgePolicy::Transparent => {
            let mut result = input.map(|_| Pixel::TRANSPARENT);
            for y in 1..height.saturating_sub(1) {
                for x in 1..width.saturating_sub(1) {
                    result.set(x, y, convolve_pixel(input, kernel, x, y));
                }
            }
            result
        }
        EdgePolicy::Clamp => {
            let mut result = input.clone();
            for y in 0..height {
                for x in 0..width {
                    result.set(x, y, convolve_pixel(input, kernel, x, y));
                }
            }
            result
        }
    }
}
