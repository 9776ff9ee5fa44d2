//! Blur filters built on the 3x3 convolution.

use crate::grid::PixelGrid;

use super::core::{filter_3x3, EdgePolicy, Kernel3x3};

/// Uniform 1/9 weights.
pub const BOX_KERNEL: Kernel3x3 = [
    [1.0 / 9.0, 1.0 / 9.0, 1.0 / 9.0],
    [1.0 / 9.0, 1.0 / 9.0, 1.0 / 9.0],
    [1.0 / 9.0, 1.0 / 9.0, 1.0 / 9.0],
];

/// Binomial approximation of a Gaussian, normalized by 16.
pub const GAUSSIAN_KERNEL: Kernel3x3 = [
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
];

/// Apply a 3x3 box blur.
pub fn box_blur(input: &PixelGrid, edges: EdgePolicy) -> PixelGrid {
    filter_3x3(input, &BOX_KERNEL, edges)
}

/// Apply a 3x3 Gaussian blur.
pub fn gaussian_blur(input: &PixelGrid, edges: EdgePolicy) -> PixelGrid {
    filter_3x3(input, &GAUSSIAN_KERNEL, edges)
}
