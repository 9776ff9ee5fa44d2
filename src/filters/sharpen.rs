//! Sharpen filter.

use crate::grid::PixelGrid;

use super::core::{filter_3x3, EdgePolicy, Kernel3x3};

/// Sharpening kernel:
/// ```text
///  0 -1  0
/// -1  5 -1
///  0 -1  0
/// ```
pub const SHARPEN_KERNEL: Kernel3x3 = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];

pub fn sharpen(input: &PixelGrid, edges: EdgePolicy) -> PixelGrid {
    filter_3x3(input, &SHARPEN_KERNEL, edges)
}
