//! Layer filters: fill transparent areas, additive combine, presence-based
//! "over" compositing.
//!
//! Two-layer filters first grow both operands with
//! [`resize_canvas`](super::resize::resize_canvas) to the bounding rectangle
//! of the pair, so the layers are aligned at their top-left corners.

use crate::error::FilterError;
use crate::grid::PixelGrid;
use crate::pixel::Pixel;

use super::resize::resize_canvas;

/// Fill transparent pixels with a solid color.
///
/// Builds a background of `color_code` at the source size and overlays every
/// pixel of `input` whose alpha is not zero.
///
/// # Errors
/// * `InvalidColorFormat` - `color_code` is not `#rgb` / `#rrggbb`
pub fn fill(input: &PixelGrid, color_code: &str) -> Result<PixelGrid, FilterError> {
    let background = Pixel::from_hex(color_code)?;
    Ok(input.map(|p| if p.is_transparent() { background } else { *p }))
}

fn align_layers(
    background: &PixelGrid,
    foreground: &PixelGrid,
) -> Result<(PixelGrid, PixelGrid), FilterError> {
    let width = background.width().max(foreground.width());
    let height = background.height().max(foreground.height());
    Ok((
        resize_canvas(background, width, height)?,
        resize_canvas(foreground, width, height)?,
    ))
}

/// Additive blend: channel-wise sum of all four channels. Sums saturate at
/// the `i32` range and are not clamped to 0-255.
pub fn combine(first: &PixelGrid, second: &PixelGrid) -> Result<PixelGrid, FilterError> {
    let (a, b) = align_layers(first, second)?;
    PixelGrid::from_fn(a.width(), a.height(), |x, y| a[(x, y)].add(&b[(x, y)]))
}

/// Place `foreground` over `background`.
///
/// | background | foreground | result |
/// |------------|------------|--------|
/// | transparent | transparent | transparent |
/// | transparent | opaque | foreground |
/// | opaque | transparent | background |
/// | opaque | opaque | foreground |
///
/// "Transparent" means alpha == 0; partial alpha is not blended.
pub fn over(background: &PixelGrid, foreground: &PixelGrid) -> Result<PixelGrid, FilterError> {
    let (bg, fg) = align_layers(background, foreground)?;
    PixelGrid::from_fn(bg.width(), bg.height(), |x, y| {
        let (b, f) = (bg[(x, y)], fg[(x, y)]);
        match (b.is_transparent(), f.is_transparent()) {
            (true, true) => Pixel::TRANSPARENT,
            (false, true) => b,
            (_, false) => f,
        }
    })
}
