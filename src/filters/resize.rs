//! Geometry filters that change dimensions: crop, resize, resize canvas.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::grid::PixelGrid;
use crate::pixel::Pixel;

/// Bound check applied by [`crop_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropBounds {
    /// Reject when `x + width > grid_width - 1` (or the same for y). A crop
    /// that reaches the last column or row is refused.
    #[default]
    Strict,
    /// Reject only when the rectangle leaves the grid.
    Inclusive,
}

/// Crop rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Crop with the default [`CropBounds::Strict`] check.
pub fn crop(
    input: &PixelGrid,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> Result<PixelGrid, FilterError> {
    crop_with(
        input,
        CropRect {
            x,
            y,
            width,
            height,
        },
        CropBounds::Strict,
    )
}

/// Extract a sub-rectangle.
///
/// # Errors
/// * `InvalidDimension` - zero width or height
/// * `OutOfBounds` - the rectangle fails the `bounds` check
pub fn crop_with(
    input: &PixelGrid,
    rect: CropRect,
    bounds: CropBounds,
) -> Result<PixelGrid, FilterError> {
    let (grid_width, grid_height) = input.dimensions();
    if rect.width == 0 || rect.height == 0 {
        return Err(FilterError::InvalidDimension {
            width: rect.width,
            height: rect.height,
        });
    }

    // Saturating so huge requests fail the check instead of overflowing.
    let right = rect.x.saturating_add(rect.width);
    let bottom = rect.y.saturating_add(rect.height);
    let out_of_bounds = match bounds {
        CropBounds::Strict => right > grid_width - 1 || bottom > grid_height - 1,
        CropBounds::Inclusive => right > grid_width || bottom > grid_height,
    };
    if out_of_bounds {
        tracing::warn!(
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            grid_width,
            grid_height,
            "crop rejected: out of index"
        );
        return Err(FilterError::OutOfBounds {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            grid_width,
            grid_height,
        });
    }

    PixelGrid::from_fn(rect.width, rect.height, |i, j| input[(rect.x + i, rect.y + j)])
}

/// Nearest-neighbor scaling.
///
/// `output[x][y] = input[floor(x * src_w / w)][floor(y * src_h / h)]`
pub fn resize(input: &PixelGrid, width: usize, height: usize) -> Result<PixelGrid, FilterError> {
    let (src_w, src_h) = input.dimensions();
    // Widened so `x * src_w` cannot overflow; the quotient is below `src_w`.
    let scale = |i: usize, src: usize, dst: usize| (i as u128 * src as u128 / dst as u128) as usize;
    PixelGrid::from_fn(width, height, |x, y| {
        input[(scale(x, src_w, width), scale(y, src_h, height))]
    })
}

/// Grow the canvas to the right and bottom.
///
/// The source is copied into the top-left corner; new area is transparent.
///
/// # Errors
/// * `UnsupportedOperation` - either target dimension is smaller than the
///   source (scaling down is not supported)
pub fn resize_canvas(
    input: &PixelGrid,
    width: usize,
    height: usize,
) -> Result<PixelGrid, FilterError> {
    let (src_w, src_h) = input.dimensions();
    if width < src_w || height < src_h {
        tracing::warn!(
            src_w,
            src_h,
            width,
            height,
            "resize canvas rejected: scale down not supported"
        );
        return Err(FilterError::UnsupportedOperation(format!(
            "resize canvas cannot scale down {}x{} to {}x{}",
            src_w, src_h, width, height
        )));
    }

    PixelGrid::from_fn(width, height, |x, y| {
        if x < src_w && y < src_h {
            input[(x, y)]
        } else {
            Pixel::TRANSPARENT
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(w: usize, h: usize) -> PixelGrid {
        PixelGrid::from_fn(w, h, |x, y| Pixel::new(x as i32, y as i32, 0, 255)).unwrap()
    }

    #[test]
    fn test_crop_interior() {
        let img = positions(5, 5);
        let result = crop(&img, 1, 2, 2, 2).unwrap();

        assert_eq!(result.dimensions(), (2, 2));
        assert_eq!(result[(0, 0)], Pixel::new(1, 2, 0, 255));
        assert_eq!(result[(1, 1)], Pixel::new(2, 3, 0, 255));
    }

    #[test]
    fn test_crop_strict_rejects_last_column() {
        let img = positions(5, 5);

        // 1 + 4 = 5 > 4
        assert!(matches!(
            crop(&img, 1, 0, 4, 2),
            Err(FilterError::OutOfBounds { .. })
        ));
        // 0 + 4 = 4, accepted
        assert!(crop(&img, 0, 0, 4, 4).is_ok());
    }

    #[test]
    fn test_full_extent_crop() {
        let img = positions(4, 3);
        let full = CropRect {
            x: 0,
            y: 0,
            width: 4,
            height: 3,
        };

        assert!(matches!(
            crop_with(&img, full, CropBounds::Strict),
            Err(FilterError::OutOfBounds { .. })
        ));
        assert_eq!(crop_with(&img, full, CropBounds::Inclusive).unwrap(), img);
    }

    #[test]
    fn test_crop_zero_size() {
        let img = positions(4, 4);
        assert!(matches!(
            crop(&img, 0, 0, 0, 2),
            Err(FilterError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_resize_nearest_neighbor_up() {
        let img = positions(2, 2);
        let result = resize(&img, 4, 4).unwrap();

        assert_eq!(result.dimensions(), (4, 4));
        assert_eq!(result[(0, 0)], img[(0, 0)]);
        assert_eq!(result[(1, 1)], img[(0, 0)]);
        assert_eq!(result[(2, 1)], img[(1, 0)]);
        assert_eq!(result[(3, 3)], img[(1, 1)]);
    }

    #[test]
    fn test_resize_down_samples() {
        let img = positions(6, 3);
        let result = resize(&img, 3, 1).unwrap();

        assert_eq!(result.dimensions(), (3, 1));
        assert_eq!(result[(0, 0)], img[(0, 0)]);
        assert_eq!(result[(1, 0)], img[(2, 0)]);
        assert_eq!(result[(2, 0)], img[(4, 0)]);
    }

    #[test]
    fn test_resize_zero_target() {
        assert!(resize(&positions(2, 2), 0, 2).is_err());
    }

    #[test]
    fn test_oversized_targets_are_rejected() {
        let side = u32::MAX as usize;
        let img = positions(2, 2);
        assert_eq!(
            resize(&img, side, side),
            Err(FilterError::InvalidDimension { width: side, height: side })
        );
        assert!(matches!(
            resize_canvas(&img, usize::MAX, 2),
            Err(FilterError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_resize_canvas_grows_to_lower_right() {
        let img = PixelGrid::new(2, 2, Pixel::new(255, 0, 0, 255)).unwrap();
        let result = resize_canvas(&img, 4, 4).unwrap();

        assert_eq!(result.dimensions(), (4, 4));
        for (x, y, p) in result.iter() {
            if x < 2 && y < 2 {
                assert_eq!(*p, Pixel::new(255, 0, 0, 255));
            } else {
                assert_eq!(*p, Pixel::TRANSPARENT);
            }
        }
    }

    #[test]
    fn test_resize_canvas_rejects_scale_down() {
        let img = PixelGrid::black(4, 4).unwrap();
        assert!(matches!(
            resize_canvas(&img, 3, 8),
            Err(FilterError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            resize_canvas(&img, 8, 2),
            Err(FilterError::UnsupportedOperation(_))
        ));
        assert_eq!(resize_canvas(&img, 4, 4).unwrap(), img);
    }
}
