//! Conversion between flat RGBA byte buffers and [`PixelGrid`].
//!
//! The flat layout is what canvas-like surfaces produce: row-major by `y`,
//! then `x`, four bytes per pixel in R, G, B, A order, so pixel `(x, y)`
//! starts at `y * width * 4 + x * 4`.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::grid::PixelGrid;
use crate::pixel::Pixel;

/// Flat RGBA image record exchanged with the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBuffer {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl ImageBuffer {
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> Result<Self, FilterError> {
        check_buffer(data.len(), width, height)?;
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn to_grid(&self) -> Result<PixelGrid, FilterError> {
        buffer_to_grid(&self.data, self.width, self.height)
    }

    pub fn from_grid(grid: &PixelGrid) -> Self {
        Self {
            data: grid_to_buffer(grid),
            width: grid.width(),
            height: grid.height(),
        }
    }
}

fn check_buffer(len: usize, width: usize, height: usize) -> Result<(), FilterError> {
    if width == 0 || height == 0 {
        return Err(FilterError::InvalidDimension { width, height });
    }
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or(FilterError::InvalidDimension { width, height })?;
    if len != expected {
        return Err(FilterError::BufferSizeMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Decode a flat RGBA buffer into a grid.
///
/// # Arguments
/// * `buffer` - RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn buffer_to_grid(
    buffer: &[u8],
    width: usize,
    height: usize,
) -> Result<PixelGrid, FilterError> {
    check_buffer(buffer.len(), width, height)?;

    PixelGrid::from_fn(width, height, |x, y| {
        let start = y * width * 4 + x * 4;
        Pixel::new(
            buffer[start] as i32,
            buffer[start + 1] as i32,
            buffer[start + 2] as i32,
            buffer[start + 3] as i32,
        )
    })
}

/// Encode a grid as a flat RGBA buffer, clamping every channel to 0-255.
pub fn grid_to_buffer(grid: &PixelGrid) -> Vec<u8> {
    let (width, height) = grid.dimensions();
    let mut data = vec![0u8; width * height * 4];

    for y in 0..height {
        for x in 0..width {
            let start = y * width * 4 + x * 4;
            data[start..start + 4].copy_from_slice(&grid[(x, y)].to_rgba8());
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_layout_is_row_major() {
        // 2x2: (0,0) red, (1,0) green, (0,1) blue, (1,1) white
        let buffer = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 255,
        ];
        let grid = buffer_to_grid(&buffer, 2, 2).unwrap();

        assert_eq!(grid[(0, 0)], Pixel::new(255, 0, 0, 255));
        assert_eq!(grid[(1, 0)], Pixel::new(0, 255, 0, 255));
        assert_eq!(grid[(0, 1)], Pixel::new(0, 0, 255, 255));
        assert_eq!(grid[(1, 1)], Pixel::WHITE);
    }

    #[test]
    fn test_roundtrip() {
        let buffer: Vec<u8> = (0..3 * 2 * 4).map(|i| (i * 7) as u8).collect();
        let grid = buffer_to_grid(&buffer, 3, 2).unwrap();
        assert_eq!(grid_to_buffer(&grid), buffer);
        assert_eq!(buffer_to_grid(&grid_to_buffer(&grid), 3, 2).unwrap(), grid);
    }

    #[test]
    fn test_serialization_clamps() {
        let grid = PixelGrid::new(1, 1, Pixel::new(-40, 300, 128, 256)).unwrap();
        assert_eq!(grid_to_buffer(&grid), vec![0, 255, 128, 255]);

        let back = buffer_to_grid(&grid_to_buffer(&grid), 1, 1).unwrap();
        assert_eq!(back[(0, 0)], Pixel::new(0, 255, 128, 255));
    }

    #[test]
    fn test_size_mismatch() {
        assert_eq!(
            buffer_to_grid(&[0; 15], 2, 2),
            Err(FilterError::BufferSizeMismatch {
                expected: 16,
                actual: 15
            })
        );
        assert!(matches!(
            buffer_to_grid(&[], 0, 0),
            Err(FilterError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_image_buffer_record() {
        let image = ImageBuffer::new(vec![1, 2, 3, 4], 1, 1).unwrap();
        let grid = image.to_grid().unwrap();
        assert_eq!(ImageBuffer::from_grid(&grid), image);

        assert!(ImageBuffer::new(vec![1, 2, 3], 1, 1).is_err());
    }
}
