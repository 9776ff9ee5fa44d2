//! Column-major pixel grid.
//!
//! A [`PixelGrid`] wraps an `ndarray::Array2<Pixel>` of shape
//! `(width, height)`, so element `[[x, y]]` is column `x`, row `y`. The grid
//! is always rectangular and never empty.
//!
//! On the wire the grid is a JSON array of columns, each column an array of
//! `{red, green, blue, alpha}` objects.

use std::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::pixel::Pixel;

/// Largest cell count an `Array2<Pixel>` can address.
const MAX_CELLS: usize = isize::MAX as usize / std::mem::size_of::<Pixel>();

/// Reject empty grids and shapes whose cell count cannot be allocated.
fn check_dimensions(width: usize, height: usize) -> Result<(), FilterError> {
    match width.checked_mul(height) {
        Some(cells) if cells > 0 && cells <= MAX_CELLS => Ok(()),
        _ => Err(FilterError::InvalidDimension { width, height }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Pixel>>", into = "Vec<Vec<Pixel>>")]
pub struct PixelGrid {
    pixels: Array2<Pixel>,
}

impl PixelGrid {
    /// Allocate a `width` x `height` grid with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: Pixel) -> Result<Self, FilterError> {
        check_dimensions(width, height)?;
        Ok(Self {
            pixels: Array2::from_elem((width, height), fill),
        })
    }

    /// Scratch grid used as the output of most filters.
    pub fn transparent(width: usize, height: usize) -> Result<Self, FilterError> {
        Self::new(width, height, Pixel::TRANSPARENT)
    }

    pub fn white(width: usize, height: usize) -> Result<Self, FilterError> {
        Self::new(width, height, Pixel::WHITE)
    }

    pub fn black(width: usize, height: usize) -> Result<Self, FilterError> {
        Self::new(width, height, Pixel::BLACK)
    }

    pub fn solid(width: usize, height: usize, color: Pixel) -> Result<Self, FilterError> {
        Self::new(width, height, color)
    }

    /// Solid grid from a `#rgb` / `#rrggbb` color code.
    pub fn from_hex(width: usize, height: usize, code: &str) -> Result<Self, FilterError> {
        let color = Pixel::from_hex(code)?;
        Self::new(width, height, color)
    }

    /// Build a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self, FilterError>
    where
        F: FnMut(usize, usize) -> Pixel,
    {
        check_dimensions(width, height)?;
        Ok(Self {
            pixels: Array2::from_shape_fn((width, height), |(x, y)| f(x, y)),
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.dim().0
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.dim().1
    }

    /// `(width, height)`
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        self.pixels.dim()
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height()
    }

    /// Checked access.
    pub fn get(&self, x: usize, y: usize) -> Result<&Pixel, FilterError> {
        self.pixels.get((x, y)).ok_or(FilterError::OutOfBounds {
            x,
            y,
            width: 1,
            height: 1,
            grid_width: self.width(),
            grid_height: self.height(),
        })
    }

    /// Write one cell. Only used while a filter assembles its fresh output.
    pub(crate) fn set(&mut self, x: usize, y: usize, pixel: Pixel) {
        self.pixels[[x, y]] = pixel;
    }

    /// Iterate `(x, y, pixel)` over every cell.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Pixel)> {
        self.pixels.indexed_iter().map(|((x, y), p)| (x, y, p))
    }

    /// Apply `f` to every pixel, keeping the dimensions.
    pub fn map<F>(&self, f: F) -> PixelGrid
    where
        F: FnMut(&Pixel) -> Pixel,
    {
        PixelGrid {
            pixels: self.pixels.map(f),
        }
    }

    /// Columns as nested vectors, the serialized layout.
    pub fn to_columns(&self) -> Vec<Vec<Pixel>> {
        self.pixels
            .outer_iter()
            .map(|column| column.to_vec())
            .collect()
    }

    /// Build from nested columns, rejecting empty or jagged input.
    pub fn from_columns(columns: Vec<Vec<Pixel>>) -> Result<Self, FilterError> {
        let width = columns.len();
        let height = columns.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidDimension { width, height });
        }
        if let Some(column) = columns.iter().find(|c| c.len() != height) {
            return Err(FilterError::InvalidDimension {
                width,
                height: column.len(),
            });
        }

        let flat: Vec<Pixel> = columns.into_iter().flatten().collect();
        let pixels = Array2::from_shape_vec((width, height), flat).map_err(|_| {
            FilterError::InvalidDimension { width, height }
        })?;
        Ok(Self { pixels })
    }
}

impl Index<(usize, usize)> for PixelGrid {
    type Output = Pixel;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Pixel {
        &self.pixels[[x, y]]
    }
}

impl TryFrom<Vec<Vec<Pixel>>> for PixelGrid {
    type Error = FilterError;

    fn try_from(columns: Vec<Vec<Pixel>>) -> Result<Self, Self::Error> {
        PixelGrid::from_columns(columns)
    }
}

impl From<PixelGrid> for Vec<Vec<Pixel>> {
    fn from(grid: PixelGrid) -> Self {
        grid.to_columns()
    }
}
