//! PixelPanels
//!
//! 2D image filters over an in-memory grid of RGBA pixels, run through a
//! single request / single response worker boundary.
//!
//! ## Image Format
//! - **Grid**: [`PixelGrid`], column-major (`grid[(x, y)]`), channels stored
//!   as `i32` so intermediate results may leave 0-255
//! - **Buffer**: flat RGBA bytes, row-major, as produced by canvas-like
//!   surfaces (length = width * height * 4)
//!
//! Conversion from grid to buffer clamps every channel to 0-255.
//!
//! ## Filter Architecture
//! Filters are pure functions returning freshly allocated grids. Some change
//! dimensions (crop, resize, resize canvas, combine, over). By name, filters
//! are reached through the closed [`Filter`] enum; the [`worker`] module
//! wraps one filter call per message.
//!
//! ```
//! use pixelpanels::{buffer_to_grid, grid_to_buffer, filters};
//!
//! let rgba = vec![255, 0, 0, 255];
//! let grid = buffer_to_grid(&rgba, 1, 1).unwrap();
//! let gray = filters::grayscale(&grid);
//! assert_eq!(grid_to_buffer(&gray), vec![54, 54, 54, 255]);
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod filters;
pub mod grid;
pub mod pixel;
pub mod worker;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{FilterOptions, WorkerConfig};
pub use convert::{buffer_to_grid, grid_to_buffer, ImageBuffer};
pub use error::{FilterError, WorkerError};
pub use filters::{Filter, FilterArgs};
pub use grid::PixelGrid;
pub use pixel::Pixel;
pub use worker::{
    handle_message, handle_request, process_batch, FilterRequest, FilterResponse, PendingReply,
    Worker,
};
