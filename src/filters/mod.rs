//! Filter library.
//!
//! Every filter is a pure function over a borrowed [`PixelGrid`] that returns
//! a freshly allocated grid; inputs are never modified.
//!
//! | Category | Filters | Dimensions |
//! |----------|---------|------------|
//! | Pixel-wise | grayscale, invert, threshold, add, brightness, darkness | preserved |
//! | Orientation | rotate (180°), flip (horizontal) | preserved |
//! | Geometry | crop, resize, resize canvas | changed |
//! | Layers | fill, combine, over | bounding rectangle |
//! | Convolution | filter3x3, box blur, gaussian blur, sharpen | preserved |
//!
//! Channel values are not clamped by any filter. Clamping to 0-255 happens
//! once, when the grid is written back to a byte buffer.
//!
//! [`PixelGrid`]: crate::grid::PixelGrid

pub mod blur;
pub mod color_adjust;
pub mod compositing;
pub mod core;
pub mod grayscale;
pub mod registry;
pub mod resize;
pub mod rotate;
pub mod sharpen;
pub mod stylize;

pub use self::core::{filter_3x3, EdgePolicy, Kernel3x3};
pub use blur::{box_blur, gaussian_blur};
pub use color_adjust::{add, brightness, darkness, invert};
pub use compositing::{combine, fill, over};
pub use grayscale::grayscale;
pub use registry::{apply, Filter, FilterArgs, UnknownFilterName};
pub use resize::{crop, crop_with, resize, resize_canvas, CropBounds, CropRect};
pub use rotate::{flip_horizontal, rotate_180};
pub use sharpen::sharpen;
pub use stylize::threshold;
