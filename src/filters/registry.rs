//! Filter selection by name and positional-argument dispatch.
//!
//! [`Filter`] is the closed set of filters. Names only matter at the message
//! boundary, where [`Filter::from_name`] resolves canonical names and aliases
//! through a static table. [`apply`] runs one filter with its arguments.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::config::FilterOptions;
use crate::error::FilterError;
use crate::grid::PixelGrid;

use super::blur::{box_blur, gaussian_blur};
use super::color_adjust::{add, brightness, darkness, invert};
use super::compositing::{combine, fill, over};
use super::core::{filter_3x3, Kernel3x3};
use super::grayscale::grayscale;
use super::resize::{crop_with, resize, resize_canvas, CropRect};
use super::rotate::{flip_horizontal, rotate_180};
use super::sharpen::sharpen;
use super::stylize::{threshold, DEFAULT_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Original,
    Grayscale,
    Invert,
    Rotate,
    Flip,
    Threshold,
    Brightness,
    Darkness,
    Add,
    Crop,
    Resize,
    ResizeCanvas,
    Fill,
    Combine,
    Over,
    Filter3x3,
    BoxBlur,
    GaussianBlur,
    Sharpen,
}

/// Selector table. The first entry for each filter is its canonical name.
const NAMES: &[(&str, Filter)] = &[
    ("original", Filter::Original),
    ("grayscale", Filter::Grayscale),
    ("invert", Filter::Invert),
    ("rotate", Filter::Rotate),
    ("flip", Filter::Flip),
    ("threshold", Filter::Threshold),
    ("brightness", Filter::Brightness),
    ("darkness", Filter::Darkness),
    ("add", Filter::Add),
    ("crop", Filter::Crop),
    ("resize", Filter::Resize),
    ("resizeImage", Filter::Resize),
    ("resizeCanvas", Filter::ResizeCanvas),
    ("fill", Filter::Fill),
    ("fillWithColor", Filter::Fill),
    ("combine", Filter::Combine),
    ("over", Filter::Over),
    ("filter3x3", Filter::Filter3x3),
    ("boxBlur", Filter::BoxBlur),
    ("blur", Filter::BoxBlur),
    ("gaussianBlur", Filter::GaussianBlur),
    ("sharpen", Filter::Sharpen),
];

impl Filter {
    pub const ALL: [Filter; 19] = [
        Filter::Original,
        Filter::Grayscale,
        Filter::Invert,
        Filter::Rotate,
        Filter::Flip,
        Filter::Threshold,
        Filter::Brightness,
        Filter::Darkness,
        Filter::Add,
        Filter::Crop,
        Filter::Resize,
        Filter::ResizeCanvas,
        Filter::Fill,
        Filter::Combine,
        Filter::Over,
        Filter::Filter3x3,
        Filter::BoxBlur,
        Filter::GaussianBlur,
        Filter::Sharpen,
    ];

    /// Resolve a selector (canonical name or alias). Case-sensitive.
    pub fn from_name(name: &str) -> Option<Filter> {
        NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, filter)| *filter)
    }

    /// Canonical selector.
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(_, filter)| *filter == self)
            .map(|(name, _)| *name)
            .unwrap_or("original")
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by `str::parse::<Filter>` for an unregistered selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilterName(pub String);

impl fmt::Display for UnknownFilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown filter {:?}", self.0)
    }
}

impl std::error::Error for UnknownFilterName {}

impl FromStr for Filter {
    type Err = UnknownFilterName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::from_name(s).ok_or_else(|| UnknownFilterName(s.to_string()))
    }
}

/// Positional filter arguments, numbered 2 to 5 after the grid (argument 1).
///
/// `None` and JSON `null` both mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    values: [Option<Value>; 4],
}

/// Position of the first argument after the grid.
pub const FIRST_ARG: usize = 2;

impl FilterArgs {
    pub fn new(values: [Option<Value>; 4]) -> Self {
        let values = values.map(|v| v.filter(|v| !v.is_null()));
        Self { values }
    }

    /// Arguments from an ordered list; anything past the fourth is ignored.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut slots: [Option<Value>; 4] = Default::default();
        for (slot, value) in slots.iter_mut().zip(values) {
            *slot = Some(value);
        }
        Self::new(slots)
    }

    fn value(&self, position: usize) -> Option<&Value> {
        position
            .checked_sub(FIRST_ARG)
            .and_then(|i| self.values.get(i))
            .and_then(Option::as_ref)
    }

    fn required(&self, position: usize) -> Result<&Value, FilterError> {
        self.value(position).ok_or_else(|| FilterError::InvalidArgument {
            position,
            reason: "missing".to_string(),
        })
    }

    pub fn number(&self, position: usize) -> Result<Option<f64>, FilterError> {
        match self.value(position) {
            None => Ok(None),
            Some(value) => value.as_f64().map(Some).ok_or_else(|| FilterError::InvalidArgument {
                position,
                reason: format!("expected a number, got {}", value),
            }),
        }
    }

    /// Non-negative integer (coordinates and sizes), at most `u32::MAX`.
    pub fn dimension(&self, position: usize) -> Result<usize, FilterError> {
        let value = self.required(position)?;
        value
            .as_u64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .filter(|n| *n <= u64::from(u32::MAX))
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| FilterError::InvalidArgument {
                position,
                reason: format!("expected a non-negative integer, got {}", value),
            })
    }

    pub fn text(&self, position: usize) -> Result<&str, FilterError> {
        let value = self.required(position)?;
        value.as_str().ok_or_else(|| FilterError::InvalidArgument {
            position,
            reason: format!("expected a string, got {}", value),
        })
    }

    pub fn kernel(&self, position: usize) -> Result<Kernel3x3, FilterError> {
        let value = self.required(position)?;
        serde_json::from_value(value.clone()).map_err(|e| FilterError::InvalidArgument {
            position,
            reason: format!("expected a 3x3 kernel: {}", e),
        })
    }

    pub fn grid(&self, position: usize) -> Result<PixelGrid, FilterError> {
        let value = self.required(position)?;
        serde_json::from_value(value.clone()).map_err(|e| FilterError::InvalidArgument {
            position,
            reason: format!("expected a pixel grid: {}", e),
        })
    }
}

/// Run `filter` on `input`.
///
/// | Filter | Arguments |
/// |--------|-----------|
/// | threshold | 2: value (default 128) |
/// | brightness, darkness, add | 2: value (default 0) |
/// | crop | 2: x, 3: y, 4: width, 5: height |
/// | resize, resizeCanvas | 2: width, 3: height |
/// | fill | 2: hex color |
/// | combine, over | 2: second grid |
/// | filter3x3 | 2: kernel |
pub fn apply(
    filter: Filter,
    input: &PixelGrid,
    args: &FilterArgs,
    options: &FilterOptions,
) -> Result<PixelGrid, FilterError> {
    let edges = options.edges;

    let output = match filter {
        Filter::Original => input.clone(),
        Filter::Grayscale => grayscale(input),
        Filter::Invert => invert(input),
        Filter::Rotate => rotate_180(input),
        Filter::Flip => flip_horizontal(input),
        Filter::Threshold => threshold(input, args.number(2)?.unwrap_or(DEFAULT_THRESHOLD)),
        Filter::Brightness => brightness(input, args.number(2)?.unwrap_or(0.0)),
        Filter::Darkness => darkness(input, args.number(2)?.unwrap_or(0.0)),
        Filter::Add => add(input, args.number(2)?.unwrap_or(0.0)),
        Filter::Crop => {
            let rect = CropRect {
                x: args.dimension(2)?,
                y: args.dimension(3)?,
                width: args.dimension(4)?,
                height: args.dimension(5)?,
            };
            crop_with(input, rect, options.crop_bounds)?
        }
        Filter::Resize => resize(input, args.dimension(2)?, args.dimension(3)?)?,
        Filter::ResizeCanvas => resize_canvas(input, args.dimension(2)?, args.dimension(3)?)?,
        Filter::Fill => fill(input, args.text(2)?)?,
        Filter::Combine => combine(input, &args.grid(2)?)?,
        Filter::Over => over(input, &args.grid(2)?)?,
        Filter::Filter3x3 => filter_3x3(input, &args.kernel(2)?, edges),
        Filter::BoxBlur => box_blur(input, edges),
        Filter::GaussianBlur => gaussian_blur(input, edges),
        Filter::Sharpen => sharpen(input, edges),
    };

    Ok(output)
}
