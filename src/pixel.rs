//! RGBA pixel value.
//!
//! Channels are stored as `i32` so that arithmetic filters (add, combine,
//! convolution) may leave the 0-255 range. Values are only clamped when a
//! grid is written back to a byte buffer.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// A single RGBA color sample.
///
/// Serialized with the field names `red`, `green`, `blue`, `alpha`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
    pub alpha: i32,
}

impl Pixel {
    /// Fully transparent black, the fill of every scratch grid.
    pub const TRANSPARENT: Pixel = Pixel::new(0, 0, 0, 0);
    pub const WHITE: Pixel = Pixel::new(255, 255, 255, 255);
    pub const BLACK: Pixel = Pixel::new(0, 0, 0, 255);

    pub const fn new(red: i32, green: i32, blue: i32, alpha: i32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Opaque pixel from 8-bit channels.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red as i32, green as i32, blue as i32, 255)
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.alpha == 0
    }

    /// Channel-wise sum of all four channels, saturating at the `i32` range.
    #[inline]
    pub fn add(&self, other: &Pixel) -> Pixel {
        Pixel::new(
            self.red.saturating_add(other.red),
            self.green.saturating_add(other.green),
            self.blue.saturating_add(other.blue),
            self.alpha.saturating_add(other.alpha),
        )
    }

    /// Channels clamped to 0-255 in R, G, B, A order.
    #[inline]
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            clamp_channel(self.red),
            clamp_channel(self.green),
            clamp_channel(self.blue),
            clamp_channel(self.alpha),
        ]
    }

    /// `#rrggbb` form of the color channels (alpha is dropped).
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Parse `#rgb` / `#rrggbb` (hash optional, case-insensitive) into an
    /// opaque pixel.
    pub fn from_hex(code: &str) -> Result<Self, FilterError> {
        code.parse()
    }
}

impl Default for Pixel {
    /// Black with alpha 1, the documented constructor default.
    fn default() -> Self {
        Pixel::new(0, 0, 0, 1)
    }
}

impl From<[u8; 4]> for Pixel {
    fn from(rgba: [u8; 4]) -> Self {
        Pixel::new(
            rgba[0] as i32,
            rgba[1] as i32,
            rgba[2] as i32,
            rgba[3] as i32,
        )
    }
}

impl FromStr for Pixel {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FilterError::InvalidColorFormat(s.to_string());

        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };

        match digits.len() {
            3 => {
                // Shorthand: 0xF -> 0xFF
                let r = channel(0..1)? * 17;
                let g = channel(1..2)? * 17;
                let b = channel(2..3)? * 17;
                Ok(Pixel::rgb(r, g, b))
            }
            6 => Ok(Pixel::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => Err(invalid()),
        }
    }
}

#[inline]
pub(crate) fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing_6digit() {
        let pixel: Pixel = "#0033ff".parse().unwrap();
        assert_eq!(pixel, Pixel::new(0, 0x33, 0xff, 255));

        let no_hash = Pixel::from_hex("0033FF").unwrap();
        assert_eq!(no_hash, pixel);
    }

    #[test]
    fn test_hex_parsing_shorthand() {
        let pixel = Pixel::from_hex("#03f").unwrap();
        assert_eq!(pixel, Pixel::new(0, 0x33, 0xff, 255));

        let upper = Pixel::from_hex("#ABC").unwrap();
        assert_eq!(upper, Pixel::new(0xaa, 0xbb, 0xcc, 255));
    }

    #[test]
    fn test_hex_parsing_errors() {
        for bad in ["", "#", "#12", "#1234", "#12345g", "##123", "#+12", "#ééé"] {
            match Pixel::from_hex(bad) {
                Err(FilterError::InvalidColorFormat(input)) => assert_eq!(input, bad),
                other => panic!("expected InvalidColorFormat for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_to_hex_clamps() {
        assert_eq!(Pixel::new(0, 51, 255, 255).to_hex(), "#0033ff");
        assert_eq!(Pixel::new(-20, 300, 16, 0).to_hex(), "#00ff10");
    }

    #[test]
    fn test_default_pixel() {
        assert_eq!(Pixel::default(), Pixel::new(0, 0, 0, 1));
    }

    #[test]
    fn test_add() {
        let a = Pixel::new(10, 20, 30, 255);
        let b = Pixel::new(5, 7, 250, 255);

        assert_eq!(a.add(&b), Pixel::new(15, 27, 280, 510));
    }

    #[test]
    fn test_add_saturates() {
        let big = Pixel::new(i32::MAX, i32::MIN, 0, i32::MAX);
        let sum = big.add(&big);
        assert_eq!(sum, Pixel::new(i32::MAX, i32::MIN, 0, i32::MAX));
        assert_eq!(sum.to_rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_transparency() {
        assert!(Pixel::TRANSPARENT.is_transparent());
        assert!(!Pixel::new(0, 0, 0, 1).is_transparent());
    }
}
