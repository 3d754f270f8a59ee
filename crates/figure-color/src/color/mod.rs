//! Color types and conversion utilities
//!
//! Each step of the hex → LAB chain has its own type so that a value in one
//! space cannot be used where another is expected.
//!
//! # Example
//!
//! ```
//! use figure_color::{Lab, LinearRgb, Rgb, Xyz};
//!
//! let rgb: Rgb = "#2171b5".parse().unwrap();
//! let lab = Lab::from(Xyz::from(LinearRgb::from(rgb)));
//! assert!(lab.chroma() > 15.0);
//! ```

mod lab;
mod linear_rgb;
mod srgb;
mod xyz;

pub use lab::Lab;
pub use linear_rgb::LinearRgb;
pub use srgb::Rgb;
pub use xyz::Xyz;

use crate::palette::ParseColorError;

/// Parse `#rgb` / `#rrggbb` (the `#` is optional) into 8-bit channels.
pub fn hex_to_rgb(hex: &str) -> Result<(u8, u8, u8), ParseColorError> {
    let rgb: Rgb = hex.parse()?;
    Ok((rgb.r, rgb.g, rgb.b))
}

/// Format 8-bit channels as lowercase, zero-padded `#rrggbb`.
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    Rgb::new(r, g, b).to_hex()
}

/// Convert 8-bit sRGB to CIE LAB (D65).
pub fn rgb_to_lab(r: u8, g: u8, b: u8) -> Lab {
    Lab::from(Rgb::new(r, g, b))
}

/// Parse a hex color and convert it to CIE LAB.
pub fn hex_to_lab(hex: &str) -> Result<Lab, ParseColorError> {
    let rgb: Rgb = hex.parse()?;
    Ok(Lab::from(rgb))
}

/// CIE76 color difference: Euclidean distance in LAB.
#[inline]
pub fn delta_e(lab1: Lab, lab2: Lab) -> f64 {
    lab1.delta_e(lab2)
}
