#![allow(clippy::excessive_precision, clippy::module_inception)]

//! figure-color: perceptual color math for scientific figures
//!
//! This library converts the colors found in vector graphics into CIE LAB,
//! measures perceptual distance between them, separates structural greys
//! from data-bearing colors, and maps data colors onto a publication
//! palette.
//!
//! # Quick Start
//!
//! ```
//! use figure_color::{auto_map_colors, Palette};
//!
//! let palette = Palette::new(["#e6550d", "#2171b5", "#31a354"]);
//! let found = [("#ff0000".to_string(), 10), ("#0000ff".to_string(), 5)];
//!
//! let mapping = auto_map_colors(&found, &palette);
//! assert_eq!(mapping["#ff0000"], "#e6550d");
//! assert_eq!(mapping["#0000ff"], "#2171b5");
//! ```
//!
//! # Color Spaces
//!
//! ```text
//! "#rrggbb"            (hex text, as written in documents)
//!     |
//!     v
//! Rgb                  (8-bit gamma-encoded sRGB)
//!     |
//!     v
//! LinearRgb            (sRGB transfer function removed)
//!     |
//!     v
//! Xyz                  (CIE 1931 XYZ, D65 white)
//!     |
//!     v
//! Lab                  (CIE L*a*b*; delta-E and chroma live here)
//! ```
//!
//! Colors are only ever compared in [`Lab`]. Comparing hex strings or raw
//! RGB triples for "closeness" gives answers that do not match what a
//! reader sees on the page.
//!
//! # Failure Behavior
//!
//! Strict parsing ([`hex_to_rgb`], [`hex_to_lab`]) returns
//! [`ParseColorError`]. The classifiers ([`is_grayscale`],
//! [`color_lightness`]) and the mapper never fail: a malformed color is
//! classified as chromatic, gets the neutral lightness 50, or is skipped.

pub mod classify;
pub mod color;
pub mod palette;

pub use classify::{
    color_lightness, is_grayscale, is_grayscale_with, DEFAULT_LIGHTNESS, GRAYSCALE_THRESHOLD,
};
pub use color::{delta_e, hex_to_lab, hex_to_rgb, rgb_to_hex, rgb_to_lab, Lab, LinearRgb, Rgb, Xyz};
pub use palette::{auto_map_colors, ColorMapping, Palette, ParseColorError};
