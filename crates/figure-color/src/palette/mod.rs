//! Palette types and greedy color mapping
//!
//! This module provides the target palette of a publication style, with LAB
//! values precomputed, and the auto-mapper that assigns document data colors
//! to palette slots.

mod error;
mod palette;

pub use error::ParseColorError;
pub use palette::{auto_map_colors, ColorMapping, Palette};
