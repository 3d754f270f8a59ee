//! Color extraction and analysis
//!
//! Harvests paint colors from a parsed document, separates structural
//! grays from data-bearing colors and suggests palette remappings.

pub mod extract;
pub mod normalize;

pub use extract::{analyze_colors, extract_colors, extract_data_colors, ColorAnalysis, ColorCounts};
pub use normalize::normalize_color;
