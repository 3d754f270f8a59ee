//! Grayscale and lightness classification
//!
//! Axes, tick labels, gridlines and backgrounds in a figure are drawn in
//! black, white and greys; the series that carry data are chromatic. Both
//! classifiers fail open: a value that does not parse is treated as
//! chromatic with neutral lightness rather than raising.

use crate::color::hex_to_lab;

/// Chroma below which a color counts as grayscale.
pub const GRAYSCALE_THRESHOLD: f64 = 15.0;

/// Lightness reported for colors that do not parse.
pub const DEFAULT_LIGHTNESS: f64 = 50.0;

/// True iff the LAB chroma of `hex` is below [`GRAYSCALE_THRESHOLD`].
///
/// ```
/// use figure_color::is_grayscale;
/// assert!(is_grayscale("#808080"));
/// assert!(!is_grayscale("#2171b5"));
/// assert!(!is_grayscale("garbage"));
/// ```
pub fn is_grayscale(hex: &str) -> bool {
    is_grayscale_with(hex, GRAYSCALE_THRESHOLD)
}

/// [`is_grayscale`] with an explicit chroma threshold.
pub fn is_grayscale_with(hex: &str, threshold: f64) -> bool {
    hex_to_lab(hex).is_ok_and(|lab| lab.chroma() < threshold)
}

/// Perceptual lightness L* (0 = black, 100 = white), or
/// [`DEFAULT_LIGHTNESS`] when `hex` does not parse.
pub fn color_lightness(hex: &str) -> f64 {
    hex_to_lab(hex).map_or(DEFAULT_LIGHTNESS, |lab| lab.l)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grays_are_grayscale() {
        for hex in ["#000000", "#ffffff", "#808080", "#d3d3d3", "#1a1a1a", "#ccc"] {
            assert!(is_grayscale(hex), "{hex} should be grayscale");
        }
    }

    #[test]
    fn test_chromatic_colors_are_not() {
        for hex in ["#ff0000", "#2171b5", "#e6550d", "#31a354", "#4682b4"] {
            assert!(!is_grayscale(hex), "{hex} should be chromatic");
        }
    }

    #[test]
    fn test_malformed_fails_open() {
        assert!(!is_grayscale(""));
        assert!(!is_grayscale("#12"));
        assert!(!is_grayscale("none"));
    }

    #[test]
    fn test_threshold_is_configurable() {
        // A muted blue-grey sits between the two thresholds
        assert!(is_grayscale_with("#6a7080", 15.0));
        assert!(!is_grayscale_with("#6a7080", 2.0));
    }

    #[test]
    fn test_lightness() {
        assert!(color_lightness("#000000").abs() < 0.01);
        assert!((color_lightness("#ffffff") - 100.0).abs() < 0.01);

        let mid = color_lightness("#808080");
        assert!(mid > 50.0 && mid < 56.0, "mid gray L* = {mid}");
    }

    #[test]
    fn test_lightness_default_on_bad_input() {
        assert_eq!(color_lightness("not a color"), DEFAULT_LIGHTNESS);
    }
}
