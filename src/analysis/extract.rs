//! Color harvesting and ranking over a document tree

use std::collections::BTreeMap;

use figure_color::{auto_map_colors, is_grayscale, ColorMapping, Palette};
use serde::Serialize;

use super::normalize::normalize_color;
use crate::svg::{Element, Style};

/// Canonical hex color to occurrence count.
pub type ColorCounts = BTreeMap<String, usize>;

const PAINT_PROPERTIES: [&str; 2] = ["fill", "stroke"];

/// Count every `fill`/`stroke` color in the subtree.
///
/// The inline style and the presentation attribute are read independently,
/// so an element that declares the same paint both ways counts twice.
pub fn extract_colors(root: &Element) -> ColorCounts {
    let mut counts = ColorCounts::new();

    for element in root.descendants() {
        let style = element.attr("style").map(Style::parse);

        for property in PAINT_PROPERTIES {
            let from_style = style.as_ref().and_then(|s| s.get(property));
            let from_attr = element.attr(property);

            for raw in [from_style, from_attr].into_iter().flatten() {
                if let Some(color) = normalize_color(raw) {
                    *counts.entry(color).or_default() += 1;
                }
            }
        }
    }

    counts
}

/// Chromatic colors seen at least `min_occurrences` times, most frequent
/// first. Ties keep ascending hex order.
pub fn extract_data_colors(root: &Element, min_occurrences: usize) -> Vec<(String, usize)> {
    rank_data_colors(extract_colors(root), min_occurrences)
}

pub(crate) fn rank_data_colors(counts: ColorCounts, min_occurrences: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(color, count)| *count >= min_occurrences && !is_grayscale(color))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Color report for one document.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColorAnalysis {
    pub total_unique_colors: usize,
    pub all_colors: ColorCounts,
    pub data_colors: Vec<(String, usize)>,
    pub grayscale_colors: ColorCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_mapping: Option<ColorMapping>,
}

/// Full color breakdown, with a suggested remapping when a non-empty
/// palette is given.
pub fn analyze_colors(root: &Element, palette: Option<&Palette>) -> ColorAnalysis {
    let all_colors = extract_colors(root);

    let grayscale_colors: ColorCounts = all_colors
        .iter()
        .filter(|(color, _)| is_grayscale(color))
        .map(|(color, count)| (color.clone(), *count))
        .collect();

    let data_colors = rank_data_colors(all_colors.clone(), 1);

    let suggested_mapping = palette
        .filter(|p| !p.is_empty())
        .map(|p| auto_map_colors(&data_colors, p));

    ColorAnalysis {
        total_unique_colors: all_colors.len(),
        all_colors,
        data_colors,
        grayscale_colors,
        suggested_mapping,
    }
}
