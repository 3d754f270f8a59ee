//! Palette struct with precomputed LAB values and greedy auto-mapping.

use std::collections::BTreeMap;

use crate::color::{Lab, Rgb};

/// Mapping from a source color to its replacement, both canonical `#rrggbb`.
///
/// Never contains a self-mapping.
pub type ColorMapping = BTreeMap<String, String>;

/// An ordered target palette.
///
/// Entries are canonicalized to lowercase `#rrggbb` and converted to LAB
/// once at construction. Entries that do not parse as hex colors are
/// dropped; the remaining order is preserved because it breaks distance ties.
///
/// # Example
///
/// ```
/// use figure_color::Palette;
///
/// let palette = Palette::new(["#E6550D", "not-a-color", "#21b"]);
/// assert_eq!(palette.colors().collect::<Vec<_>>(), ["#e6550d", "#2211bb"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Palette {
    hex: Vec<String>,
    lab: Vec<Lab>,
}

impl Palette {
    pub fn new<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hex = Vec::new();
        let mut lab = Vec::new();

        for color in colors {
            if let Ok(rgb) = color.as_ref().parse::<Rgb>() {
                hex.push(rgb.to_hex());
                lab.push(Lab::from(rgb));
            }
        }

        Self { hex, lab }
    }

    pub fn len(&self) -> usize {
        self.hex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hex.is_empty()
    }

    /// Canonical hex strings in palette order.
    pub fn colors(&self) -> impl Iterator<Item = &str> {
        self.hex.iter().map(String::as_str)
    }

    /// Hex string of the entry at `index`.
    pub fn hex(&self, index: usize) -> &str {
        &self.hex[index]
    }

    /// Index of the entry closest to `target`, skipping entries for which
    /// `skip` returns true. Ties go to the earlier entry.
    pub fn nearest_where(&self, target: Lab, skip: impl Fn(usize) -> bool) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for (i, &lab) in self.lab.iter().enumerate() {
            if skip(i) {
                continue;
            }
            let dist = target.delta_e(lab);
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((i, dist));
            }
        }

        best.map(|(i, _)| i)
    }

    /// Index of the entry closest to `target`.
    pub fn nearest(&self, target: Lab) -> Option<usize> {
        self.nearest_where(target, |_| false)
    }
}

/// Map found data colors onto a palette.
///
/// Greedy, in input order: `found` is expected to be ranked by frequency,
/// and each color in turn takes the closest palette entry no earlier color
/// has claimed. The most frequent series therefore get first pick of the
/// distinct palette slots. This is not an optimal assignment and must not be
/// turned into one; callers rely on the frequency bias.
///
/// Once every entry is claimed, remaining colors fall back to the closest
/// entry overall, so every parseable color receives a destination.
///
/// A color whose closest entry is itself produces no mapping and does not
/// claim the entry. Unparseable found colors are skipped. Either input being
/// empty yields an empty mapping.
pub fn auto_map_colors(found: &[(String, usize)], palette: &Palette) -> ColorMapping {
    let mut mapping = ColorMapping::new();
    if found.is_empty() || palette.is_empty() {
        return mapping;
    }

    let mut used = vec![false; palette.len()];

    for (src, _count) in found {
        let Ok(rgb) = src.parse::<Rgb>() else {
            continue;
        };
        let src_hex = rgb.to_hex();
        let src_lab = Lab::from(rgb);

        let Some(best) = palette
            .nearest_where(src_lab, |i| used[i])
            .or_else(|| palette.nearest(src_lab))
        else {
            continue;
        };

        let dst = palette.hex(best);
        if dst != src_hex {
            mapping.insert(src_hex, dst.to_string());
            used[best] = true;
        }
    }

    mapping
}
