//! Normalization of SVG paint values to canonical `#rrggbb`

use regex::Regex;
use std::sync::OnceLock;

use figure_color::{rgb_to_hex, Rgb};

/// CSS color keywords that show up in plotting output.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("red", "#ff0000"),
    ("green", "#008000"),
    ("lime", "#00ff00"),
    ("blue", "#0000ff"),
    ("yellow", "#ffff00"),
    ("cyan", "#00ffff"),
    ("aqua", "#00ffff"),
    ("magenta", "#ff00ff"),
    ("fuchsia", "#ff00ff"),
    ("orange", "#ffa500"),
    ("purple", "#800080"),
    ("pink", "#ffc0cb"),
    ("brown", "#a52a2a"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("silver", "#c0c0c0"),
    ("maroon", "#800000"),
    ("olive", "#808000"),
    ("navy", "#000080"),
    ("teal", "#008080"),
    ("gold", "#ffd700"),
    ("coral", "#ff7f50"),
    ("salmon", "#fa8072"),
    ("crimson", "#dc143c"),
    ("indigo", "#4b0082"),
    ("violet", "#ee82ee"),
    ("turquoise", "#40e0d0"),
    ("tomato", "#ff6347"),
    ("khaki", "#f0e68c"),
    ("plum", "#dda0dd"),
    ("tan", "#d2b48c"),
    ("beige", "#f5f5dc"),
    ("ivory", "#fffff0"),
    ("steelblue", "#4682b4"),
    ("royalblue", "#4169e1"),
    ("skyblue", "#87ceeb"),
    ("darkblue", "#00008b"),
    ("darkred", "#8b0000"),
    ("darkgreen", "#006400"),
    ("darkorange", "#ff8c00"),
    ("darkgray", "#a9a9a9"),
    ("darkgrey", "#a9a9a9"),
    ("dimgray", "#696969"),
    ("lightgray", "#d3d3d3"),
    ("lightgrey", "#d3d3d3"),
    ("lightblue", "#add8e6"),
    ("lightgreen", "#90ee90"),
    ("whitesmoke", "#f5f5f5"),
];

/// Values that are valid paint but carry no concrete color.
const NO_COLOR: &[&str] = &["none", "transparent", "inherit", "currentcolor"];

fn rgb_function() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$")
            .expect("rgb() pattern is valid")
    })
}

/// Normalize a paint value to lowercase `#rrggbb`.
///
/// Accepts hex (`#rgb`, `#rrggbb`), CSS names and `rgb(r,g,b)`. Returns
/// `None` for `none`, `transparent`, `inherit`, `currentColor`, `url(...)`
/// references and anything unrecognized.
pub fn normalize_color(raw: &str) -> Option<String> {
    let value = raw.trim().to_lowercase();

    if value.is_empty() || NO_COLOR.contains(&value.as_str()) || value.starts_with("url(") {
        return None;
    }

    if let Some((_, hex)) = NAMED_COLORS.iter().find(|(name, _)| *name == value) {
        return Some((*hex).to_string());
    }

    if value.starts_with('#') {
        return value.parse::<Rgb>().ok().map(|rgb| rgb.to_hex());
    }

    let caps = rgb_function().captures(&value)?;
    let channel = |i: usize| caps.get(i)?.as_str().parse::<u8>().ok();
    Some(rgb_to_hex(channel(1)?, channel(2)?, channel(3)?))
}
