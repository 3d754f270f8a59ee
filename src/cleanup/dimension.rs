use crate::svg::Element;

const UNIT_SUFFIXES: [&str; 3] = ["px", "mm", "pt"];

/// Parse a length such as `"640px"` or `"50mm"` to its number.
/// Unit suffixes are dropped, not converted. Invalid input is 0.0.
pub fn parse_dimension(raw: &str) -> f64 {
    let mut value = raw.trim();
    for suffix in UNIT_SUFFIXES {
        if let Some(stripped) = value.strip_suffix(suffix) {
            value = stripped.trim_end();
            break;
        }
    }
    value.parse::<f64>().unwrap_or(0.0)
}

/// Effective canvas size of the root: `width`/`height` when both are
/// positive, otherwise the `viewBox` extent.
pub fn canvas_size(root: &Element) -> Option<(f64, f64)> {
    let width = root.attr("width").map(parse_dimension).unwrap_or(0.0);
    let height = root.attr("height").map(parse_dimension).unwrap_or(0.0);
    if width > 0.0 && height > 0.0 {
        return Some((width, height));
    }

    let view_box: Vec<f64> = root
        .attr("viewBox")?
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(parse_dimension)
        .collect();

    match view_box[..] {
        [_, _, w, h] if w > 0.0 && h > 0.0 => Some((w, h)),
        _ => None,
    }
}

/// True if `element` is a `rect` at least as large as the canvas.
pub(crate) fn covers_canvas(element: &Element, canvas: (f64, f64)) -> bool {
    if element.tag() != "rect" {
        return false;
    }
    let width = element.attr("width").map(parse_dimension).unwrap_or(0.0);
    let height = element.attr("height").map(parse_dimension).unwrap_or(0.0);
    width >= canvas.0 && height >= canvas.1
}
