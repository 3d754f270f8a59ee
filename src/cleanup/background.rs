use super::dimension::{canvas_size, covers_canvas};
use super::stylesheet::{cascaded_value, collect_rules, Rule};
use crate::analysis::normalize_color;
use crate::svg::{Element, Style};

const WHITE: &str = "#ffffff";

/// Fill of an element: inline style first, then the `fill` attribute.
pub(crate) fn resolved_fill(element: &Element) -> Option<String> {
    resolved_fill_with(element, &[])
}

/// Like [`resolved_fill`], with stylesheet rules ranked between the inline
/// style and the attribute.
fn resolved_fill_with(element: &Element, rules: &[Rule]) -> Option<String> {
    let style = element.attr("style").map(Style::parse);
    style
        .as_ref()
        .and_then(|s| s.get("fill"))
        .or_else(|| cascaded_value(element, rules, "fill"))
        .or_else(|| element.attr("fill"))
        .and_then(normalize_color)
}

/// Remove white rectangles that cover the whole canvas.
///
/// Fills set by `<style>` blocks count, so the result does not depend on
/// whether the blocks were inlined yet. Nothing is removed when the canvas
/// size cannot be determined.
pub fn remove_background_rects(root: &mut Element) -> usize {
    let Some(canvas) = canvas_size(root) else {
        return 0;
    };
    let rules = collect_rules(root);

    root.remove_descendants(&mut |e| {
        covers_canvas(e, canvas) && resolved_fill_with(e, &rules).as_deref() == Some(WHITE)
    })
}
