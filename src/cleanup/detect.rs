use regex::Regex;
use std::sync::OnceLock;

use crate::svg::Document;

const MARKER: &str = "matplotlib";

fn canonical_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(figure|axes|patch)_\d+$").expect("id pattern is valid"))
}

fn has_marker(text: &str) -> bool {
    text.to_lowercase().contains(MARKER)
}

/// Heuristic check for matplotlib output.
///
/// Matches a `creator`/`generator` metadata element naming matplotlib,
/// matplotlib's element id scheme (`figure_1`, `axes_1`, `patch_1`,
/// `matplotlib.*`), or a comment mentioning matplotlib anywhere in the file.
pub fn is_generated_by_matplotlib(doc: &Document) -> bool {
    let by_metadata = || {
        doc.root
            .descendants()
            .filter(|e| matches!(e.tag(), "creator" | "generator"))
            .any(|e| has_marker(&e.deep_text()))
    };

    let by_ids = || {
        doc.root.descendants().filter_map(|e| e.attr("id")).any(|id| {
            canonical_id().is_match(id) || id.starts_with("matplotlib.")
        })
    };

    by_metadata() || by_ids() || doc.any_comment(has_marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(svg: &str) -> bool {
        is_generated_by_matplotlib(&Document::parse(svg).unwrap())
    }

    #[test]
    fn test_detects_dublin_core_creator() {
        assert!(detect(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:cc="http://creativecommons.org/ns#">
  <metadata><cc:Work><dc:creator><cc:Agent><dc:title>Matplotlib v3.8.0, https://matplotlib.org/</dc:title></cc:Agent></dc:creator></cc:Work></metadata>
</svg>"#
        ));
    }

    #[test]
    fn test_detects_generator_element() {
        assert!(detect(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><metadata><generator>matplotlib</generator></metadata></svg>"#
        ));
    }

    #[test]
    fn test_detects_id_scheme() {
        assert!(detect(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="axes_1"><rect/></g></svg>"#
        ));
        assert!(detect(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="matplotlib.axis_1"/></svg>"#
        ));
    }

    #[test]
    fn test_id_must_match_whole_pattern() {
        assert!(!detect(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="my_figure_1"/><g id="axes_x"/></svg>"#
        ));
    }

    #[test]
    fn test_detects_nested_comment() {
        assert!(detect(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><g><!-- Created with Matplotlib --></g></svg>"#
        ));
    }

    #[test]
    fn test_plain_document_is_not_detected() {
        assert!(!detect(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="5" height="5" fill="red"/><text>plot</text></svg>"#
        ));
    }

    #[test]
    fn test_other_creator_is_not_detected() {
        assert!(!detect(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><metadata><creator>Inkscape</creator></metadata></svg>"#
        ));
    }
}
