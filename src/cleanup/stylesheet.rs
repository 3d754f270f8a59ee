//! Embedded `<style>` block inlining and removal
//!
//! Only simple selectors are understood: `*`, `tag`, `.class` and `#id`,
//! optionally in comma-separated lists. Rules are applied in source order,
//! later rules winning, and never override a declaration the element
//! already carries inline. Anything else in the block (at-rules,
//! combinators, pseudo-classes) is dropped with it.

use regex::Regex;
use std::sync::OnceLock;

use crate::svg::{Element, Style};

/// Elements the universal selector is applied to.
const UNIVERSAL_TARGETS: &[&str] = &[
    "path", "rect", "circle", "ellipse", "line", "polyline", "polygon", "text", "tspan", "use",
];

#[derive(Debug, Clone, PartialEq)]
enum Selector {
    Universal,
    Type(String),
    Class(String),
    Id(String),
}

impl Selector {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let is_ident = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };

        if text == "*" {
            Some(Self::Universal)
        } else if let Some(class) = text.strip_prefix('.') {
            is_ident(class).then(|| Self::Class(class.to_string()))
        } else if let Some(id) = text.strip_prefix('#') {
            is_ident(id).then(|| Self::Id(id.to_string()))
        } else {
            is_ident(text).then(|| Self::Type(text.to_string()))
        }
    }

    fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Universal => UNIVERSAL_TARGETS.contains(&element.tag()),
            Self::Type(tag) => element.tag() == tag,
            Self::Class(class) => element
                .attr("class")
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
            Self::Id(id) => element.attr("id") == Some(id.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Rule {
    selectors: Vec<Selector>,
    declarations: Style,
}

fn css_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern is valid"))
}

/// Split a stylesheet into simple-selector rules.
fn parse_rules(css: &str) -> Vec<Rule> {
    let css = css_comment().replace_all(css, "");
    let mut rules = Vec::new();
    let mut rest = css.as_ref();

    while let Some(open) = rest.find('{') {
        // block-less statements such as `@import url(x.css);` end at `;`
        let prelude = rest[..open].trim();
        let prelude = match prelude.rfind(';') {
            Some(end) => prelude[end + 1..].trim(),
            None => prelude,
        };

        // find the matching close brace, stepping over nested at-rule blocks
        let mut depth = 0usize;
        let mut close = None;
        for (i, c) in rest[open..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(close) = close else { break };
        let body = &rest[open + 1..close];
        rest = &rest[close + 1..];

        if prelude.starts_with('@') {
            continue;
        }

        let selectors: Vec<Selector> = prelude.split(',').filter_map(Selector::parse).collect();
        let declarations = Style::parse(body);
        if !selectors.is_empty() && !declarations.is_empty() {
            rules.push(Rule {
                selectors,
                declarations,
            });
        }
    }

    rules
}

fn apply_rules(element: &mut Element, rules: &[Rule]) {
    if element.tag() == "style" {
        return;
    }

    let mut cascaded = Style::default();
    for rule in rules {
        if rule.selectors.iter().any(|s| s.matches(element)) {
            for (property, value) in rule.declarations.iter() {
                cascaded.set(property, value);
            }
        }
    }
    if cascaded.is_empty() {
        return;
    }

    let mut style = element.attr("style").map(Style::parse).unwrap_or_default();
    let mut changed = false;
    for (property, value) in cascaded.iter() {
        if !style.contains(property) {
            style.set(property, value);
            changed = true;
        }
    }
    if changed {
        element.set_attr("style", style.to_string());
    }
}

/// Rules of every `<style>` element in the subtree, in document order.
pub(crate) fn collect_rules(root: &Element) -> Vec<Rule> {
    root.descendants()
        .filter(|e| e.tag() == "style")
        .flat_map(|e| parse_rules(&e.deep_text()))
        .collect()
}

/// The value inlining would give `property` on `element`, ignoring what
/// the element declares itself.
pub(crate) fn cascaded_value<'a>(
    element: &Element,
    rules: &'a [Rule],
    property: &str,
) -> Option<&'a str> {
    rules
        .iter()
        .filter(|rule| rule.selectors.iter().any(|s| s.matches(element)))
        .flat_map(|rule| rule.declarations.iter())
        .filter(|(name, _)| name.eq_ignore_ascii_case(property))
        .last()
        .map(|(_, value)| value)
}

/// Inline the rules of every `<style>` element, then remove the blocks.
/// Returns the number of blocks removed.
pub fn inline_and_remove_style_blocks(root: &mut Element) -> usize {
    let rules = collect_rules(root);

    if !rules.is_empty() {
        tracing::debug!(rules = rules.len(), "Inlining stylesheet rules");
        root.walk_mut(&mut |e| apply_rules(e, &rules));
    }

    root.remove_descendants(&mut |e| e.tag() == "style")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::Document;
    use pretty_assertions::assert_eq;

    fn find<'a>(root: &'a Element, id: &str) -> &'a Element {
        root.descendants()
            .find(|e| e.attr("id") == Some(id))
            .unwrap()
    }

    #[test]
    fn test_parse_rules_skips_comments_and_at_rules() {
        let rules = parse_rules(
            "/* header */ * { stroke-linecap: butt } @media print { rect { fill: red } } \
             g > path { fill: blue } .a, #b, text, p:hover { fill: green }",
        );
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].selectors, vec![Selector::Universal]);
        assert_eq!(
            rules[1].selectors,
            vec![
                Selector::Class("a".to_string()),
                Selector::Id("b".to_string()),
                Selector::Type("text".to_string()),
            ]
        );
    }

    #[test]
    fn test_statement_at_rules_do_not_swallow_next_rule() {
        let rules = parse_rules(r#"@charset "utf-8"; @import url(x.css); rect { fill: red }"#);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].selectors, vec![Selector::Type("rect".to_string())]);

        let mut doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <style>@import url(x.css); rect { fill: red }</style>
  <rect id="r"/>
</svg>"#,
        )
        .unwrap();
        assert_eq!(inline_and_remove_style_blocks(&mut doc.root), 1);
        assert_eq!(find(&doc.root, "r").attr("style"), Some("fill:red"));
    }

    #[test]
    fn test_cascaded_value_last_match_wins() {
        let doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <style>rect { fill: red; stroke: black } .bg { fill: white } circle { fill: blue }</style>
  <rect id="r" class="bg" fill="green"/>
</svg>"#,
        )
        .unwrap();
        let rules = collect_rules(&doc.root);
        let rect = find(&doc.root, "r");
        assert_eq!(cascaded_value(rect, &rules, "fill"), Some("white"));
        assert_eq!(cascaded_value(rect, &rules, "STROKE"), Some("black"));
        assert_eq!(cascaded_value(rect, &rules, "opacity"), None);
    }

    #[test]
    fn test_inlines_matplotlib_block() {
        let mut doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <defs><style type="text/css">*{stroke-linecap:butt;stroke-linejoin:round;}
.DejaVu{font-family: DejaVu Sans}</style></defs>
  <g id="g"><path id="p" d="M0 0" style="stroke-linejoin:miter"/></g>
  <text id="t" class="DejaVu">x</text>
</svg>"#,
        )
        .unwrap();

        let removed = inline_and_remove_style_blocks(&mut doc.root);
        assert_eq!(removed, 1);
        assert!(doc.root.descendants().all(|e| e.tag() != "style"));

        assert_eq!(
            find(&doc.root, "p").attr("style"),
            Some("stroke-linejoin:miter;stroke-linecap:butt")
        );
        assert_eq!(
            find(&doc.root, "t").attr("style"),
            Some("stroke-linecap:butt;stroke-linejoin:round;font-family:DejaVu Sans")
        );
        // universal rules skip containers
        assert_eq!(find(&doc.root, "g").attr("style"), None);
    }

    #[test]
    fn test_later_rules_win() {
        let mut doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <style>rect { fill: red } #r { fill: blue }</style>
  <rect id="r"/>
</svg>"#,
        )
        .unwrap();
        inline_and_remove_style_blocks(&mut doc.root);
        assert_eq!(find(&doc.root, "r").attr("style"), Some("fill:blue"));
    }

    #[test]
    fn test_counts_each_block_and_is_idempotent() {
        let mut doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><style/><g><style>@import url(x.css);</style></g></svg>"#,
        )
        .unwrap();
        assert_eq!(inline_and_remove_style_blocks(&mut doc.root), 2);
        assert_eq!(inline_and_remove_style_blocks(&mut doc.root), 0);
    }
}
