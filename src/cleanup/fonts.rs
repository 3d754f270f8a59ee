use regex::Regex;
use std::sync::OnceLock;

use crate::svg::{Element, Style};

pub const SANS_STACK: &str = "Arial, Helvetica, sans-serif";
pub const SERIF_STACK: &str = "Times New Roman, Times, serif";
pub const MONO_STACK: &str = "Courier New, Courier, monospace";

/// A DejaVu family name, optionally quoted. `Sans Mono` is tried before
/// `Sans` so the longer name wins.
fn dejavu_family() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)['"]?dejavu\s+(sans\s+mono|serif|sans)['"]?"#)
            .expect("font pattern is valid")
    })
}

fn portable_stack(variant: &str) -> &'static str {
    let variant = variant.to_lowercase();
    if variant.starts_with("sans") && variant.ends_with("mono") {
        MONO_STACK
    } else if variant == "serif" {
        SERIF_STACK
    } else {
        SANS_STACK
    }
}

/// Replace a `font-family` value naming a DejaVu family with its stack.
fn normalize_family(value: &str) -> Option<String> {
    let caps = dejavu_family().captures(value)?;
    Some(portable_stack(&caps[1]).to_string())
}

/// Replace the family part of a `font` shorthand. The family list is the
/// tail of the shorthand, so everything from the DejaVu name on is swapped.
fn normalize_shorthand(value: &str) -> Option<String> {
    let caps = dejavu_family().captures(value)?;
    let start = caps.get(0)?.start();
    Some(format!("{}{}", &value[..start], portable_stack(&caps[1])))
}

fn normalize_element(element: &mut Element) -> bool {
    let mut changed = false;

    if let Some(raw) = element.attr("style") {
        let mut style = Style::parse(raw);
        let mut style_changed = false;
        for (property, value) in style.iter_mut() {
            let replacement = if property.eq_ignore_ascii_case("font-family") {
                normalize_family(value)
            } else if property.eq_ignore_ascii_case("font") {
                normalize_shorthand(value)
            } else {
                None
            };
            if let Some(replacement) = replacement {
                *value = replacement;
                style_changed = true;
            }
        }
        if style_changed {
            element.set_attr("style", style.to_string());
            changed = true;
        }
    }

    if let Some(replacement) = element.attr("font-family").and_then(normalize_family) {
        element.set_attr("font-family", replacement);
        changed = true;
    }

    changed
}

/// Rewrite DejaVu font references to portable stacks. Returns the number of
/// elements changed.
pub fn normalize_fonts(root: &mut Element) -> usize {
    let mut changed = 0;
    root.walk_mut(&mut |e| {
        if normalize_element(e) {
            changed += 1;
        }
    });
    changed
}
