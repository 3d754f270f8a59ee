use figure_color::ColorMapping;
use serde::Serialize;

use crate::analysis::normalize_color;
use crate::assets::AssetLoader;
use crate::cleanup::background::resolved_fill;
use crate::cleanup::dimension::{canvas_size, covers_canvas};
use crate::error::TemplateError;
use crate::models::{Template, TemplateSet};
use crate::svg::{Document, Element, Style};

/// Paint properties rewritten by a color map
const MAPPED_PROPERTIES: [&str; 3] = ["fill", "stroke", "stop-color"];

/// Options for [`TemplateService::apply`]
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    pub apply_fonts: bool,
    /// Gates both the color map and the background pass
    pub apply_colors: bool,
    /// Source color to palette color
    pub color_map: ColorMapping,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            apply_fonts: true,
            apply_colors: true,
            color_map: ColorMapping::new(),
        }
    }
}

/// Template listing entry
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub palette: Vec<String>,
}

/// Publication templates loaded from styles.json
pub struct TemplateService {
    templates: TemplateSet,
}

impl TemplateService {
    /// Load templates through the asset loader (embedded or `TEMPLATES_FILE`)
    pub fn load(loader: &AssetLoader) -> Result<Self, TemplateError> {
        let json = loader.read_templates_string()?;
        let service = Self::from_json(&json)?;
        tracing::info!(templates = service.templates.len(), "Template service initialized");
        Ok(service)
    }

    /// Parse and validate a styles.json document
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let templates: TemplateSet = serde_json::from_str(json)?;
        for (id, template) in &templates {
            template.validate(id)?;
        }
        Ok(Self { templates })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn list(&self) -> Vec<TemplateSummary> {
        self.templates
            .iter()
            .map(|(id, t)| TemplateSummary {
                id: id.clone(),
                name: t.name.clone(),
                description: t.description.clone(),
                palette: t.colors.palette.clone(),
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Result<&Template, TemplateError> {
        self.templates.get(id).ok_or_else(|| TemplateError::NotFound {
            id: id.to_string(),
            available: self.ids().collect::<Vec<_>>().join(", "),
        })
    }

    /// Apply `template` to `doc` in place. Returns the number of modified
    /// elements summed over the font, color map and background passes.
    pub fn apply(doc: &mut Document, template: &Template, options: &ApplyOptions) -> usize {
        let mut modified = 0;

        if options.apply_fonts {
            modified += apply_fonts(&mut doc.root, &template.fonts.title.family);
        }

        if options.apply_colors {
            if !options.color_map.is_empty() {
                modified += apply_color_map(&mut doc.root, &options.color_map);
            }
            modified += apply_background(&mut doc.root, &template.colors.background);
        }

        modified
    }
}

/// Set the family on every `text`/`tspan` that declares one inline.
fn apply_fonts(root: &mut Element, family: &str) -> usize {
    let mut modified = 0;
    root.walk_mut(&mut |e| {
        if !matches!(e.tag(), "text" | "tspan") {
            return;
        }
        let Some(raw) = e.attr("style") else { return };
        let mut style = Style::parse(raw);
        if style.get("font-family").is_none_or(|f| f == family) {
            return;
        }
        style.set("font-family", family);
        e.set_attr("style", style.to_string());
        modified += 1;
    });
    modified
}

fn mapped<'a>(map: &'a ColorMapping, raw: &str) -> Option<&'a String> {
    normalize_color(raw).and_then(|color| map.get(&color))
}

/// Rewrite mapped paint colors in inline styles and attributes.
fn apply_color_map(root: &mut Element, raw_map: &ColorMapping) -> usize {
    // keys may arrive in any notation the normalizer accepts
    let map: ColorMapping = raw_map
        .iter()
        .filter_map(|(from, to)| Some((normalize_color(from)?, to.clone())))
        .collect();

    let mut modified = 0;
    root.walk_mut(&mut |e| {
        let mut changed = false;

        if let Some(raw) = e.attr("style") {
            let mut style = Style::parse(raw);
            let mut style_changed = false;
            for (property, value) in style.iter_mut() {
                if !MAPPED_PROPERTIES.iter().any(|p| property.eq_ignore_ascii_case(p)) {
                    continue;
                }
                if let Some(to) = mapped(&map, value) {
                    *value = to.clone();
                    style_changed = true;
                }
            }
            if style_changed {
                e.set_attr("style", style.to_string());
                changed = true;
            }
        }

        for property in MAPPED_PROPERTIES {
            if let Some(to) = e.attr(property).and_then(|v| mapped(&map, v)) {
                let to = to.clone();
                e.set_attr(property, to);
                changed = true;
            }
        }

        if changed {
            modified += 1;
        }
    });
    modified
}

/// Make full-canvas filled rects transparent (`none`) or recolor them.
fn apply_background(root: &mut Element, background: &str) -> usize {
    let Some(canvas) = canvas_size(root) else {
        return 0;
    };
    let transparent = background.eq_ignore_ascii_case("none");

    let mut modified = 0;
    root.walk_mut(&mut |e| {
        if !covers_canvas(e, canvas) {
            return;
        }
        let mut style = e.attr("style").map(Style::parse).unwrap_or_default();
        let has_fill = style.contains("fill") || e.attr("fill").is_some();
        if !has_fill {
            return;
        }

        let before = style.clone();
        if transparent {
            if resolved_fill(e).is_none() && style.get("stroke").is_none_or(|s| s == "none") {
                return;
            }
            style.set("fill", "none");
            style.set("stroke", "none");
        } else {
            if resolved_fill(e) == normalize_color(background) {
                return;
            }
            style.set("fill", background);
        }

        if style != before {
            e.set_attr("style", style.to_string());
            modified += 1;
        }
    });
    modified
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn service() -> TemplateService {
        TemplateService::load(&AssetLoader::new(None, None)).unwrap()
    }

    #[test]
    fn test_builtin_templates() {
        let service = service();
        let ids: Vec<&str> = service.ids().collect();
        assert_eq!(ids, ["colorblind_safe", "elsevier", "ieee", "nature", "science"]);

        for summary in service.list() {
            assert!(summary.palette.len() >= 4, "{} palette too small", summary.id);
            assert!(summary.palette.iter().all(|c| c.starts_with('#')));
        }
    }

    #[test]
    fn test_get_unknown_lists_available() {
        let service = service();
        let err = service.get("cell").unwrap_err();
        assert!(err.to_string().contains("Template 'cell' not found"));
        assert!(err.to_string().contains("nature"));
    }

    #[test]
    fn test_from_json_rejects_invalid_palette() {
        let json = r##"{"bad": {"name": "Bad", "fonts": {
            "title": {"family": "A", "size": 1}, "label": {"family": "A", "size": 1},
            "tick": {"family": "A", "size": 1}},
            "colors": {"palette": ["#zzzzzz"]}}}"##;
        assert!(matches!(
            TemplateService::from_json(json),
            Err(TemplateError::InvalidPalette { .. })
        ));
        assert!(matches!(
            TemplateService::from_json("not json"),
            Err(TemplateError::Parse(_))
        ));
    }

    #[test]
    fn test_apply_fonts_only_touches_declared_families() {
        let mut doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <text style="font-family:DejaVu Sans;font-size:10px">a<tspan style="font-family:Arial, Helvetica, sans-serif">b</tspan></text>
  <text style="font-size:10px">c</text>
  <rect style="font-family:Courier"/>
</svg>"#,
        )
        .unwrap();
        let template = service().get("nature").unwrap().clone();
        let options = ApplyOptions {
            apply_colors: false,
            ..Default::default()
        };

        assert_eq!(TemplateService::apply(&mut doc, &template, &options), 1);
        let first = doc.root.descendants().find(|e| e.tag() == "text").unwrap();
        assert_eq!(
            first.attr("style"),
            Some("font-family:Arial, Helvetica, sans-serif;font-size:10px")
        );
    }

    #[test]
    fn test_apply_color_map() {
        let mut doc = Document::parse(
            r##"<svg xmlns="http://www.w3.org/2000/svg">
  <path style="fill:none;stroke:#1F77B4"/>
  <circle fill="rgb(31,119,180)" stroke="#1f77b4"/>
  <stop stop-color="#ff7f0e"/>
  <path style="stroke:#2ca02c"/>
</svg>"##,
        )
        .unwrap();
        let template = service().get("nature").unwrap().clone();
        let options = ApplyOptions {
            apply_fonts: false,
            apply_colors: true,
            color_map: ColorMapping::from([
                ("#1f77b4".to_string(), "#4dbbd5".to_string()),
                ("#FF7F0E".to_string(), "#e64b35".to_string()),
            ]),
        };

        assert_eq!(TemplateService::apply(&mut doc, &template, &options), 3);
        let elements: Vec<&Element> = doc.root.child_elements().collect();
        assert_eq!(elements[0].attr("style"), Some("fill:none;stroke:#4dbbd5"));
        assert_eq!(elements[1].attr("fill"), Some("#4dbbd5"));
        assert_eq!(elements[1].attr("stroke"), Some("#4dbbd5"));
        assert_eq!(elements[2].attr("stop-color"), Some("#e64b35"));
        assert_eq!(elements[3].attr("style"), Some("stroke:#2ca02c"));
    }

    #[test]
    fn test_apply_transparent_background() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="640" height="480">
  <rect width="640" height="480" style="fill:#ffffff;stroke:#ffffff"/>
  <rect width="100" height="100" style="fill:#ffffff"/>
</svg>"##;
        let mut doc = Document::parse(svg).unwrap();
        let template = service().get("nature").unwrap().clone();
        let options = ApplyOptions {
            apply_fonts: false,
            ..Default::default()
        };

        assert_eq!(TemplateService::apply(&mut doc, &template, &options), 1);
        let rects: Vec<&Element> = doc.root.child_elements().collect();
        assert_eq!(rects[0].attr("style"), Some("fill:none;stroke:none"));
        assert_eq!(rects[1].attr("style"), Some("fill:#ffffff"));

        assert_eq!(TemplateService::apply(&mut doc, &template, &options), 0);
    }

    #[test]
    fn test_apply_colored_background() {
        let mut doc = Document::parse(
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10">
  <rect width="10" height="10" fill="#eeeeee"/>
</svg>"##,
        )
        .unwrap();
        let template = service().get("elsevier").unwrap().clone();

        assert_eq!(
            TemplateService::apply(&mut doc, &template, &ApplyOptions::default()),
            1
        );
        let rect = doc.root.child_elements().next().unwrap();
        assert_eq!(rect.attr("style"), Some("fill:#ffffff"));
    }
}
