use figure_color::Palette;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::TemplateError;

/// Templates keyed by id, as stored in styles.json
pub type TemplateSet = BTreeMap<String, Template>;

/// A publication style
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub fonts: FontRoles,
    pub colors: ColorSpec,
    #[serde(default)]
    pub axes: AxesSpec,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FontRoles {
    pub title: FontSpec,
    pub label: FontSpec,
    pub tick: FontSpec,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FontSpec {
    pub family: String,
    /// Point size
    pub size: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ColorSpec {
    pub palette: Vec<String>,
    /// `none` or a hex color
    #[serde(default = "default_background")]
    pub background: String,
}

fn default_background() -> String {
    "none".to_string()
}

/// Axis styling hints carried for reporting
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AxesSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_direction: Option<String>,
}

fn hex_color() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#[0-9a-fA-F]{3}$|^#[0-9a-fA-F]{6}$").expect("hex pattern is valid")
    })
}

impl Template {
    /// Check palette and background colors.
    pub fn validate(&self, id: &str) -> Result<(), TemplateError> {
        let background = (self.colors.background != "none").then_some(&self.colors.background);
        for color in self.colors.palette.iter().chain(background) {
            if !hex_color().is_match(color) {
                return Err(TemplateError::InvalidPalette {
                    id: id.to_string(),
                    color: color.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn palette(&self) -> Palette {
        Palette::new(&self.colors.palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "name": "Sample",
        "description": "A test style",
        "fonts": {
            "title": {"family": "Arial", "size": 8},
            "label": {"family": "Arial", "size": 7},
            "tick": {"family": "Arial", "size": 6}
        },
        "colors": {"palette": ["#e64b35", "#4DBBD5", "#00a087", "#3c5488"]}
    }"##;

    #[test]
    fn test_deserialize_with_defaults() {
        let template: Template = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(template.name, "Sample");
        assert_eq!(template.fonts.title.size, 8.0);
        assert_eq!(template.colors.background, "none");
        assert_eq!(template.axes, AxesSpec::default());
        assert!(template.validate("sample").is_ok());
    }

    #[test]
    fn test_palette_is_canonical() {
        let template: Template = serde_json::from_str(SAMPLE).unwrap();
        let palette = template.palette();
        assert_eq!(palette.len(), 4);
        assert_eq!(palette.hex(1), "#4dbbd5");
    }

    #[test]
    fn test_validate_rejects_bad_color() {
        let mut template: Template = serde_json::from_str(SAMPLE).unwrap();
        template.colors.palette.push("blue".to_string());
        let err = template.validate("sample").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid palette color in template 'sample': blue"
        );

        template.colors.palette.pop();
        template.colors.background = "#fffff".to_string();
        assert!(template.validate("sample").is_err());
    }
}
