//! Inline `style` attribute declarations
//!
//! A `style` value is a `;`-separated list of `property:value` pairs.
//! Property names compare case-insensitively. Empty and malformed fragments
//! are dropped on parse.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    declarations: Vec<(String, String)>,
}

impl Style {
    pub fn parse(text: &str) -> Self {
        let declarations = text
            .split(';')
            .filter_map(|decl| {
                let (name, value) = decl.split_once(':')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((name.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { declarations }
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// First declared value of `property`.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    /// Replace the first declaration of `property` (dropping later
    /// duplicates) or append a new one.
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        let mut seen = false;
        self.declarations.retain_mut(|(name, existing)| {
            if !name.eq_ignore_ascii_case(property) {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            *existing = value.clone();
            true
        });
        if !seen {
            self.declarations.push((property.to_string(), value));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.declarations
            .iter_mut()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{name}:{value}")?;
        }
        Ok(())
    }
}
