//! Asset loading with embedded fallbacks
//!
//! Templates (styles.json) and the default config.yaml are compiled into the
//! binary. Each can be overridden from the filesystem:
//!
//! - If an env var is NOT set: use embedded assets only (no filesystem access)
//! - If an env var IS set and the file is missing: seed it with the embedded copy
//! - If an env var IS set and the file exists: use it

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded publication templates
#[derive(RustEmbed)]
#[folder = "templates/"]
#[include = "*.json"]
struct EmbeddedTemplates;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

const TEMPLATES_NAME: &str = "styles.json";
const CONFIG_NAME: &str = "config.yaml";

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Templates,
    Config,
}

impl AssetCategory {
    fn embedded(self) -> Option<Cow<'static, [u8]>> {
        match self {
            Self::Templates => EmbeddedTemplates::get(TEMPLATES_NAME).map(|f| f.data),
            Self::Config => EmbeddedConfig::get(CONFIG_NAME).map(|f| f.data),
        }
    }

    fn default_path(self) -> PathBuf {
        match self {
            Self::Templates => PathBuf::from("./templates").join(TEMPLATES_NAME),
            Self::Config => PathBuf::from("./").join(CONFIG_NAME),
        }
    }
}

/// Report of seeding operations
#[derive(Debug, Default)]
pub struct SeedReport {
    pub templates_seeded: bool,
    pub config_seeded: bool,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        !self.templates_seeded && !self.config_seeded
    }
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override
pub struct AssetLoader {
    /// External templates file (from TEMPLATES_FILE env var)
    templates_file: Option<PathBuf>,
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the corresponding env var was set.
    /// If `None`, embedded assets are used exclusively.
    pub fn new(templates_file: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            templates_file,
            config_file,
        }
    }

    /// Build a loader from `TEMPLATES_FILE` and `CONFIG_FILE`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("TEMPLATES_FILE").ok().map(PathBuf::from),
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from),
        )
    }

    fn configured_path(&self, category: AssetCategory) -> Option<&Path> {
        match category {
            AssetCategory::Templates => self.templates_file.as_deref(),
            AssetCategory::Config => self.config_file.as_deref(),
        }
    }

    /// Read an asset, preferring the external file when configured and present.
    fn read(&self, category: AssetCategory) -> io::Result<Cow<'static, [u8]>> {
        if let Some(path) = self.configured_path(category) {
            if path.exists() {
                tracing::trace!(path = %path.display(), ?category, "Loading asset from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        category.embedded().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("Embedded {category:?} asset not found"),
            )
        })
    }

    fn read_string(&self, category: AssetCategory) -> io::Result<String> {
        let bytes = self.read(category)?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Read the templates JSON
    pub fn read_templates_string(&self) -> io::Result<String> {
        self.read_string(AssetCategory::Templates)
    }

    /// Read the config YAML
    pub fn read_config_string(&self) -> io::Result<String> {
        self.read_string(AssetCategory::Config)
    }

    fn write_embedded(category: AssetCategory, path: &Path) -> io::Result<bool> {
        let Some(data) = category.embedded() else {
            return Ok(false);
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &*data)?;
        Ok(true)
    }

    /// Seed missing configured files with the embedded defaults
    ///
    /// Only operates on paths that were configured (env var was set).
    pub fn seed_if_configured(&self) -> io::Result<SeedReport> {
        let mut report = SeedReport::default();

        for category in [AssetCategory::Templates, AssetCategory::Config] {
            let Some(path) = self.configured_path(category) else {
                continue;
            };
            if path.exists() {
                continue;
            }
            let seeded = Self::write_embedded(category, path)?;
            if seeded {
                tracing::info!(path = %path.display(), ?category, "Seeded file with embedded default");
            }
            match category {
                AssetCategory::Templates => report.templates_seeded = seeded,
                AssetCategory::Config => report.config_seeded = seeded,
            }
        }

        Ok(report)
    }

    /// Extract embedded assets to filesystem (init command)
    ///
    /// Uses the configured paths (or defaults if not set).
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for &category in categories {
            let path = self
                .configured_path(category)
                .map(Path::to_path_buf)
                .unwrap_or_else(|| category.default_path());

            if !force && path.exists() {
                report.skipped.push(path.display().to_string());
                continue;
            }
            if Self::write_embedded(category, &path)? {
                report.written.push(path.display().to_string());
            }
        }

        Ok(report)
    }

    /// List embedded assets by category (for display)
    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Templates => EmbeddedTemplates::iter().map(|s| s.to_string()).collect(),
            AssetCategory::Config => vec![CONFIG_NAME.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_assets_present() {
        let loader = AssetLoader::new(None, None);
        assert!(loader.read_templates_string().unwrap().contains("\"nature\""));
        assert!(loader.read_config_string().unwrap().contains("default_template"));
        assert_eq!(
            AssetLoader::list_embedded(AssetCategory::Templates),
            vec!["styles.json".to_string()]
        );
    }

    #[test]
    fn test_external_file_overrides_embedded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "default_template: ieee\n").unwrap();

        let loader = AssetLoader::new(None, Some(path));
        assert_eq!(loader.read_config_string().unwrap(), "default_template: ieee\n");
    }

    #[test]
    fn test_missing_external_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let loader = AssetLoader::new(Some(dir.path().join("nope.json")), None);
        assert!(loader.read_templates_string().unwrap().contains("colorblind_safe"));
    }

    #[test]
    fn test_seed_only_configured_and_missing() {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("t/styles.json");
        let loader = AssetLoader::new(Some(templates.clone()), None);

        let report = loader.seed_if_configured().unwrap();
        assert!(report.templates_seeded);
        assert!(!report.config_seeded);
        assert!(templates.exists());

        let report = loader.seed_if_configured().unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_init_skips_existing_unless_forced() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.yaml");
        fs::write(&config, "x: 1\n").unwrap();
        let loader = AssetLoader::new(None, Some(config.clone()));

        let report = loader.init(&[AssetCategory::Config], false).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert!(report.written.is_empty());

        let report = loader.init(&[AssetCategory::Config], true).unwrap();
        assert_eq!(report.written.len(), 1);
        assert!(fs::read_to_string(&config).unwrap().contains("default_template"));
    }
}
