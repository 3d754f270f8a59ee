use crate::assets::AssetLoader;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for improved figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Svg,
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unknown export format '{other}' (expected svg, png or pdf)")),
        }
    }
}

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Template used when none is given on the command line
    #[serde(default = "default_template")]
    pub default_template: String,

    #[serde(default)]
    pub export_format: ExportFormat,

    /// Name of the output directory created next to the inputs
    #[serde(default = "default_output_dir_name")]
    pub output_dir_name: String,

    /// Remap data colors onto the template palette
    #[serde(default = "default_true")]
    pub auto_color: bool,

    /// Force matplotlib cleanup even when detection fails
    #[serde(default)]
    pub cleanup_matplotlib: bool,

    /// Raster scale for PNG export
    #[serde(default = "default_png_scale")]
    pub png_scale: f32,

    #[serde(default)]
    pub watch: WatchConfig,
}

fn default_template() -> String {
    "nature".to_string()
}

fn default_output_dir_name() -> String {
    "improved".to_string()
}

fn default_true() -> bool {
    true
}

fn default_png_scale() -> f32 {
    2.0
}

/// Watch mode settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WatchConfig {
    /// Quiet period before a burst of changes is processed
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Stop watching after this many seconds (0 = until Ctrl-C)
    #[serde(default)]
    pub duration_secs: u64,
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            duration_secs: 0,
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        template = %config.default_template,
                        format = %config.export_format,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_template: default_template(),
            export_format: ExportFormat::default(),
            output_dir_name: default_output_dir_name(),
            auto_color: true,
            cleanup_matplotlib: false,
            png_scale: default_png_scale(),
            watch: WatchConfig::default(),
        }
    }
}
