pub mod config;
pub mod template;

pub use config::{AppConfig, ExportFormat, WatchConfig};
pub use template::{AxesSpec, ColorSpec, FontRoles, FontSpec, Template, TemplateSet};
