//! Scratch workspace factory for integration tests.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use figpolish::assets::AssetLoader;
use figpolish::rendering::SvgRenderer;
use figpolish::services::{BatchService, TemplateService};

/// A temporary input directory plus a batch service over the embedded
/// templates
pub struct TestWorkspace {
    dir: TempDir,
    pub service: BatchService,
}

impl TestWorkspace {
    /// Create an empty workspace using embedded assets
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let loader = AssetLoader::new(None, None);
        let templates = TemplateService::load(&loader).expect("Embedded templates must load");
        let service = BatchService::new(templates, SvgRenderer::new());
        Self { dir, service }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Input directory as the `&str` form the batch API takes
    pub fn input(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    /// Write `content` to `name` inside the workspace
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }
}
