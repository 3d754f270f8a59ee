//! Matplotlib artifact detection and cleanup
//!
//! Cleanup runs three passes in order and sums their counts:
//!
//! 1. full-canvas white background rects are removed
//! 2. `<style>` blocks are inlined onto matching elements and removed
//! 3. DejaVu font references are rewritten to portable stacks
//!
//! Each pass is idempotent, so cleaning an already-cleaned document
//! reports zero modifications.

pub mod background;
pub mod detect;
pub mod dimension;
pub mod fonts;
pub mod stylesheet;

use serde::Serialize;

use crate::svg::Document;

pub use background::remove_background_rects;
pub use detect::is_generated_by_matplotlib;
pub use dimension::{canvas_size, parse_dimension};
pub use fonts::normalize_fonts;
pub use stylesheet::inline_and_remove_style_blocks;

/// Per-pass modification counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub backgrounds_removed: usize,
    pub style_blocks_removed: usize,
    pub fonts_normalized: usize,
}

impl CleanupReport {
    pub fn total(&self) -> usize {
        self.backgrounds_removed + self.style_blocks_removed + self.fonts_normalized
    }
}

/// Run all cleanup passes on `doc` in place.
pub fn cleanup_matplotlib_report(doc: &mut Document) -> CleanupReport {
    let report = CleanupReport {
        backgrounds_removed: remove_background_rects(&mut doc.root),
        style_blocks_removed: inline_and_remove_style_blocks(&mut doc.root),
        fonts_normalized: normalize_fonts(&mut doc.root),
    };

    tracing::debug!(
        backgrounds = report.backgrounds_removed,
        style_blocks = report.style_blocks_removed,
        fonts = report.fonts_normalized,
        "Matplotlib cleanup"
    );

    report
}

/// Run all cleanup passes and return the total modification count.
pub fn cleanup_matplotlib(doc: &mut Document) -> usize {
    cleanup_matplotlib_report(doc).total()
}
