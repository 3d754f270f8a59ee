//! Assertion helpers for tests.

use figpolish::services::{BatchReport, FileResult, ProcessEntry};
use figpolish::svg::Document;

/// Assert the text parses as a document and return it
pub fn assert_valid_svg(text: &str) -> Document {
    match Document::parse(text) {
        Ok(doc) => doc,
        Err(e) => panic!("Output is not valid SVG: {e}\n{text}"),
    }
}

/// Assert no element of the document carries `needle` in its style or
/// fill/stroke attributes
pub fn assert_color_absent(doc: &Document, needle: &str) {
    for element in doc.root.descendants() {
        for attr in ["style", "fill", "stroke"] {
            if let Some(value) = element.attr(attr) {
                assert!(
                    !value.to_lowercase().contains(needle),
                    "Found {needle} in <{} {attr}=\"{value}\">",
                    element.tag()
                );
            }
        }
    }
}

/// Assert the report has exactly these counts and return successful results
pub fn assert_report_counts(report: &BatchReport, processed: usize, failed: usize) -> Vec<&FileResult> {
    assert_eq!(
        (report.files_processed, report.files_failed),
        (processed, failed),
        "Unexpected counts. Errors: {:?}",
        report.errors
    );
    report
        .file_results
        .iter()
        .filter_map(|entry| match entry {
            ProcessEntry::Ok(result) => Some(result),
            ProcessEntry::Error { .. } => None,
        })
        .collect()
}

/// Assert the bytes start with the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}
