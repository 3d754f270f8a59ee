//! PDF conversion through the `inkscape` command line

use std::path::Path;
use std::process::Command;

use crate::error::BatchError;
use crate::models::ExportFormat;

const INKSCAPE: &str = "inkscape";

fn run_inkscape(input: &Path, output: &Path, format: ExportFormat) -> Result<(), BatchError> {
    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        %format,
        "Running inkscape"
    );

    let result = Command::new(INKSCAPE)
        .arg(input)
        .arg(format!("--export-type={format}"))
        .arg(format!("--export-filename={}", output.display()))
        .output()
        .map_err(|e| BatchError::Conversion(format!("failed to run {INKSCAPE}: {e}")))?;

    if !result.status.success() {
        return Err(BatchError::Conversion(format!(
            "{} conversion failed: {}",
            format.extension().to_uppercase(),
            String::from_utf8_lossy(&result.stderr).trim()
        )));
    }
    if !output.exists() {
        return Err(BatchError::Conversion(format!(
            "conversion produced no output: {}",
            output.display()
        )));
    }
    Ok(())
}

/// Convert a PDF page to SVG text.
pub fn pdf_to_svg(pdf: &Path) -> Result<String, BatchError> {
    let scratch = tempfile::tempdir()?;
    let svg_path = scratch.path().join("page.svg");
    run_inkscape(pdf, &svg_path, ExportFormat::Svg)?;
    Ok(std::fs::read_to_string(&svg_path)?)
}

/// Write SVG text to `output` as PDF.
pub fn svg_to_pdf(svg: &str, output: &Path) -> Result<(), BatchError> {
    let scratch = tempfile::tempdir()?;
    let svg_path = scratch.path().join("figure.svg");
    std::fs::write(&svg_path, svg)?;
    run_inkscape(&svg_path, output, ExportFormat::Pdf)
}
