//! Batch analysis and improvement of figure files
//!
//! Every file is handled independently: a failure is recorded as an error
//! entry for that file and the rest of the batch continues.

use chrono::{DateTime, Utc};
use figure_color::{auto_map_colors, ColorMapping, Palette};
use glob::Pattern;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::convert::{pdf_to_svg, svg_to_pdf};
use super::template_service::{ApplyOptions, TemplateService};
use crate::analysis::{analyze_colors, extract_data_colors, ColorAnalysis};
use crate::cleanup::{cleanup_matplotlib, is_generated_by_matplotlib};
use crate::error::BatchError;
use crate::models::{ExportFormat, Template};
use crate::rendering::SvgRenderer;
use crate::svg::Document;

const PROCESSABLE_EXTENSIONS: [&str; 2] = ["svg", "pdf"];

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

fn is_processable(path: &Path) -> bool {
    path.is_file()
        && extension(path).is_some_and(|ext| PROCESSABLE_EXTENSIONS.contains(&ext.as_str()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Shell-style file name pattern (`*`, `?`, `[seq]`, `[!seq]`).
fn file_pattern(pattern: &str) -> Result<Pattern, BatchError> {
    Pattern::new(pattern).map_err(|e| BatchError::Pattern {
        pattern: pattern.to_string(),
        source: e,
    })
}

/// Resolve the figures named by `input`.
///
/// `input` is a directory (sorted, non-recursive, filtered by `pattern`),
/// a comma-separated list of files, or a single file. Only `.svg` and
/// `.pdf` files are returned, as absolute paths. An invalid `pattern` is
/// an error.
pub fn list_processable_files(
    input: &str,
    pattern: Option<&str>,
) -> Result<Vec<PathBuf>, BatchError> {
    if input.contains(',') {
        return Ok(input
            .split(',')
            .map(|f| Path::new(f.trim()))
            .filter(|p| is_processable(p))
            .map(absolute)
            .collect());
    }

    let path = Path::new(input);
    if path.is_dir() {
        let matcher = pattern
            .filter(|p| !p.is_empty())
            .map(file_pattern)
            .transpose()?;
        let Ok(entries) = fs::read_dir(path) else {
            return Ok(Vec::new());
        };
        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|p| is_processable(p))
            .filter(|p| {
                matcher
                    .as_ref()
                    .is_none_or(|glob| glob.matches(&file_name(p)))
            })
            .map(|p| absolute(&p))
            .collect();
        files.sort();
        return Ok(files);
    }

    if is_processable(path) {
        Ok(vec![absolute(path)])
    } else {
        Ok(Vec::new())
    }
}

/// Parse an SVG file, converting PDF input through inkscape first.
pub fn load_document(path: &Path) -> Result<Document, BatchError> {
    if extension(path).as_deref() == Some("pdf") {
        let svg = pdf_to_svg(path)?;
        Ok(Document::parse(&svg)?)
    } else {
        Ok(Document::from_file(path)?)
    }
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Read-only analysis of one file
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    pub file: String,
    pub file_type: String,
    pub dimensions: String,
    #[serde(rename = "viewBox")]
    pub view_box: String,
    pub total_elements: usize,
    pub element_counts: BTreeMap<String, usize>,
    pub matplotlib_detected: bool,
    pub color_analysis: ColorAnalysis,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisEntry {
    Analyzed(FileAnalysis),
    Error { file: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchAnalysis {
    pub files_analyzed: usize,
    pub matplotlib_count: usize,
    pub file_analyses: Vec<AnalysisEntry>,
    pub aggregate_data_colors: Vec<(String, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_suggested_mapping: Option<ColorMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_template: Option<String>,
}

impl BatchAnalysis {
    pub fn summary(&self) -> String {
        let mut summary = format!("Analysis complete: {} files analyzed", self.files_analyzed);
        if self.matplotlib_count > 0 {
            summary.push_str(&format!(", {} matplotlib detected", self.matplotlib_count));
        }
        summary
    }
}

/// Outcome of improving one file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub input: String,
    pub output: String,
    pub output_path: PathBuf,
    pub matplotlib_detected: bool,
    pub modifications: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProcessEntry {
    Ok(FileResult),
    Error { input: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub files_processed: usize,
    pub files_failed: usize,
    pub file_results: Vec<ProcessEntry>,
    pub batch_template: String,
    pub output_dir: PathBuf,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_color_map: Option<ColorMapping>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Batch processing complete: {} files processed",
            self.files_processed
        );
        if self.files_failed > 0 {
            summary.push_str(&format!(", {} failed", self.files_failed));
        }
        summary
    }
}

/// Options for [`BatchService::batch_improve`] and [`BatchService::process_file`]
#[derive(Debug, Clone)]
pub struct ImproveOptions {
    /// `Some(true)` forces cleanup, `Some(false)` disables it, `None`
    /// cleans only detected matplotlib output
    pub cleanup_matplotlib: Option<bool>,
    pub apply_fonts: bool,
    pub apply_colors: bool,
    /// Explicit color map; suppresses the automatic one
    pub color_map: Option<ColorMapping>,
    /// Build a color map from the data colors of the whole batch
    pub auto_color: bool,
    /// File name filter for directory input
    pub pattern: Option<String>,
    /// Directory name used when no output directory is given
    pub output_dir_name: String,
    pub png_scale: f32,
}

impl Default for ImproveOptions {
    fn default() -> Self {
        Self {
            cleanup_matplotlib: None,
            apply_fonts: true,
            apply_colors: true,
            color_map: None,
            auto_color: false,
            pattern: None,
            output_dir_name: "improved".to_string(),
            png_scale: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Drives analysis, cleanup, templating and export over batches of files
pub struct BatchService {
    templates: TemplateService,
    renderer: SvgRenderer,
}

impl BatchService {
    pub fn new(templates: TemplateService, renderer: SvgRenderer) -> Self {
        Self {
            templates,
            renderer,
        }
    }

    pub fn templates(&self) -> &TemplateService {
        &self.templates
    }

    /// Analyze one file without modifying it.
    pub fn analyze_file(path: &Path, palette: Option<&Palette>) -> Result<FileAnalysis, BatchError> {
        let doc = load_document(path)?;

        let mut element_counts: BTreeMap<String, usize> = BTreeMap::new();
        for element in doc.root.descendants() {
            *element_counts.entry(element.tag().to_string()).or_default() += 1;
        }

        let width = doc.root.attr("width").unwrap_or("?");
        let height = doc.root.attr("height").unwrap_or("?");

        Ok(FileAnalysis {
            file: file_name(path),
            file_type: extension(path).unwrap_or_default(),
            dimensions: format!("{width} x {height}"),
            view_box: doc.root.attr("viewBox").unwrap_or_default().to_string(),
            total_elements: element_counts.values().sum(),
            element_counts,
            matplotlib_detected: is_generated_by_matplotlib(&doc),
            color_analysis: analyze_colors(&doc.root, palette),
        })
    }

    /// Analyze every file named by `input`, optionally suggesting a mapping
    /// onto a template palette.
    pub fn batch_analyze(
        &self,
        input: &str,
        template_id: Option<&str>,
        pattern: Option<&str>,
    ) -> Result<BatchAnalysis, BatchError> {
        let files = list_processable_files(input, pattern)?;
        if files.is_empty() {
            return Err(BatchError::NoFiles(input.to_string()));
        }

        // an unknown template only drops the mapping suggestion
        let palette = template_id
            .and_then(|id| self.templates.get(id).ok())
            .map(Template::palette)
            .filter(|p| !p.is_empty());

        let mut file_analyses = Vec::with_capacity(files.len());
        let mut aggregate: BTreeMap<String, usize> = BTreeMap::new();
        let mut files_analyzed = 0;
        let mut matplotlib_count = 0;

        for path in &files {
            match Self::analyze_file(path, palette.as_ref()) {
                Ok(analysis) => {
                    files_analyzed += 1;
                    if analysis.matplotlib_detected {
                        matplotlib_count += 1;
                    }
                    for (color, count) in &analysis.color_analysis.data_colors {
                        *aggregate.entry(color.clone()).or_default() += count;
                    }
                    file_analyses.push(AnalysisEntry::Analyzed(analysis));
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Analysis failed");
                    file_analyses.push(AnalysisEntry::Error {
                        file: file_name(path),
                        error: e.to_string(),
                    });
                }
            }
        }

        let aggregate_data_colors = rank(aggregate);
        let aggregate_suggested_mapping = palette
            .as_ref()
            .map(|p| auto_map_colors(&aggregate_data_colors, p));

        Ok(BatchAnalysis {
            files_analyzed,
            matplotlib_count,
            file_analyses,
            aggregate_data_colors,
            analysis_template: aggregate_suggested_mapping
                .as_ref()
                .and(template_id.map(str::to_string)),
            aggregate_suggested_mapping,
        })
    }

    /// Clean, restyle and export one file into `output_dir`.
    pub fn process_file(
        &self,
        path: &Path,
        output_dir: &Path,
        template: &Template,
        format: ExportFormat,
        options: &ImproveOptions,
    ) -> Result<FileResult, BatchError> {
        let mut doc = load_document(path)?;
        let mut modifications = 0;

        let matplotlib_detected = options
            .cleanup_matplotlib
            .unwrap_or_else(|| is_generated_by_matplotlib(&doc));
        if matplotlib_detected {
            modifications += cleanup_matplotlib(&mut doc);
        }

        let apply = ApplyOptions {
            apply_fonts: options.apply_fonts,
            apply_colors: options.apply_colors,
            color_map: options.color_map.clone().unwrap_or_default(),
        };
        modifications += TemplateService::apply(&mut doc, template, &apply);

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output = format!("{stem}.{}", format.extension());
        let output_path = output_dir.join(&output);

        match format {
            ExportFormat::Svg => doc.write_to(&output_path)?,
            ExportFormat::Png => {
                let png = self
                    .renderer
                    .render_to_png(doc.to_xml_string().as_bytes(), options.png_scale)?;
                fs::write(&output_path, png)?;
            }
            ExportFormat::Pdf => svg_to_pdf(&doc.to_xml_string(), &output_path)?,
        }

        tracing::info!(
            file = %file_name(path),
            output = %output,
            modifications,
            matplotlib = matplotlib_detected,
            "Processed figure"
        );

        Ok(FileResult {
            input: file_name(path),
            output,
            output_path,
            matplotlib_detected,
            modifications,
        })
    }

    /// Sum data colors over `files` and map them onto `palette`.
    fn aggregate_color_map(files: &[PathBuf], palette: &Palette) -> Option<ColorMapping> {
        let mut aggregate: BTreeMap<String, usize> = BTreeMap::new();
        for path in files {
            match load_document(path) {
                Ok(doc) => {
                    for (color, count) in extract_data_colors(&doc.root, 1) {
                        *aggregate.entry(color).or_default() += count;
                    }
                }
                Err(e) => {
                    tracing::debug!(file = %path.display(), error = %e, "Skipping file in color aggregation");
                }
            }
        }
        if aggregate.is_empty() {
            return None;
        }
        Some(auto_map_colors(&rank(aggregate), palette))
    }

    /// Improve every file named by `input` with template `template_id`.
    pub fn batch_improve(
        &self,
        input: &str,
        template_id: &str,
        output_dir: Option<&Path>,
        format: ExportFormat,
        options: &ImproveOptions,
    ) -> Result<BatchReport, BatchError> {
        // fail on an unknown template before touching the filesystem
        self.templates.get(template_id)?;

        let files = list_processable_files(input, options.pattern.as_deref())?;
        if files.is_empty() {
            return Err(BatchError::NoFiles(input.to_string()));
        }

        let output_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_output_dir(input, &files, &options.output_dir_name),
        };
        self.improve_files(&files, template_id, &output_dir, format, options)
    }

    /// Improve an explicit list of files into `output_dir`.
    pub fn improve_files(
        &self,
        files: &[PathBuf],
        template_id: &str,
        output_dir: &Path,
        format: ExportFormat,
        options: &ImproveOptions,
    ) -> Result<BatchReport, BatchError> {
        let template = self.templates.get(template_id)?;
        fs::create_dir_all(output_dir)?;

        let mut options = options.clone();
        let mut auto_color_map = None;
        if options.auto_color && options.color_map.is_none() {
            let palette = template.palette();
            if !palette.is_empty() {
                auto_color_map = Self::aggregate_color_map(files, &palette);
                options.color_map = auto_color_map.clone();
            }
        }

        let mut file_results = Vec::with_capacity(files.len());
        let mut errors = Vec::new();
        let mut files_processed = 0;

        for path in files {
            match self.process_file(path, output_dir, template, format, &options) {
                Ok(result) => {
                    files_processed += 1;
                    file_results.push(ProcessEntry::Ok(result));
                }
                Err(e) => {
                    let input = file_name(path);
                    tracing::warn!(file = %input, error = %e, "Processing failed");
                    errors.push(format!("{input}: {e}"));
                    file_results.push(ProcessEntry::Error {
                        input,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(BatchReport {
            files_processed,
            files_failed: file_results.len() - files_processed,
            file_results,
            batch_template: template_id.to_string(),
            output_dir: output_dir.to_path_buf(),
            errors,
            auto_color_map,
            finished_at: Utc::now(),
        })
    }
}

/// Most frequent first, ties in ascending hex order.
fn rank(counts: BTreeMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// `<input dir>/<name>` for directory input, otherwise next to the first file.
pub fn default_output_dir(input: &str, files: &[PathBuf], name: &str) -> PathBuf {
    let input_path = Path::new(input);
    if input_path.is_dir() {
        return input_path.join(name);
    }
    files
        .first()
        .and_then(|f| f.parent())
        .map(|parent| parent.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}
