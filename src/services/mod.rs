pub mod batch;
pub mod convert;
pub mod file_watcher;
pub mod template_service;

pub use batch::{
    list_processable_files, AnalysisEntry, BatchAnalysis, BatchReport, BatchService, FileAnalysis,
    FileResult, ImproveOptions, ProcessEntry,
};
pub use file_watcher::{FileChangeEvent, FileWatcher};
pub use template_service::{ApplyOptions, TemplateService, TemplateSummary};
