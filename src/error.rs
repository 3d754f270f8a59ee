use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("SVG parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{id}' not found. Available: {available}")]
    NotFound { id: String, available: String },

    #[error("Invalid palette color in template '{id}': {color}")]
    InvalidPalette { id: String, color: String },

    #[error("Failed to parse templates: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read templates: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("No processable files (SVG/PDF) found at: {0}")]
    NoFiles(String),

    #[error("{0} requires a directory path, '{1}' is not a directory")]
    NotADirectory(&'static str, String),

    #[error("Invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Conversion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
