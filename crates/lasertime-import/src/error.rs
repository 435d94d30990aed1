//! Error types for drawing import.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while importing a drawing.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file extension is not a supported drawing format.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The content is not a usable SVG document.
    #[error("Invalid SVG: {0}")]
    SvgParse(String),

    /// A path `d` attribute could not be parsed.
    #[error("Invalid path data at offset {offset}: {reason}")]
    PathData { offset: usize, reason: String },

    /// The DXF reader rejected the content.
    #[error("DXF parse error: {0}")]
    DxfParse(String),
}

/// Result type alias for import operations.
pub type ImportResult<T> = Result<T, ImportError>;
