//! Error types for the data processor.
//!
//! Every failure the pipeline can surface is a [`ProcessorError`]. The
//! variants follow the tool's failure taxonomy: bad configuration, input
//! problems (missing file, unsupported format, unparsable content) and
//! output write failures. Library errors from polars, serde_json and std::io
//! are wrapped so `?` works across the crate.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for the processing pipeline.
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// Invalid option value (threshold, fill method, dedup column, encoding).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Input path does not exist.
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input extension is not one the loader understands.
    #[error("Unsupported file type: '{extension}' ({})", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Input content could not be parsed.
    #[error("Failed to parse '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// An output artifact could not be written.
    #[error("Failed to write '{}': {reason}", path.display())]
    IoWrite { path: PathBuf, reason: String },

    /// Column was not found in the table.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProcessorError>,
    },
}

impl ProcessorError {
    /// Build a parse error for `path`.
    pub fn parse(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Build a write error for `path`.
    pub fn io_write(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::IoWrite {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProcessorError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code for the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::IoWrite { .. } => "IO_WRITE_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Process exit code for this error.
    ///
    /// `2` configuration, `3` input, `4` output, `1` anything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::FileNotFound(_) | Self::UnsupportedFormat { .. } | Self::Parse { .. } => 3,
            Self::IoWrite { .. } => 4,
            Self::ColumnNotFound(_)
            | Self::Internal(_)
            | Self::Io(_)
            | Self::Polars(_)
            | Self::Json(_) => 1,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }

    /// True for errors raised before any input was read.
    pub fn is_config(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::WithContext { source, .. } => source.is_config(),
            _ => false,
        }
    }
}

impl From<ConfigValidationError> for ProcessorError {
    fn from(err: ConfigValidationError) -> Self {
        ProcessorError::Config(err.to_string())
    }
}

/// Result type alias for processing operations.
pub type Result<T> = std::result::Result<T, ProcessorError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProcessorError::Polars(e).with_context(context))
    }
}
