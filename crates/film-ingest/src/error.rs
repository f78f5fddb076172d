//! Error types for dataset ingestion.

use std::path::PathBuf;

use film_model::ModelError;
use thiserror::Error;

/// Errors that abort a load. No partial dataset is ever returned.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the input file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Malformed Input Errors ===
    /// The input has no header row.
    #[error("missing header row in {path}")]
    MissingHeader { path: PathBuf },

    /// The header row has empty or duplicated names.
    #[error("invalid header in {path}: {source}")]
    InvalidHeader {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    /// A data row has a different field count than the header.
    #[error("line {line} of {path} has {found} fields, expected {expected}")]
    RowWidth {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// The CSV reader rejected the input (invalid UTF-8, I/O mid-stream).
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Columns the caller requires are absent from the header.
    #[error("missing required columns in {path}: {}", .columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },
}

impl IngestError {
    /// True for errors caused by the shape of the input rather than the
    /// file system.
    pub fn is_malformed_input(&self) -> bool {
        !matches!(self, Self::FileNotFound { .. } | Self::FileRead { .. })
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
