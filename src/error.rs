//! Error Types
//!
//! Typed failures raised by the library layers. Orchestration code (`analysis`, `job`,
//! the binary) wraps these in `anyhow::Error` with additional context.

use std::path::PathBuf;
use thiserror::Error;

/// A CSV line that could not be turned into a `SalesRecord`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("CSV line must not be empty")]
    EmptyLine,

    #[error("expected 5 columns, but got {found} for line: '{line}'")]
    ColumnCount { found: usize, line: String },

    #[error("category column is empty for line: '{line}'")]
    EmptyCategory { line: String },

    #[error("category must not be blank")]
    BlankCategory,

    #[error("failed to parse {field} in line: '{line}'")]
    InvalidNumber { field: &'static str, line: String },

    #[error("quantity must be non-negative, got {quantity}")]
    NegativeQuantity { quantity: i32 },
}

/// Failures while locating or reading input files.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("input file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Misconfiguration of the phase runners.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("thread count must be > 0")]
    InvalidThreadCount,

    #[error("worker pool closed before all chunks were scheduled")]
    PoolClosed,
}
