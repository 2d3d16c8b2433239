//! Error types for the file pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Broad failure class, used for reporting and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input is not well-formed JSON
    Parse,
    /// A file could not be read, created, written or renamed
    Io,
}

/// Errors that can occur while filtering a file
#[derive(Debug, Error)]
pub enum IoPipelineError {
    /// Input file is missing or unreadable
    #[error("failed to read input '{}': {source}", .path.display())]
    ReadInput {
        /// Input path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Input bytes are not well-formed JSON
    #[error("invalid JSON in '{}': {source}", .path.display())]
    Parse {
        /// Input path
        path: PathBuf,
        /// Parser diagnostic (includes line and column)
        source: serde_json::Error,
    },

    /// Temporary output file could not be created next to the target
    #[error("failed to create output for '{}': {source}", .path.display())]
    CreateOutput {
        /// Final output path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Writing the filtered document failed
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        /// Final output path
        path: PathBuf,
        /// Filter or sync error
        source: jstrip_core::FilterError,
    },

    /// Renaming the finished temporary file onto the target failed
    #[error("failed to move output into place at '{}': {source}", .path.display())]
    Persist {
        /// Final output path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl IoPipelineError {
    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IoPipelineError::Parse { .. } => ErrorKind::Parse,
            IoPipelineError::ReadInput { .. }
            | IoPipelineError::CreateOutput { .. }
            | IoPipelineError::Write { .. }
            | IoPipelineError::Persist { .. } => ErrorKind::Io,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, IoPipelineError>;
