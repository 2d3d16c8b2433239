//! Error types for the filter engine

use thiserror::Error;

/// Errors raised while emitting filtered output
///
/// A well-formed tree never fails to traverse; every variant here comes from
/// the output sink.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The sink rejected a write or flush.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The serializer reported a non-I/O failure.
    #[error("JSON error: {0}")]
    Json(serde_json::Error),
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            FilterError::Io(err.into())
        } else {
            FilterError::Json(err)
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, FilterError>;
