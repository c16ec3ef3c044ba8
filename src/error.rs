//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::path::{Path, PathBuf};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache and its HTTP layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The write-ahead log could not be opened, written, synced or read
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Append attempted after the log was closed
    #[error("Log is closed: {}", .0.display())]
    LogClosed(PathBuf),

    /// Invalid construction parameters (capacity, policy name)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Metric registration or exposition failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Returns a closure wrapping an `io::Error` with the path it occurred on.
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> CacheError + '_ {
        move |source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Io { .. }
            | CacheError::LogClosed(_)
            | CacheError::Config(_)
            | CacheError::Metrics(_)
            | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
