//! Error types for the toolkit
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Toolkit Error Enum ==
/// Unified error type for the cache, the clients and the HTTP surface.
#[derive(Error, Debug)]
pub enum Error {
    /// Cache key could not be derived
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream answered with an unexpected status
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Subprocess could not be spawned or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Subprocess exited unsuccessfully
    #[error("Command failed with {status}: {stderr}")]
    Command { status: String, stderr: String },

    /// Cached payload variant did not match the requested operation
    #[error("Cached payload mismatch for key '{key}': found {found}")]
    PayloadMismatch { key: String, found: &'static str },
}

// == IntoResponse Implementation ==
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidKey(_) | Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Upstream(_) | Error::Http(_) | Error::Decode(_) | Error::Command { .. } => {
                StatusCode::BAD_GATEWAY
            }
            Error::Io(_) | Error::PayloadMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the toolkit.
pub type Result<T> = std::result::Result<T, Error>;
