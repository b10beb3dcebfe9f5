//! Error types for Gentle

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Result type alias using [`GentleError`]
pub type Result<T> = std::result::Result<T, GentleError>;

/// Main error type for Gentle
#[derive(Debug, Error)]
pub enum GentleError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Configuration is present but unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Provider API key was never configured
    #[error("missing API key for {provider}")]
    MissingApiKey { provider: String },

    /// Provider answered with a non-success status or an unusable body
    #[error("{provider} API error: {message}")]
    ApiError { provider: String, message: String },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No adapter is registered for the requested model
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Conversation does not exist
    #[error("Chat not found: {0}")]
    ChatNotFound(u64),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GentleError {
    /// HTTP status used when this error reaches the API boundary
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::Json(_) => StatusCode::BAD_REQUEST,
            Self::ChatNotFound(_) => StatusCode::NOT_FOUND,
            Self::ApiError { .. } | Self::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GentleError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({ "success": false, "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
