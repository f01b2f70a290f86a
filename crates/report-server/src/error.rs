//! Server error type and its HTTP mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use report_llm::LLMError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Required environment variable is not set
    #[error("{0} environment variable not set")]
    MissingEnv(&'static str),

    /// Environment variable could not be parsed
    #[error("invalid value for {key}: '{value}'")]
    InvalidEnv { key: &'static str, value: String },

    /// Upstream base URL is not usable
    #[error("invalid upstream URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Price-history provider could not be reached
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),

    /// Completion provider failed
    #[error("{0}")]
    Completion(#[from] LLMError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
