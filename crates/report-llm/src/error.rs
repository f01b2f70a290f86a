//! Completion provider errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

#[derive(Error, Debug)]
pub enum LLMError {
    /// Provider rejected the credentials (401/403)
    #[error("provider rejected the API key")]
    Unauthorized,

    /// Too many requests (429)
    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    /// Model name not known to the provider (404)
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    /// Any other non-success status
    #[error("provider answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Request never got a response
    #[cfg(feature = "openai")]
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Response held no generated message
    #[error("provider returned no completion")]
    EmptyCompletion,

    /// Missing or invalid provider settings
    #[error("provider misconfigured: {0}")]
    Config(String),
}

impl LLMError {
    /// Map a non-success HTTP status onto an error
    pub fn from_status(status: u16, body: String, model: &str) -> Self {
        match status {
            401 | 403 => LLMError::Unauthorized,
            404 => LLMError::UnknownModel(model.to_string()),
            429 => LLMError::RateLimited(body),
            _ => LLMError::Status { status, body },
        }
    }
}
