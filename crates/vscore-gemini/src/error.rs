//! Gemini client error types.

use thiserror::Error;

pub type GeminiResult<T> = Result<T, GeminiError>;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY not configured")]
    MissingApiKey,

    #[error("Gemini API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeminiError {
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GeminiError::MissingApiKey => "config",
            GeminiError::Api { .. } => "api",
            GeminiError::Upload(_) => "upload",
            GeminiError::InvalidResponse(_) | GeminiError::Json(_) => "invalid_response",
            GeminiError::Network(_) => "network",
            GeminiError::Io(_) => "io",
        }
    }
}
