//! Analysis error types.
//!
//! None of these reach the caller of [`crate::Analyzer::analyze`]; they are
//! logged and replaced by the fallback result.

use std::time::Duration;

use thiserror::Error;
use vscore_gemini::GeminiError;

pub type AnalyzeResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Remote processing did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Remote processing failed for {0}")]
    RemoteFailed(String),

    #[error("Upstream call failed: {0}")]
    Upstream(#[from] GeminiError),
}

impl AnalysisError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Timeout(_) => "timeout",
            AnalysisError::RemoteFailed(_) => "remote_failed",
            AnalysisError::Upstream(_) => "upstream",
        }
    }
}
