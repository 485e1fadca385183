//! Per-submission analysis logging.

use tracing::{error, info, warn, Span};
use uuid::Uuid;

use crate::strategy::AnalysisMode;

/// Tags every event of one analysis with its video and mode so concurrent
/// submissions can be told apart in the logs.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisLogger {
    video_id: Uuid,
    mode: AnalysisMode,
}

impl AnalysisLogger {
    pub fn new(video_id: Uuid, mode: AnalysisMode) -> Self {
        Self { video_id, mode }
    }

    pub fn log_start(&self, video: &str) {
        info!(video_id = %self.video_id, mode = %self.mode, video, "Analysis started");
    }

    pub fn log_progress(&self, message: &str) {
        info!(video_id = %self.video_id, mode = %self.mode, "{}", message);
    }

    /// Something went wrong but the result is unaffected.
    pub fn log_warning(&self, message: &str) {
        warn!(video_id = %self.video_id, mode = %self.mode, "{}", message);
    }

    /// The active path failed and the fallback result is used.
    pub fn log_error(&self, message: &str) {
        error!(video_id = %self.video_id, mode = %self.mode, "Analysis failed: {}", message);
    }

    pub fn log_completion(&self, message: &str) {
        info!(video_id = %self.video_id, mode = %self.mode, "Analysis finished: {}", message);
    }

    pub fn create_span(&self) -> Span {
        tracing::info_span!("analysis", video_id = %self.video_id, mode = %self.mode)
    }
}
