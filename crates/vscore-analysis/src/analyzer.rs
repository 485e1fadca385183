//! Analysis orchestrator.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::Instrument;
use uuid::Uuid;
use vscore_gemini::VideoAnalysisProvider;
use vscore_models::AnalysisResult;

use crate::logging::AnalysisLogger;
use crate::normalizer::has_recommendations;
use crate::presets::{fallback_fragment, fallback_recommendations_json};
use crate::strategy::{
    AnalysisMode, AnalysisStrategy, LiveAnalysis, LiveAnalysisConfig, SimulatedAnalysis,
};

/// Metric names.
pub mod names {
    pub const ANALYSES_TOTAL: &str = "vscore_analyses_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "vscore_analysis_duration_seconds";
}

/// Produces a normalized [`AnalysisResult`] for a stored video.
///
/// `analyze` never fails. Any error on the active path is logged and replaced
/// by the fixed fallback result, and a result without usable recommendations
/// gets the fallback recommendation set.
#[derive(Clone)]
pub struct Analyzer {
    strategy: Arc<dyn AnalysisStrategy>,
}

impl Analyzer {
    pub fn new(strategy: Arc<dyn AnalysisStrategy>) -> Self {
        Self { strategy }
    }

    /// Design-mode analyzer.
    pub fn simulated() -> Self {
        Self::new(Arc::new(SimulatedAnalysis::default()))
    }

    /// Live analyzer over `provider`.
    pub fn live(provider: Arc<dyn VideoAnalysisProvider>, config: LiveAnalysisConfig) -> Self {
        Self::new(Arc::new(LiveAnalysis::new(provider, config)))
    }

    pub fn mode(&self) -> AnalysisMode {
        self.strategy.mode()
    }

    pub async fn analyze(&self, video_id: Uuid, video: &Path) -> AnalysisResult {
        let mode = self.strategy.mode();
        let logger = AnalysisLogger::new(video_id, mode);
        let span = logger.create_span();

        async {
            let started = Instant::now();
            logger.log_start(&video.display().to_string());

            let (mut fragment, mut outcome) = match self.strategy.run(video, &logger).await {
                Ok(fragment) => (fragment, "success"),
                Err(e) => {
                    logger.log_error(&format!("{} ({}), using fallback result", e, e.kind()));
                    (fallback_fragment(), "fallback")
                }
            };

            if !has_recommendations(&fragment.recommendations) {
                logger.log_warning("no usable recommendations, substituting fallback set");
                fragment.recommendations = fallback_recommendations_json();
                if outcome == "success" {
                    outcome = "repaired";
                }
            }

            let result = fragment.into_result(video_id);

            let labels = [
                ("mode", mode.as_str().to_string()),
                ("outcome", outcome.to_string()),
            ];
            counter!(names::ANALYSES_TOTAL, &labels).increment(1);
            let labels = [("mode", mode.as_str().to_string())];
            histogram!(names::ANALYSIS_DURATION_SECONDS, &labels)
                .record(started.elapsed().as_secs_f64());

            logger.log_completion(&format!(
                "outcome={} score={:?} steps={}",
                outcome,
                result.retention_score,
                result.editing_timeline.len()
            ));
            result
        }
        .instrument(span)
        .await
    }
}
