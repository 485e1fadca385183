//! Progress insight generation.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use tracing::warn;
use vscore_gemini::{SamplingConfig, TextGenerator};
use vscore_models::AnalysisResult;

pub const INSIGHTS_TOTAL: &str = "vscore_insights_total";

/// Insight for a window with fewer than two analyses.
pub const ONBOARDING_INSIGHT: &str = "Sube más videos para empezar a ver tu gráfica de evolución.";

/// Heuristic insight when fewer than two analyses carry a score.
pub const NOT_ENOUGH_SCORES_INSIGHT: &str = "Sigue subiendo videos para ver tu progreso.";

/// Live insight when generation fails or returns nothing.
pub const LIVE_FALLBACK_INSIGHT: &str = "Sigue creando videos y verás tu evolución.";

const INSIGHT_TEMPERATURE: f32 = 0.7;

/// Produces a one-sentence motivational insight for a window of analyses.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Name used in metric labels.
    fn source(&self) -> &'static str;

    /// Insight for `window`, oldest first. Never fails.
    async fn insight(&self, window: &[AnalysisResult]) -> String;
}

/// Score-delta heuristic used in design mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicInsight;

impl HeuristicInsight {
    pub fn compose(window: &[AnalysisResult]) -> String {
        if window.len() < 2 {
            return ONBOARDING_INSIGHT.to_string();
        }

        let scores: Vec<i32> = window
            .iter()
            .filter_map(|r| r.retention_score)
            .map(i32::from)
            .collect();

        match (scores.first(), scores.last()) {
            (Some(first), Some(last)) if scores.len() >= 2 => {
                let delta = last - first;
                if delta > 0 {
                    format!(
                        "¡Excelente! Has mejorado {}% en tus últimos {} videos. Sigue con ese ritmo.",
                        delta,
                        scores.len()
                    )
                } else {
                    format!(
                        "Analiza tus últimos {} videos y encontrarás patrones para seguir creciendo.",
                        scores.len()
                    )
                }
            }
            _ => NOT_ENOUGH_SCORES_INSIGHT.to_string(),
        }
    }
}

#[async_trait]
impl InsightGenerator for HeuristicInsight {
    fn source(&self) -> &'static str {
        "heuristic"
    }

    async fn insight(&self, window: &[AnalysisResult]) -> String {
        counter!(INSIGHTS_TOTAL, "source" => "heuristic", "outcome" => "success").increment(1);
        Self::compose(window)
    }
}

/// Insight written by a text generation model.
#[derive(Clone)]
pub struct LiveInsight {
    generator: Arc<dyn TextGenerator>,
}

impl LiveInsight {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Prompt listing every analysis in the window.
    pub fn prompt(window: &[AnalysisResult]) -> String {
        let mut data = String::new();
        for (i, result) in window.iter().enumerate() {
            let score = result
                .retention_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let _ = writeln!(
                data,
                "Video {}: score={}, fecha={}",
                i + 1,
                score,
                result.recorded_at.to_rfc3339()
            );
        }

        format!(
            "Basándote en estos datos de análisis de videos, genera UNA SOLA frase motivadora y \
             específica sobre el progreso del creador. Sé breve (máx 15 palabras), positivo y \
             accionable. Datos:\n{}",
            data
        )
    }
}

#[async_trait]
impl InsightGenerator for LiveInsight {
    fn source(&self) -> &'static str {
        "live"
    }

    async fn insight(&self, window: &[AnalysisResult]) -> String {
        if window.len() < 2 {
            return ONBOARDING_INSIGHT.to_string();
        }

        let sampling = SamplingConfig::with_temperature(INSIGHT_TEMPERATURE);
        let (text, outcome) = match self
            .generator
            .generate_text(&Self::prompt(window), sampling)
            .await
        {
            Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), "success"),
            Ok(_) => {
                warn!("Insight generation returned empty text");
                (LIVE_FALLBACK_INSIGHT.to_string(), "fallback")
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Insight generation failed");
                (LIVE_FALLBACK_INSIGHT.to_string(), "fallback")
            }
        };

        counter!(INSIGHTS_TOTAL, "source" => "live", "outcome" => outcome).increment(1);
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::mock;
    use uuid::Uuid;
    use vscore_gemini::{GeminiError, GeminiResult};

    mock! {
        pub Generator {}

        #[async_trait]
        impl TextGenerator for Generator {
            async fn generate_text(
                &self,
                prompt: &str,
                sampling: SamplingConfig,
            ) -> GeminiResult<String>;
        }
    }

    fn window(scores: &[Option<u8>]) -> Vec<AnalysisResult> {
        scores
            .iter()
            .map(|score| AnalysisResult {
                video_id: Uuid::new_v4(),
                recorded_at: Utc::now(),
                retention_score: *score,
                final_status: None,
                recommendations: "[]".to_string(),
                editing_timeline: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_heuristic_onboarding() {
        assert_eq!(HeuristicInsight::compose(&[]), ONBOARDING_INSIGHT);
        assert_eq!(HeuristicInsight::compose(&window(&[Some(90)])), ONBOARDING_INSIGHT);
    }

    #[test]
    fn test_heuristic_improvement() {
        let insight = HeuristicInsight::compose(&window(&[Some(60), Some(70), Some(75)]));
        assert_eq!(
            insight,
            "¡Excelente! Has mejorado 15% en tus últimos 3 videos. Sigue con ese ritmo."
        );
    }

    #[test]
    fn test_heuristic_no_improvement_counts_scored_entries() {
        let insight = HeuristicInsight::compose(&window(&[Some(80), None, Some(80)]));
        assert_eq!(
            insight,
            "Analiza tus últimos 2 videos y encontrarás patrones para seguir creciendo."
        );
    }

    #[test]
    fn test_heuristic_not_enough_scores() {
        let insight = HeuristicInsight::compose(&window(&[None, Some(50), None]));
        assert_eq!(insight, NOT_ENOUGH_SCORES_INSIGHT);
    }

    #[test]
    fn test_prompt_lists_each_entry() {
        let prompt = LiveInsight::prompt(&window(&[Some(70), None]));
        assert!(prompt.contains("Video 1: score=70, fecha="));
        assert!(prompt.contains("Video 2: score=N/A, fecha="));
        assert!(prompt.contains("15 palabras"));
    }

    #[tokio::test]
    async fn test_live_insight_trims_answer() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate_text()
            .times(1)
            .withf(|_, sampling| (sampling.temperature - 0.7).abs() < 1e-6)
            .returning(|_, _| Ok("  ¡Tu gancho mejora cada semana!\n".to_string()));

        let live = LiveInsight::new(Arc::new(generator));
        let insight = live.insight(&window(&[Some(60), Some(80)])).await;
        assert_eq!(insight, "¡Tu gancho mejora cada semana!");
    }

    #[tokio::test]
    async fn test_live_insight_falls_back() {
        let mut failing = MockGenerator::new();
        failing
            .expect_generate_text()
            .returning(|_, _| Err(GeminiError::Api { status: 503, body: "busy".to_string() }));
        let live = LiveInsight::new(Arc::new(failing));
        assert_eq!(
            live.insight(&window(&[Some(60), Some(80)])).await,
            LIVE_FALLBACK_INSIGHT
        );

        let mut empty = MockGenerator::new();
        empty
            .expect_generate_text()
            .returning(|_, _| Ok("   ".to_string()));
        let live = LiveInsight::new(Arc::new(empty));
        assert_eq!(
            live.insight(&window(&[Some(60), Some(80)])).await,
            LIVE_FALLBACK_INSIGHT
        );
    }

    #[tokio::test]
    async fn test_live_insight_short_window_skips_generation() {
        let mut generator = MockGenerator::new();
        generator.expect_generate_text().times(0);

        let live = LiveInsight::new(Arc::new(generator));
        assert_eq!(live.insight(&window(&[Some(60)])).await, ONBOARDING_INSIGHT);
    }
}
