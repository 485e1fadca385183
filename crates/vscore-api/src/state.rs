//! Application state.

use std::sync::Arc;

use tracing::{info, warn};
use vscore_analysis::Analyzer;
use vscore_analytics::{AnalyticsStore, HeuristicInsight, LiveInsight, TrendEngine};
use vscore_gemini::GeminiClient;

use crate::config::ApiConfig;
use crate::services::UploadStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub analyzer: Analyzer,
    pub store: AnalyticsStore,
    pub trends: TrendEngine,
    pub uploads: UploadStore,
}

impl AppState {
    /// Create new application state, choosing the analysis mode once.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let uploads = UploadStore::new(&config.uploads_dir, &config.public_base_url);
        uploads.ensure_dir().await?;

        let (analyzer, trends) = if config.design_mode {
            info!("Design mode: analyses are simulated");
            (Analyzer::simulated(), TrendEngine::new(Arc::new(HeuristicInsight)))
        } else {
            match GeminiClient::new(config.gemini.clone()) {
                Ok(client) => {
                    info!(model = client.model(), "Live mode: analyses use Gemini");
                    let client = Arc::new(client);
                    (
                        Analyzer::live(client.clone(), config.analysis.clone()),
                        TrendEngine::new(Arc::new(LiveInsight::new(client))),
                    )
                }
                Err(e) => {
                    warn!(error = %e, "Gemini client unavailable, falling back to design mode");
                    (Analyzer::simulated(), TrendEngine::new(Arc::new(HeuristicInsight)))
                }
            }
        };

        Ok(Self::with_components(config, analyzer, trends, uploads))
    }

    /// Assemble state from prebuilt components.
    pub fn with_components(
        config: ApiConfig,
        analyzer: Analyzer,
        trends: TrendEngine,
        uploads: UploadStore,
    ) -> Self {
        Self {
            config,
            analyzer,
            store: AnalyticsStore::new(),
            trends,
            uploads,
        }
    }
}
