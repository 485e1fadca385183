//! Analysis strategies.
//!
//! The mode is chosen once at startup: design mode runs [`SimulatedAnalysis`],
//! otherwise [`LiveAnalysis`] drives the remote provider.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use vscore_gemini::{FileState, RemoteFile, SamplingConfig, VideoAnalysisProvider};
use vscore_models::AnalysisFragment;

use crate::error::{AnalysisError, AnalyzeResult};
use crate::logging::AnalysisLogger;
use crate::normalizer::normalize;
use crate::presets::{simulated_fragment, ANALYSIS_PROMPT, ANALYSIS_TEMPERATURE};

/// Which analysis path is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    Simulated,
    Live,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Live => "live",
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One way of turning a stored video into an analysis fragment.
#[async_trait]
pub trait AnalysisStrategy: Send + Sync {
    fn mode(&self) -> AnalysisMode;

    async fn run(&self, video: &Path, logger: &AnalysisLogger) -> AnalyzeResult<AnalysisFragment>;
}

/// Deterministic design-mode analysis. Never touches the network.
#[derive(Debug, Clone)]
pub struct SimulatedAnalysis {
    latency: Duration,
}

impl Default for SimulatedAnalysis {
    fn default() -> Self {
        Self {
            latency: Duration::from_secs(2),
        }
    }
}

impl SimulatedAnalysis {
    /// Override the simulated processing delay.
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl AnalysisStrategy for SimulatedAnalysis {
    fn mode(&self) -> AnalysisMode {
        AnalysisMode::Simulated
    }

    async fn run(&self, _video: &Path, logger: &AnalysisLogger) -> AnalyzeResult<AnalysisFragment> {
        logger.log_progress(&format!("simulating analysis ({:?})", self.latency));
        tokio::time::sleep(self.latency).await;
        Ok(simulated_fragment())
    }
}

/// Timing and sampling for the live path.
#[derive(Debug, Clone)]
pub struct LiveAnalysisConfig {
    /// Delay between status polls while the file is processing
    pub poll_interval: Duration,
    /// Upper bound on the total processing wait
    pub max_wait: Duration,
    pub temperature: f32,
}

impl Default for LiveAnalysisConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            max_wait: Duration::from_secs(60),
            temperature: ANALYSIS_TEMPERATURE,
        }
    }
}

impl LiveAnalysisConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            poll_interval: std::env::var("ANALYSIS_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            max_wait: std::env::var("ANALYSIS_MAX_WAIT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.max_wait),
            temperature: defaults.temperature,
        }
    }
}

/// Remote analysis through a [`VideoAnalysisProvider`].
pub struct LiveAnalysis {
    provider: Arc<dyn VideoAnalysisProvider>,
    config: LiveAnalysisConfig,
}

impl LiveAnalysis {
    pub fn new(provider: Arc<dyn VideoAnalysisProvider>, config: LiveAnalysisConfig) -> Self {
        Self { provider, config }
    }

    /// Poll until the file leaves `PROCESSING`, bounded by `max_wait`.
    async fn wait_until_ready(&self, file: &RemoteFile) -> AnalyzeResult<()> {
        tokio::time::timeout(self.config.max_wait, self.poll_status(file))
            .await
            .map_err(|_| AnalysisError::Timeout(self.config.max_wait))?
    }

    async fn poll_status(&self, file: &RemoteFile) -> AnalyzeResult<()> {
        let mut state = file.state;
        while state == FileState::Processing {
            tokio::time::sleep(self.config.poll_interval).await;
            state = self.provider.get_status(file).await?;
        }
        match state {
            FileState::Failed => Err(AnalysisError::RemoteFailed(file.name.clone())),
            _ => Ok(()),
        }
    }

    async fn process(
        &self,
        file: &RemoteFile,
        logger: &AnalysisLogger,
    ) -> AnalyzeResult<AnalysisFragment> {
        self.wait_until_ready(file).await?;
        logger.log_progress(&format!("{} is ready, requesting analysis", file.name));

        let sampling = SamplingConfig::with_temperature(self.config.temperature);
        let raw = self.provider.generate(file, ANALYSIS_PROMPT, sampling).await?;

        Ok(normalize(&raw))
    }
}

#[async_trait]
impl AnalysisStrategy for LiveAnalysis {
    fn mode(&self) -> AnalysisMode {
        AnalysisMode::Live
    }

    async fn run(&self, video: &Path, logger: &AnalysisLogger) -> AnalyzeResult<AnalysisFragment> {
        let file = self.provider.upload(video).await?;
        logger.log_progress(&format!("uploaded as {} ({})", file.name, file.state));

        let outcome = self.process(&file, logger).await;

        if let Err(e) = self.provider.release(&file).await {
            logger.log_warning(&format!("failed to release {}: {}", file.name, e));
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use mockall::mock;
    use uuid::Uuid;
    use vscore_gemini::{GeminiError, GeminiResult};

    mock! {
        pub Provider {}

        #[async_trait]
        impl VideoAnalysisProvider for Provider {
            async fn upload(&self, path: &Path) -> GeminiResult<RemoteFile>;
            async fn get_status(&self, file: &RemoteFile) -> GeminiResult<FileState>;
            async fn generate(
                &self,
                file: &RemoteFile,
                prompt: &str,
                sampling: SamplingConfig,
            ) -> GeminiResult<String>;
            async fn release(&self, file: &RemoteFile) -> GeminiResult<()>;
        }
    }

    fn remote(state: FileState) -> RemoteFile {
        RemoteFile {
            name: "files/abc123".to_string(),
            uri: "https://example.test/files/abc123".to_string(),
            mime_type: "video/mp4".to_string(),
            state,
        }
    }

    fn logger() -> AnalysisLogger {
        AnalysisLogger::new(Uuid::new_v4(), AnalysisMode::Live)
    }

    const MODEL_OUTPUT: &str = r#"{"recommendations":[{"id":"1","type":"hook","title":"Gancho","description":"d","priority":"high","timestamp":0}],"retention_score":91,"final_status":"ready","editing_timeline":[]}"#;

    #[tokio::test(start_paused = true)]
    async fn test_live_success_polls_then_releases() {
        let mut provider = MockProvider::new();
        let polls = Arc::new(AtomicUsize::new(0));
        let seen = polls.clone();

        provider
            .expect_upload()
            .times(1)
            .returning(|_| Ok(remote(FileState::Processing)));
        provider.expect_get_status().returning(move |_| {
            if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                Ok(FileState::Processing)
            } else {
                Ok(FileState::Active)
            }
        });
        provider
            .expect_generate()
            .times(1)
            .withf(|_, prompt, sampling| {
                prompt.contains("retention_score") && (sampling.temperature - 0.4).abs() < 1e-6
            })
            .returning(|_, _, _| Ok(format!("```json\n{}\n```", MODEL_OUTPUT)));
        provider.expect_release().times(1).returning(|_| Ok(()));

        let live = LiveAnalysis::new(Arc::new(provider), LiveAnalysisConfig::default());
        let fragment = live.run(Path::new("video.mp4"), &logger()).await.unwrap();

        assert_eq!(polls.load(Ordering::SeqCst), 3);
        assert_eq!(fragment.final_status.as_deref(), Some("ready"));
        assert!(fragment.recommendations.contains("\"hook\""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_already_active_skips_polling() {
        let mut provider = MockProvider::new();
        provider
            .expect_upload()
            .returning(|_| Ok(remote(FileState::Active)));
        provider.expect_get_status().times(0);
        provider
            .expect_generate()
            .returning(|_, _, _| Ok(MODEL_OUTPUT.to_string()));
        provider.expect_release().times(1).returning(|_| Ok(()));

        let live = LiveAnalysis::new(Arc::new(provider), LiveAnalysisConfig::default());
        assert!(live.run(Path::new("video.mp4"), &logger()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_remote_failure_still_releases() {
        let mut provider = MockProvider::new();
        provider
            .expect_upload()
            .returning(|_| Ok(remote(FileState::Processing)));
        provider
            .expect_get_status()
            .returning(|_| Ok(FileState::Failed));
        provider.expect_generate().times(0);
        provider.expect_release().times(1).returning(|_| Ok(()));

        let live = LiveAnalysis::new(Arc::new(provider), LiveAnalysisConfig::default());
        let err = live.run(Path::new("video.mp4"), &logger()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::RemoteFailed(ref name) if name == "files/abc123"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_stuck_processing_times_out() {
        let mut provider = MockProvider::new();
        provider
            .expect_upload()
            .returning(|_| Ok(remote(FileState::Processing)));
        provider
            .expect_get_status()
            .returning(|_| Ok(FileState::Processing));
        provider.expect_generate().times(0);
        provider
            .expect_release()
            .times(1)
            .returning(|_| Err(GeminiError::invalid_response("gone")));

        let live = LiveAnalysis::new(Arc::new(provider), LiveAnalysisConfig::default());
        let started = tokio::time::Instant::now();
        let err = live.run(Path::new("video.mp4"), &logger()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Timeout(d) if d == Duration::from_secs(60)));
        assert!(started.elapsed() >= Duration::from_secs(60));
        assert_eq!(err.kind(), "timeout");
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_upload_error_skips_release() {
        let mut provider = MockProvider::new();
        provider
            .expect_upload()
            .returning(|_| Err(GeminiError::upload("connection reset")));
        provider.expect_release().times(0);

        let live = LiveAnalysis::new(Arc::new(provider), LiveAnalysisConfig::default());
        let err = live.run(Path::new("video.mp4"), &logger()).await.unwrap_err();

        assert_eq!(err.kind(), "upstream");
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_waits_for_latency() {
        let strategy = SimulatedAnalysis::default();
        let started = tokio::time::Instant::now();
        let fragment = strategy
            .run(Path::new("ignored.mp4"), &logger())
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(2));
        assert_eq!(strategy.mode(), AnalysisMode::Simulated);
        assert_eq!(fragment.retention_score, Some(serde_json::Value::from(76)));
    }

    #[test]
    fn test_live_config_defaults() {
        let config = LiveAnalysisConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.max_wait, Duration::from_secs(60));
    }
}
