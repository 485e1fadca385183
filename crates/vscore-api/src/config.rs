//! API configuration.

use std::path::PathBuf;

use vscore_analysis::LiveAnalysisConfig;
use vscore_gemini::GeminiConfig;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Directory uploaded videos are written to and served from
    pub uploads_dir: PathBuf,
    /// Origin used to build public video URLs
    pub public_base_url: String,
    /// Serve simulated analyses instead of calling Gemini
    pub design_mode: bool,
    /// Expose Prometheus metrics at /metrics
    pub metrics_enabled: bool,
    pub gemini: GeminiConfig,
    pub analysis: LiveAnalysisConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_body_size: 500 * 1024 * 1024, // 500MB
            uploads_dir: PathBuf::from("./uploads"),
            public_base_url: "http://localhost:8000".to_string(),
            design_mode: true,
            metrics_enabled: true,
            gemini: GeminiConfig::default(),
            analysis: LiveAnalysisConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let gemini = GeminiConfig::from_env();
        let design_flag = std::env::var("MODO_DISENO")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(500 * 1024 * 1024),
            uploads_dir: std::env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads")),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            design_mode: design_flag || gemini.api_key.is_none(),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            gemini,
            analysis: LiveAnalysisConfig::from_env(),
        }
    }
}
