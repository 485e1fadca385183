//! Gemini REST client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, Client, Response};
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::error::{GeminiError, GeminiResult};
use crate::provider::{TextGenerator, VideoAnalysisProvider};
use crate::types::{
    Content, FileData, FileEnvelope, FileState, GenerateRequest, GenerateResponse,
    GenerationConfig, Part, RemoteFile, SamplingConfig, StartUploadFile, StartUploadRequest,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key; the client cannot be built without one
    pub api_key: Option<String>,
    /// API root, overridable for tests and proxies
    pub base_url: String,
    /// Model used for generation
    pub model: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120), // uploads of long videos take a while
        }
    }
}

impl GeminiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("GEMINI_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Gemini API client.
pub struct GeminiClient {
    http: Client,
    api_key: String,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let api_key = config.api_key.clone().ok_or(GeminiError::MissingApiKey)?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(GeminiError::Network)?;

        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    /// Model used for generation.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Map a non-success response to an API error.
    async fn check(response: Response) -> GeminiResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(GeminiError::Api { status, body })
    }

    async fn generate_content(
        &self,
        parts: Vec<Part>,
        sampling: SamplingConfig,
    ) -> GeminiResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base(),
            self.config.model
        );

        let request = GenerateRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                temperature: sampling.temperature,
            },
        };

        debug!("Calling generateContent on {}", self.config.model);
        let response = self
            .http
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let body: GenerateResponse = response.json().await?;
        body.text()
            .ok_or_else(|| GeminiError::invalid_response("No content in Gemini response"))
    }
}

/// Guess a video MIME type from the file extension.
fn video_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("avi") => "video/x-msvideo",
        Some("mkv") => "video/x-matroska",
        Some("mpeg") | Some("mpg") => "video/mpeg",
        Some("3gp") => "video/3gpp",
        _ => "video/mp4",
    }
}

#[async_trait]
impl VideoAnalysisProvider for GeminiClient {
    async fn upload(&self, path: &Path) -> GeminiResult<RemoteFile> {
        let video = tokio::fs::File::open(path).await?;
        let size = video.metadata().await?.len();
        let mime_type = video_mime_type(path);
        let display_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video")
            .to_string();

        info!(
            "Uploading {} ({} bytes, {}) to Gemini Files API",
            display_name,
            size,
            mime_type
        );

        // Resumable protocol: open a session, then stream the file as one finalizing chunk.
        let start = self
            .http
            .post(format!("{}/upload/v1beta/files", self.base()))
            .query(&[("key", &self.api_key)])
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&StartUploadRequest {
                file: StartUploadFile { display_name },
            })
            .send()
            .await?;
        let start = Self::check(start).await?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| GeminiError::upload("Missing upload URL in session response"))?;

        let finish = self
            .http
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header(CONTENT_LENGTH, size)
            .body(Body::wrap_stream(ReaderStream::new(video)))
            .send()
            .await?;
        let finish = Self::check(finish).await?;

        let envelope: FileEnvelope = finish.json().await?;
        debug!(
            "Uploaded file {} (state {})",
            envelope.file.name, envelope.file.state
        );
        Ok(envelope.file)
    }

    async fn get_status(&self, file: &RemoteFile) -> GeminiResult<FileState> {
        let response = self
            .http
            .get(format!("{}/v1beta/{}", self.base(), file.name))
            .query(&[("key", &self.api_key)])
            .send()
            .await?;
        let response = Self::check(response).await?;

        let current: RemoteFile = response.json().await?;
        debug!("File {} is {}", current.name, current.state);
        Ok(current.state)
    }

    async fn generate(
        &self,
        file: &RemoteFile,
        prompt: &str,
        sampling: SamplingConfig,
    ) -> GeminiResult<String> {
        let mime_type = if file.mime_type.is_empty() {
            "video/mp4".to_string()
        } else {
            file.mime_type.clone()
        };

        let parts = vec![
            Part::FileData(FileData {
                mime_type,
                file_uri: file.uri.clone(),
            }),
            Part::Text(prompt.to_string()),
        ];
        self.generate_content(parts, sampling).await
    }

    async fn release(&self, file: &RemoteFile) -> GeminiResult<()> {
        let response = self
            .http
            .delete(format!("{}/v1beta/{}", self.base(), file.name))
            .query(&[("key", &self.api_key)])
            .send()
            .await?;
        Self::check(response).await?;
        debug!("Released remote file {}", file.name);
        Ok(())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str, sampling: SamplingConfig) -> GeminiResult<String> {
        self.generate_content(vec![Part::Text(prompt.to_string())], sampling).await
    }
}
