//! Capability traits for the remote analysis provider.
//!
//! The analysis pipeline only depends on these traits, so the provider can be
//! swapped for a fake in tests or for another backend.

use std::path::Path;

use async_trait::async_trait;

use crate::error::GeminiResult;
use crate::types::{FileState, RemoteFile, SamplingConfig};

/// Remote video analysis: upload, wait for processing, generate, release.
#[async_trait]
pub trait VideoAnalysisProvider: Send + Sync {
    /// Upload a local video and return its remote handle.
    async fn upload(&self, path: &Path) -> GeminiResult<RemoteFile>;

    /// Current processing state of an uploaded file.
    async fn get_status(&self, file: &RemoteFile) -> GeminiResult<FileState>;

    /// Run one generation request over the uploaded file.
    async fn generate(
        &self,
        file: &RemoteFile,
        prompt: &str,
        sampling: SamplingConfig,
    ) -> GeminiResult<String>;

    /// Delete the uploaded file from remote storage.
    async fn release(&self, file: &RemoteFile) -> GeminiResult<()>;
}

/// Text-only generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str, sampling: SamplingConfig) -> GeminiResult<String>;
}
