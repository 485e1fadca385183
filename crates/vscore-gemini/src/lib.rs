//! Client for the remote analysis capability.
//!
//! This crate provides:
//! - The capability traits consumed by the analysis pipeline
//!   ([`VideoAnalysisProvider`], [`TextGenerator`])
//! - A Gemini REST implementation covering the Files API (resumable upload,
//!   status, delete) and `generateContent`

pub mod client;
pub mod error;
pub mod provider;
pub mod types;

pub use client::{GeminiClient, GeminiConfig};
pub use error::{GeminiError, GeminiResult};
pub use provider::{TextGenerator, VideoAnalysisProvider};
pub use types::{FileState, RemoteFile, SamplingConfig};
