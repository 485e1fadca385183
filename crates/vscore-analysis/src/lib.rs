//! Video analysis orchestration.
//!
//! This crate provides:
//! - The response normalizer that repairs loosely-structured model output
//! - Simulated (design mode) and live (remote provider) analysis strategies
//! - The [`Analyzer`] orchestrator, which always yields a usable result
//! - Structured per-analysis logging

pub mod analyzer;
pub mod error;
pub mod logging;
pub mod normalizer;
pub mod presets;
pub mod strategy;

pub use analyzer::Analyzer;
pub use error::{AnalysisError, AnalyzeResult};
pub use logging::AnalysisLogger;
pub use normalizer::normalize;
pub use strategy::{
    AnalysisMode, AnalysisStrategy, LiveAnalysis, LiveAnalysisConfig, SimulatedAnalysis,
};
