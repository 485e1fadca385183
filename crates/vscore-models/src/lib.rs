//! Shared data models for the vscore analysis service.
//!
//! This crate provides Serde-serializable types for:
//! - Improvement recommendations and their fixed category taxonomy
//! - Timestamped editing steps
//! - Normalized analysis results and the retention/status rules
//! - Progress summaries computed over the analytics window

pub mod analysis;
pub mod editing;
pub mod recommendation;
pub mod timestamp;
pub mod trend;

// Re-export common types
pub use analysis::{
    coerce_score, AnalysisFragment, AnalysisResult, FinalStatus, READY_THRESHOLD,
};
pub use editing::{ActionType, EditingStep};
pub use recommendation::{Category, Priority, Recommendation};
pub use timestamp::{format_mm_ss, is_mm_ss, parse_timestamp, TimestampError};
pub use trend::{BestCategory, TrendSummary};
