//! Analysis history and progress analytics.
//!
//! - [`AnalyticsStore`]: append-only in-memory log with a trailing read window
//! - [`TrendEngine`]: best-category ranking and the progress summary
//! - [`InsightGenerator`]: heuristic or model-generated progress insight

pub mod insight;
pub mod store;
pub mod trend;

pub use insight::{HeuristicInsight, InsightGenerator, LiveInsight};
pub use store::{AnalyticsStore, WINDOW_SIZE};
pub use trend::{best_category, TrendEngine, EMPTY_HISTORY_INSIGHT};
