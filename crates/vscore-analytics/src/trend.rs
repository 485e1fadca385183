//! Progress summary over the analysis window.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use vscore_models::{AnalysisResult, BestCategory, Category, Priority, TrendSummary};

use crate::insight::{HeuristicInsight, InsightGenerator};

/// Insight served before anything has been analyzed.
pub const EMPTY_HISTORY_INSIGHT: &str =
    "Sube tu primer video para empezar a ver tu gráfica de evolución.";

/// Category whose recommendations dropped most in severity across `window`.
///
/// Severity samples are collected per category in chronological order; the
/// improvement of a category is its first sample minus its last. Categories
/// with fewer than two samples are not ranked. Ties go to the earlier
/// category in [`Category::ALL`].
pub fn best_category(window: &[AnalysisResult]) -> Option<BestCategory> {
    if window.len() < 2 {
        return None;
    }

    let mut samples: BTreeMap<Category, Vec<i32>> = BTreeMap::new();
    for result in window {
        let Some(items) = result.recommendation_values() else {
            continue;
        };
        for item in &items {
            let Some(category) = item
                .get("type")
                .or_else(|| item.get("category"))
                .and_then(Value::as_str)
                .and_then(Category::parse)
            else {
                continue;
            };
            let severity = Priority::severity_of(item.get("priority").and_then(Value::as_str));
            samples.entry(category).or_default().push(i32::from(severity));
        }
    }

    let mut best: Option<(Category, i32)> = None;
    // BTreeMap iterates in declaration order, so strict `>` keeps the earliest on ties.
    for (category, scores) in &samples {
        if scores.len() < 2 {
            continue;
        }
        let (Some(first), Some(last)) = (scores.first(), scores.last()) else {
            continue;
        };
        let delta = first - last;
        if best.map_or(true, |(_, top)| delta > top) {
            best = Some((*category, delta));
        }
    }

    best.map(|(category, delta)| BestCategory::new(category, delta))
}

/// Builds the dashboard summary from a window of analyses.
#[derive(Clone)]
pub struct TrendEngine {
    insight: Arc<dyn InsightGenerator>,
}

impl Default for TrendEngine {
    fn default() -> Self {
        Self::new(Arc::new(HeuristicInsight))
    }
}

impl TrendEngine {
    pub fn new(insight: Arc<dyn InsightGenerator>) -> Self {
        Self { insight }
    }

    /// Summarize `window` (oldest first) given the total number of analyses.
    pub async fn summarize(&self, window: Vec<AnalysisResult>, total_count: usize) -> TrendSummary {
        if total_count == 0 && window.is_empty() {
            return TrendSummary {
                window,
                insight: EMPTY_HISTORY_INSIGHT.to_string(),
                best_category: None,
                total_count,
            };
        }

        let best_category = best_category(&window);
        let insight = self.insight.insight(&window).await;
        debug!(
            source = self.insight.source(),
            window = window.len(),
            total = total_count,
            best = ?best_category.as_ref().map(|b| b.category),
            "Computed trend summary"
        );

        TrendSummary {
            window,
            insight,
            best_category,
            total_count,
        }
    }
}
