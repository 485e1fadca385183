//! Progress summary models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::recommendation::Category;

/// Category with the greatest measured improvement across the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BestCategory {
    pub category: Category,
    pub label: String,
    /// Earliest minus latest severity; positive means the issue became less severe
    #[serde(rename = "improvement")]
    pub improvement_delta: i32,
}

impl BestCategory {
    pub fn new(category: Category, improvement_delta: i32) -> Self {
        Self {
            category,
            label: category.label().to_string(),
            improvement_delta,
        }
    }
}

/// Aggregate progress summary served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrendSummary {
    /// Most recent analyses, oldest first (at most 10)
    #[serde(rename = "analyses")]
    pub window: Vec<AnalysisResult>,

    /// Motivational progress insight
    #[serde(rename = "ai_insight")]
    pub insight: String,

    /// Most improved category, if measurable
    pub best_category: Option<BestCategory>,

    /// Number of analyses ever recorded
    #[serde(rename = "total_videos")]
    pub total_count: usize,
}
