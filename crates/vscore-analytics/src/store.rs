//! In-memory analysis history.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;
use vscore_models::AnalysisResult;

/// Number of trailing entries readers see.
pub const WINDOW_SIZE: usize = 10;

/// Append-only log of analysis results for the lifetime of the process.
///
/// Cloning is cheap and all clones share the same log. Entries are never
/// mutated or removed once appended.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsStore {
    entries: Arc<RwLock<Vec<AnalysisResult>>>,
}

impl AnalyticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, result: AnalysisResult) {
        self.entries.write().await.push(result);
    }

    /// Up to `n` most recent entries, oldest first.
    pub async fn recent(&self, n: usize) -> Vec<AnalysisResult> {
        let entries = self.entries.read().await;
        let start = entries.len().saturating_sub(n);
        entries[start..].to_vec()
    }

    /// The trailing [`WINDOW_SIZE`] window and the total count, read together.
    pub async fn snapshot(&self) -> (Vec<AnalysisResult>, usize) {
        let entries = self.entries.read().await;
        let start = entries.len().saturating_sub(WINDOW_SIZE);
        (entries[start..].to_vec(), entries.len())
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Most recent result recorded for `video_id`.
    pub async fn find(&self, video_id: Uuid) -> Option<AnalysisResult> {
        self.entries
            .read()
            .await
            .iter()
            .rev()
            .find(|r| r.video_id == video_id)
            .cloned()
    }
}
