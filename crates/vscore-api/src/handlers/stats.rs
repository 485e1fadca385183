//! Progress dashboard.

use axum::extract::State;
use axum::Json;
use vscore_models::TrendSummary;

use crate::state::AppState;

/// Summary over the most recent analyses.
pub async fn user_stats(State(state): State<AppState>) -> Json<TrendSummary> {
    let (window, total) = state.store.snapshot().await;
    Json(state.trends.summarize(window, total).await)
}
