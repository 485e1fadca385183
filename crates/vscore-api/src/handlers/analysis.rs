//! Stored analysis lookup.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;
use vscore_models::AnalysisResult;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Most recent analysis recorded for a video.
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<AnalysisResult>> {
    let not_found = || ApiError::not_found(format!("Analysis {} not found", video_id));

    let id = Uuid::parse_str(&video_id).map_err(|_| not_found())?;
    let result = state.store.find(id).await.ok_or_else(not_found)?;

    Ok(Json(result))
}
