//! Video upload and synchronous analysis.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use vscore_models::{AnalysisResult, EditingStep, FinalStatus};

use crate::error::{ApiError, ApiResult};
use crate::services::UploadStore;
use crate::state::AppState;

/// Multipart field carrying the video.
pub const FILE_FIELD: &str = "file";

pub const UPLOAD_COMPLETE_MESSAGE: &str = "Proceso completado";

/// Response to a completed upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub video_id: Uuid,
    pub video_url: String,
    /// Recommendations as JSON array text
    pub analysis: String,
    pub retention_score: Option<u8>,
    pub final_status: Option<FinalStatus>,
    pub editing_timeline: Vec<EditingStep>,
    pub message: String,
}

impl UploadResponse {
    fn new(result: AnalysisResult, video_url: String) -> Self {
        Self {
            video_id: result.video_id,
            video_url,
            analysis: result.recommendations,
            retention_score: result.retention_score,
            final_status: result.final_status,
            editing_timeline: result.editing_timeline,
            message: UPLOAD_COMPLETE_MESSAGE.to_string(),
        }
    }
}

/// Store the uploaded video, analyze it and record the result.
///
/// Analysis failures never surface here; the analyzer substitutes its
/// fallback result. Only a missing payload (400) or a failed disk write (500)
/// are reported as errors.
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let video_id = Uuid::new_v4();
    let mut stored = None;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = UploadStore::file_name(video_id, field.file_name());
        let (path, bytes) = state.uploads.write_field(&file_name, &mut field).await?;
        if bytes == 0 {
            state.uploads.discard(&path).await;
            break;
        }

        info!(video_id = %video_id, file = %file_name, bytes, "Video stored");
        stored = Some((file_name, path));
        break;
    }

    let (file_name, path) = stored.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

    // Runs to completion even if the client disconnects
    let analyzer = state.analyzer.clone();
    let store = state.store.clone();
    let result = tokio::spawn(async move {
        let result = analyzer.analyze(video_id, &path).await;
        store.append(result.clone()).await;
        result
    })
    .await
    .map_err(|e| ApiError::internal(format!("Analysis task failed: {}", e)))?;

    Ok(Json(UploadResponse::new(
        result,
        state.uploads.video_url(&file_name),
    )))
}
