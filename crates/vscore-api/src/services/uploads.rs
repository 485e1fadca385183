//! Local storage for uploaded videos.

use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ApiResult;

/// Extension used when the client filename has none.
pub const DEFAULT_EXTENSION: &str = ".mp4";

const MAX_EXTENSION_LEN: usize = 10;

/// Writes uploads as `{video_id}{ext}` into a single directory and builds
/// their public URLs.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_base_url: String,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the uploads directory if missing.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Stored file name for `video_id` uploaded as `original_name`.
    pub fn file_name(video_id: Uuid, original_name: Option<&str>) -> String {
        format!("{}{}", video_id, extension_of(original_name))
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    pub fn video_url(&self, file_name: &str) -> String {
        format!("{}/videos/{}", self.public_base_url, file_name)
    }

    /// Stream a multipart field to `file_name`. Returns the stored path and
    /// the number of bytes written.
    pub async fn write_field(
        &self,
        file_name: &str,
        field: &mut Field<'_>,
    ) -> ApiResult<(PathBuf, u64)> {
        let path = self.path_for(file_name);
        let mut file = fs::File::create(&path).await?;
        let mut written = 0u64;

        let outcome: ApiResult<()> = async {
            while let Some(chunk) = field.chunk().await? {
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok(())
        }
        .await;
        drop(file);

        if let Err(e) = outcome {
            self.discard(&path).await;
            return Err(e);
        }

        debug!(path = %path.display(), bytes = written, "Stored upload");
        Ok((path, written))
    }

    /// Remove a stored file, logging failures.
    pub async fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove upload");
        }
    }

    /// Probe that the directory accepts writes.
    pub async fn check_writable(&self) -> ApiResult<()> {
        let probe = self.dir.join(format!(".ready-{}", Uuid::new_v4()));
        fs::write(&probe, b"ok").await?;
        fs::remove_file(&probe).await?;
        Ok(())
    }
}

/// Extension of `original_name` including the dot, restricted to ASCII
/// alphanumerics. Falls back to [`DEFAULT_EXTENSION`].
pub fn extension_of(original_name: Option<&str>) -> String {
    let ext: String = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_EXTENSION_LEN)
        .collect();

    if ext.is_empty() {
        DEFAULT_EXTENSION.to_string()
    } else {
        format!(".{}", ext)
    }
}
