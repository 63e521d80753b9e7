//! Media relay: stream a resolved video URL into a temporary file, hand the
//! file to an outbound sink, and guarantee the temp file is deleted
//! whatever the outcome.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use uuid::Uuid;

use crate::core::error::{AppError, AppResult};

/// Outbound channel that delivers a downloaded video file to the chat.
#[async_trait]
pub trait VideoSink: Send + Sync {
    async fn send_video(&self, path: &Path) -> AppResult<()>;
}

/// A uniquely named `.mp4` file in the system temp directory.
///
/// Dropping the guard removes the file; deletion errors are swallowed so
/// cleanup never masks the relay's own result.
struct TempVideoFile {
    path: PathBuf,
}

impl TempVideoFile {
    fn allocate() -> Self {
        let path = std::env::temp_dir().join(format!("relay-{}.mp4", Uuid::new_v4()));
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    /// Base name used for the download record.
    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Drop for TempVideoFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Download `video_url` into a fresh temp file and push it through `sink`.
///
/// Returns the temp file's base name on success, for the download record.
/// Network errors, non-success HTTP statuses and sink failures all surface
/// as a single `AppError`; nothing is retried. The temp file is deleted in
/// every case.
pub async fn relay_video(client: &reqwest::Client, video_url: &str, sink: &dyn VideoSink) -> AppResult<String> {
    let tmp = TempVideoFile::allocate();
    download_to(client, video_url, tmp.path()).await?;
    sink.send_video(tmp.path()).await?;
    Ok(tmp.file_name())
}

/// Stream the response body into `path` chunk by chunk, never buffering the
/// whole payload.
async fn download_to(client: &reqwest::Client, url: &str, path: &Path) -> AppResult<()> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(AppError::HttpStatus(response.status()));
    }

    let mut file = std::fs::File::create(path)?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)?;
    }
    file.flush()?;

    Ok(())
}
