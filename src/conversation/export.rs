//! Destinations for exported transcripts.
//!
//! A direct save to a path the user chose is preferred. Without one, the
//! transcript lands in the download directory under its suggested name.
//! Both write exactly `Transcript::text`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use super::transcript::Transcript;
use crate::error::{ExportError, ExportResult};

/// Somewhere a transcript can be written.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    /// Write the transcript and return where it ended up.
    async fn save(&self, transcript: &Transcript) -> ExportResult<PathBuf>;
}

/// Save to a user-chosen location. A directory receives the suggested name.
#[derive(Debug, Clone)]
pub struct DirectSave {
    target: PathBuf,
}

impl DirectSave {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

#[async_trait]
impl TranscriptSink for DirectSave {
    async fn save(&self, transcript: &Transcript) -> ExportResult<PathBuf> {
        let path = if tokio::fs::metadata(&self.target)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            self.target.join(&transcript.file_name)
        } else {
            self.target.clone()
        };

        write_text(&path, &transcript.text).await?;
        info!(path = %path.display(), mime = transcript.mime, "Transcript saved");
        Ok(path)
    }
}

/// Fallback: drop the file into a downloads directory.
#[derive(Debug, Clone)]
pub struct DownloadFallback {
    dir: PathBuf,
}

impl DownloadFallback {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl TranscriptSink for DownloadFallback {
    async fn save(&self, transcript: &Transcript) -> ExportResult<PathBuf> {
        let path = self.dir.join(&transcript.file_name);
        write_text(&path, &transcript.text).await?;
        info!(path = %path.display(), mime = transcript.mime, "Transcript downloaded");
        Ok(path)
    }
}

/// Use the direct save target when one is available.
pub fn select_sink(direct: Option<PathBuf>, download_dir: &Path) -> Box<dyn TranscriptSink> {
    match direct {
        Some(target) => Box::new(DirectSave::new(target)),
        None => Box::new(DownloadFallback::new(download_dir)),
    }
}

async fn write_text(path: &Path, text: &str) -> ExportResult<()> {
    let to_error = |source| ExportError::Write {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(to_error)?;
    }
    tokio::fs::write(path, text.as_bytes()).await.map_err(to_error)
}
