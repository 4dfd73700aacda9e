use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::dialogue::session::SessionId;

/// Separator written after every saved transcript.
pub const RECORD_SEPARATOR: &str = "---";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("transcript storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Where exported transcripts go. The file-backed default appends to one
/// local file; other backends only need to implement `save`.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    /// Persists one export and returns a human-readable location.
    async fn save(&self, session_id: SessionId, transcript: &str) -> Result<String, SinkError>;
}

/// Appends each transcript followed by a `---` line to `dir/filename`.
#[derive(Debug, Clone)]
pub struct FileTranscriptSink {
    path: PathBuf,
}

impl FileTranscriptSink {
    pub fn new(dir: impl Into<PathBuf>, filename: &str) -> Self {
        Self {
            path: dir.into().join(filename),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl TranscriptSink for FileTranscriptSink {
    async fn save(&self, session_id: SessionId, transcript: &str) -> Result<String, SinkError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let mut record = String::with_capacity(transcript.len() + RECORD_SEPARATOR.len() + 2);
        record.push_str(transcript);
        if !transcript.ends_with('\n') {
            record.push('\n');
        }
        record.push_str(RECORD_SEPARATOR);
        record.push('\n');

        file.write_all(record.as_bytes()).await?;
        file.flush().await?;

        info!(
            "Saved transcript for session {} ({} bytes)",
            session_id,
            record.len()
        );
        Ok(self.path.display().to_string())
    }
}
