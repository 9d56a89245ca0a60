//! Transcript export and session reports

use crate::chat::ChatMessage;
use crate::error::Result;
use crate::session::SessionStatus;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// JSON-serializable snapshot of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// File name of the loaded media, if any
    pub media: Option<String>,
    pub status: SessionStatus,
    pub transcript: Option<String>,
    pub messages: Vec<ChatMessage>,
}

/// Write the transcript as plain text.
///
/// Writes to a temporary sibling first and renames into place, so a failed
/// write never leaves a truncated file behind.
pub async fn save_transcript<P: AsRef<Path>>(path: P, transcript: &str) -> Result<()> {
    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(transcript.as_bytes()).await?;
    file.flush().await?;
    drop(file);

    fs::rename(&temp_path, path).await?;

    info!("Saved transcript to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_transcript_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview.txt");

        save_transcript(&path, "Line one.\nLine two.\n").await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Line one.\nLine two.\n");
        assert!(!dir.path().join("interview.tmp").exists());
    }

    #[test]
    fn test_report_serialization() {
        let report = SessionReport {
            media: Some("interview.mp3".to_string()),
            status: SessionStatus::Completed,
            transcript: Some("Hello.".to_string()),
            messages: vec![ChatMessage::user("Who spoke?")],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
