//! Media file validation and loading

use crate::error::{QuillError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum::{Display, EnumString};
use tokio::fs;
use tracing::debug;

/// Coarse media type tag
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

/// A validated, user-selected media file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    /// Path to the file on disk
    pub path: PathBuf,

    /// Audio or video
    pub kind: MediaKind,

    /// MIME type inferred from the file extension
    pub mime: String,

    /// File size in bytes
    pub size: u64,
}

impl MediaFile {
    /// Validate and describe a media file without reading its contents.
    ///
    /// Rejects unknown extensions and files larger than `max_bytes`; a
    /// rejected file leaves no trace anywhere.
    pub fn load<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(QuillError::Media(format!(
                "Media file not found: {}",
                path.display()
            )));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let (kind, mime) = mime_for_extension(&extension).ok_or_else(|| {
            QuillError::Media(format!(
                "Unsupported file type {:?}: expected an audio or video file",
                extension
            ))
        })?;

        let size = std::fs::metadata(path)?.len();
        if size > max_bytes {
            return Err(QuillError::Media(format!(
                "File is too large: {} exceeds the {} limit",
                format_size(size),
                format_size(max_bytes)
            )));
        }

        debug!("Loaded media file {} ({}, {})", path.display(), mime, size);

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            mime: mime.to_string(),
            size,
        })
    }

    /// File name component, for display and upload metadata
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string())
    }

    /// Read the whole file for upload
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path).await?)
    }
}

/// Map a lowercase file extension to its media kind and MIME type
fn mime_for_extension(extension: &str) -> Option<(MediaKind, &'static str)> {
    let entry = match extension {
        "mp3" => (MediaKind::Audio, "audio/mpeg"),
        "wav" => (MediaKind::Audio, "audio/wav"),
        "m4a" => (MediaKind::Audio, "audio/mp4"),
        "aac" => (MediaKind::Audio, "audio/aac"),
        "ogg" | "oga" => (MediaKind::Audio, "audio/ogg"),
        "opus" => (MediaKind::Audio, "audio/opus"),
        "flac" => (MediaKind::Audio, "audio/flac"),
        "mp4" | "m4v" => (MediaKind::Video, "video/mp4"),
        "mov" => (MediaKind::Video, "video/quicktime"),
        "webm" => (MediaKind::Video, "video/webm"),
        "mkv" => (MediaKind::Video, "video/x-matroska"),
        "avi" => (MediaKind::Video, "video/x-msvideo"),
        _ => return None,
    };
    Some(entry)
}

/// Format a byte count in human readable form
fn format_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = size as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_mime_table() {
        assert_eq!(
            mime_for_extension("mp3"),
            Some((MediaKind::Audio, "audio/mpeg"))
        );
        assert_eq!(
            mime_for_extension("mov"),
            Some((MediaKind::Video, "video/quicktime"))
        );
        assert_eq!(mime_for_extension("pdf"), None);
        assert_eq!(mime_for_extension(""), None);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not media").unwrap();

        let result = MediaFile::load(&path, u64::MAX);
        assert!(matches!(result, Err(QuillError::Media(_))));
    }

    #[test]
    fn test_load_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview.wav");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 2048]).unwrap();

        let result = MediaFile::load(&path, 1024);
        match result {
            Err(QuillError::Media(msg)) => assert!(msg.contains("too large")),
            other => panic!("Expected Media error, got: {:?}", other),
        }
    }

    #[test]
    fn test_load_accepts_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview.mp3");
        std::fs::write(&path, b"fake mp3 bytes").unwrap();

        let media = MediaFile::load(&path, 1024).unwrap();
        assert_eq!(media.kind, MediaKind::Audio);
        assert_eq!(media.mime, "audio/mpeg");
        assert_eq!(media.size, 14);
        assert_eq!(media.file_name(), "interview.mp3");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(100 * 1024 * 1024), "100.0 MB");
    }
}
