//! Quill Core Library
//!
//! Media validation, hosted-model transcription, and transcript-grounded
//! chat for the quill CLI.

pub mod chat;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod media;
pub mod provider;
pub mod search;
pub mod session;

pub use chat::{ChatMessage, Role};
pub use config::{api_key_from_env, SessionConfig};
pub use error::{QuillError, Result};
pub use export::{save_transcript, SessionReport};
pub use format::{format_reply, Block};
pub use media::{MediaFile, MediaKind};
pub use provider::{HttpProvider, Provider};
pub use search::{MatchSpan, Segment, TranscriptSearch};
pub use session::{Session, SessionStatus};
use tracing::info;

/// High-level transcription function
pub async fn transcribe_media_file<P: AsRef<std::path::Path>>(
    path: P,
    config: Option<SessionConfig>,
) -> Result<String> {
    let config = config.unwrap_or_default();

    let provider = HttpProvider::new(&config)?;
    let mut session = Session::new(provider, config);

    session.load_media(path.as_ref())?;

    info!("Transcribing media file: {:?}", path.as_ref());
    session.transcribe().await?;

    Ok(session.transcript().unwrap_or_default().to_string())
}
