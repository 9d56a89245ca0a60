//! Session state machine tying media, transcription, and chat together

use crate::chat::ChatMessage;
use crate::config::SessionConfig;
use crate::error::{QuillError, Result};
use crate::export::SessionReport;
use crate::media::MediaFile;
use crate::provider::Provider;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::Display;
use tracing::{debug, info, warn};

/// Linear session status. Reset returns to `Idle` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Processing,
    Transcribing,
    Completed,
    Error,
}

/// Hook invoked on every status transition
pub type StatusHook = Box<dyn FnMut(SessionStatus) + Send>;

/// One media file, one transcript, one chat session.
///
/// All operations take `&mut self`, so a second submission cannot start
/// while a remote call is outstanding; the status guards below refuse
/// out-of-order operations on top of that.
pub struct Session<P: Provider> {
    config: SessionConfig,
    provider: P,
    media: Option<MediaFile>,
    status: SessionStatus,
    transcript: Option<String>,
    error: Option<String>,
    messages: Vec<ChatMessage>,
    on_status: Option<StatusHook>,
}

impl<P: Provider> Session<P> {
    /// Create an idle session with no media loaded
    pub fn new(provider: P, config: SessionConfig) -> Self {
        Self {
            config,
            provider,
            media: None,
            status: SessionStatus::Idle,
            transcript: None,
            error: None,
            messages: Vec::new(),
            on_status: None,
        }
    }

    /// Register a hook observing status transitions
    pub fn on_status_change<F>(&mut self, hook: F)
    where
        F: FnMut(SessionStatus) + Send + 'static,
    {
        self.on_status = Some(Box::new(hook));
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn media(&self) -> Option<&MediaFile> {
        self.media.as_ref()
    }

    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Validate and load a media file.
    ///
    /// Success replaces any previous media and clears the transcript and
    /// chat; a rejected file changes nothing.
    pub fn load_media<Q: AsRef<Path>>(&mut self, path: Q) -> Result<&MediaFile> {
        let media = MediaFile::load(path, self.config.max_media_bytes)?;

        info!(
            "Loaded {} file {} ({} bytes)",
            media.kind,
            media.file_name(),
            media.size
        );

        self.media = Some(media);
        self.transcript = None;
        self.error = None;
        self.messages.clear();
        self.set_status(SessionStatus::Idle);

        Ok(self.media.as_ref().expect("media was just set"))
    }

    /// Run the transcription call: `Idle -> Processing -> Transcribing ->
    /// Completed`, or `-> Error` with the message stored. The transcript is
    /// set exactly once per loaded file.
    pub async fn transcribe(&mut self) -> Result<()> {
        if self.status != SessionStatus::Idle {
            return Err(QuillError::Session(format!(
                "Cannot start transcription while {}; reset the session first",
                self.status
            )));
        }
        let Some(media) = self.media.clone() else {
            return Err(QuillError::Session(
                "No media file loaded".to_string(),
            ));
        };

        self.set_status(SessionStatus::Processing);
        let bytes = match media.read_bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.fail(e)),
        };
        debug!("Prepared {} bytes for upload", bytes.len());

        self.set_status(SessionStatus::Transcribing);
        match self.provider.transcribe(&media, bytes, &self.config).await {
            Ok(text) => {
                info!("Transcription completed: {} chars", text.len());
                self.transcript = Some(text);
                self.set_status(SessionStatus::Completed);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Ask the assistant a question about the transcript.
    ///
    /// Appends the user message, then the assistant reply. A provider
    /// failure is surfaced inline: the error text is appended as the
    /// assistant turn and the conversation stays usable.
    pub async fn ask<S: Into<String>>(&mut self, text: S) -> Result<&ChatMessage> {
        if self.status != SessionStatus::Completed {
            return Err(QuillError::Session(format!(
                "Chat requires a completed transcript (session is {})",
                self.status
            )));
        }
        let text = text.into();
        let text = text.trim();
        if text.is_empty() {
            return Err(QuillError::Session("Empty question".to_string()));
        }
        let Some(transcript) = self.transcript.clone() else {
            return Err(QuillError::Session(
                "No transcript available".to_string(),
            ));
        };

        self.messages.push(ChatMessage::user(text));

        let reply = self
            .provider
            .reply(&transcript, &self.messages, &self.config)
            .await;

        let assistant = match reply {
            Ok(text) => ChatMessage::assistant(text),
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                ChatMessage::assistant(format!(
                    "Sorry, something went wrong while answering: {}",
                    e
                ))
            }
        };

        self.messages.push(assistant);
        Ok(self.messages.last().expect("assistant turn was just pushed"))
    }

    /// Return to `Idle`, discarding media, transcript, error, and chat.
    pub fn reset(&mut self) {
        debug!("Resetting session from {}", self.status);
        self.media = None;
        self.transcript = None;
        self.error = None;
        self.messages.clear();
        self.set_status(SessionStatus::Idle);
    }

    /// Snapshot for JSON output
    pub fn report(&self) -> SessionReport {
        SessionReport {
            media: self.media.as_ref().map(MediaFile::file_name),
            status: self.status,
            transcript: self.transcript.clone(),
            messages: self.messages.clone(),
        }
    }

    fn fail(&mut self, error: QuillError) -> QuillError {
        self.error = Some(error.to_string());
        self.set_status(SessionStatus::Error);
        error
    }

    fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
        debug!("Session status -> {}", status);
        if let Some(hook) = self.on_status.as_mut() {
            hook(status);
        }
    }
}
