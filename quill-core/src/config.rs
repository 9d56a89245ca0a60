//! Configuration options for transcription and chat sessions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upper bound on media file size (100 MiB)
pub const DEFAULT_MAX_MEDIA_BYTES: u64 = 100 * 1024 * 1024;

/// Environment variables consulted for the provider API key, in order
pub const API_KEY_ENV_VARS: &[&str] = &["QUILL_API_KEY", "OPENAI_API_KEY"];

/// Configuration for a transcription and chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Base URL of the hosted provider (OpenAI-compatible)
    pub base_url: String,

    /// API key sent as a Bearer token
    #[serde(skip)]
    pub api_key: String,

    /// Model used for the transcription call
    pub transcription_model: String,

    /// Model used for chat turns
    pub chat_model: String,

    /// Language hint passed to the transcription model (e.g., "en", "fr")
    pub language: Option<String>,

    /// Temperature for chat sampling
    pub temperature: f32,

    /// Upper bound on the media file size in bytes
    pub max_media_bytes: u64,

    /// Timeout applied to each remote call
    pub request_timeout: Duration,

    /// Enable verbose debug output
    pub verbose: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            transcription_model: "whisper-1".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            language: None, // Let the model detect
            temperature: 0.4,
            max_media_bytes: DEFAULT_MAX_MEDIA_BYTES,
            request_timeout: Duration::from_secs(120),
            verbose: false,
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider base URL
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API key
    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the transcription model
    pub fn with_transcription_model<S: Into<String>>(mut self, model: S) -> Self {
        self.transcription_model = model.into();
        self
    }

    /// Set the chat model
    pub fn with_chat_model<S: Into<String>>(mut self, model: S) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Set the language hint
    pub fn with_language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the media size bound in bytes
    pub fn with_max_media_bytes(mut self, max: u64) -> Self {
        self.max_media_bytes = max;
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enable or disable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Look up an API key from the environment (`QUILL_API_KEY`, then
/// `OPENAI_API_KEY`).
pub fn api_key_from_env() -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|key| !key.trim().is_empty())
}
