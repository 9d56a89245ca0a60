//! Remote calls to the hosted generative-AI provider

use crate::chat::{system_prompt, ChatMessage};
use crate::config::SessionConfig;
use crate::error::{QuillError, Result};
use crate::media::MediaFile;
use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Seam to the hosted model. Both calls are one-shot: no retry, no
/// cancellation; a failure is terminal for that attempt.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Transcribe media bytes to plain text.
    async fn transcribe(
        &self,
        media: &MediaFile,
        bytes: Vec<u8>,
        config: &SessionConfig,
    ) -> Result<String>;

    /// Produce the next assistant reply for a transcript-grounded
    /// conversation. `history` ends with the new user message.
    async fn reply(
        &self,
        transcript: &str,
        history: &[ChatMessage],
        config: &SessionConfig,
    ) -> Result<String>;
}

/// HTTP provider speaking the OpenAI-compatible wire format
pub struct HttpProvider {
    client: Client,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: WireReply,
}

#[derive(Deserialize)]
struct WireReply {
    content: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl HttpProvider {
    /// Create a provider client from the session configuration
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client })
    }

    fn endpoint(base_url: &str, path: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn transcribe(
        &self,
        media: &MediaFile,
        bytes: Vec<u8>,
        config: &SessionConfig,
    ) -> Result<String> {
        let part = multipart::Part::bytes(bytes)
            .file_name(media.file_name())
            .mime_str(&media.mime)?;

        let mut form = multipart::Form::new()
            .part("file", part)
            .text("model", config.transcription_model.clone());

        if let Some(language) = &config.language {
            form = form.text("language", language.clone());
        }

        let url = Self::endpoint(&config.base_url, "audio/transcriptions");
        info!(
            "Requesting transcription of {} with model {}",
            media.file_name(),
            config.transcription_model
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&config.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuillError::Provider(format!(
                "Transcription request failed: HTTP {}: {}",
                status, body
            )));
        }

        let parsed: TranscriptionResponse = response.json().await?;
        debug!("Transcription response: {} chars", parsed.text.len());
        Ok(parsed.text)
    }

    async fn reply(
        &self,
        transcript: &str,
        history: &[ChatMessage],
        config: &SessionConfig,
    ) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: system_prompt(transcript),
        });
        for message in history {
            messages.push(WireMessage {
                role: message.role.as_str(),
                content: message.text.clone(),
            });
        }

        let request_body = ChatRequest {
            model: config.chat_model.clone(),
            messages,
            temperature: config.temperature,
        };

        let url = Self::endpoint(&config.base_url, "chat/completions");
        debug!(
            "Requesting chat reply with model {} ({} turns)",
            config.chat_model,
            history.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&config.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuillError::Provider(format!(
                "Chat request failed: HTTP {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                QuillError::Provider("Chat response contained no choices".to_string())
            })?;

        Ok(reply.trim().to_string())
    }
}
