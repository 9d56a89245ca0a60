//! Chat message types and prompt construction

use serde::{Deserialize, Serialize};

/// Who produced a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire name used by the provider API
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn in the conversation; appended in strict order, never edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Build the system prompt that grounds the assistant on a transcript.
pub fn system_prompt(transcript: &str) -> String {
    format!(
        "You are a research assistant for a journalist. Answer questions using \
         only the interview transcript below. If the transcript does not contain \
         the answer, say so plainly instead of guessing. Be concise, and quote \
         the transcript where it supports your answer.\n\nTranscript:\n{}",
        transcript
    )
}
