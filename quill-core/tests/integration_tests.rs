//! Integration tests for quill-core

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use quill_core::*;
use rstest::rstest;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Provider stub so the state machine can be driven without a network
struct StubProvider {
    transcript: std::result::Result<String, String>,
    reply: std::result::Result<String, String>,
}

impl StubProvider {
    fn ok() -> Self {
        Self {
            transcript: Ok("The mayor said the budget is final.".to_string()),
            reply: Ok("The mayor.".to_string()),
        }
    }

    fn failing_transcription() -> Self {
        Self {
            transcript: Err("HTTP 500: model overloaded".to_string()),
            reply: Ok(String::new()),
        }
    }

    fn failing_chat() -> Self {
        Self {
            transcript: Ok("Transcript.".to_string()),
            reply: Err("HTTP 429: rate limited".to_string()),
        }
    }
}

#[async_trait]
impl Provider for StubProvider {
    async fn transcribe(
        &self,
        _media: &MediaFile,
        _bytes: Vec<u8>,
        _config: &SessionConfig,
    ) -> Result<String> {
        self.transcript
            .clone()
            .map_err(QuillError::Provider)
    }

    async fn reply(
        &self,
        _transcript: &str,
        _history: &[ChatMessage],
        _config: &SessionConfig,
    ) -> Result<String> {
        self.reply.clone().map_err(QuillError::Provider)
    }
}

fn write_media_file(dir: &TempDir, name: &str, len: usize) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, vec![0u8; len]).unwrap();
    path
}

fn observed_transitions<P: Provider>(session: &mut Session<P>) -> Arc<Mutex<Vec<SessionStatus>>> {
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let hook_transitions = transitions.clone();
    session.on_status_change(move |status| {
        hook_transitions.lock().unwrap().push(status);
    });
    transitions
}

/// Rejected files produce a media error and change no state
#[rstest]
#[case("notes.pdf")]
#[case("slides.pptx")]
#[case("no_extension")]
#[tokio::test]
async fn test_wrong_file_type_rejected(#[case] name: &str) {
    let dir = TempDir::new().unwrap();
    let path = write_media_file(&dir, name, 16);

    let mut session = Session::new(StubProvider::ok(), SessionConfig::default());
    let result = session.load_media(&path);

    assert!(matches!(result, Err(QuillError::Media(_))));
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(session.media().is_none());
    assert!(session.transcript().is_none());
}

#[tokio::test]
async fn test_oversized_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_media_file(&dir, "interview.wav", 2048);

    let config = SessionConfig::new().with_max_media_bytes(1024);
    let mut session = Session::new(StubProvider::ok(), config);

    let result = session.load_media(&path);
    match result {
        Err(QuillError::Media(msg)) => assert!(msg.contains("too large")),
        other => panic!("Expected Media error, got: {:?}", other),
    }
    assert!(session.media().is_none());
}

/// Success walks idle -> processing -> transcribing -> completed and sets
/// the transcript exactly once
#[tokio::test]
async fn test_transcription_success_transitions() {
    let dir = TempDir::new().unwrap();
    let path = write_media_file(&dir, "interview.mp3", 64);

    let mut session = Session::new(StubProvider::ok(), SessionConfig::default());
    let transitions = observed_transitions(&mut session);

    session.load_media(&path).unwrap();
    session.transcribe().await.unwrap();

    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(
        session.transcript(),
        Some("The mayor said the budget is final.")
    );
    assert_eq!(
        transitions.lock().unwrap().as_slice(),
        &[
            SessionStatus::Idle, // load_media
            SessionStatus::Processing,
            SessionStatus::Transcribing,
            SessionStatus::Completed,
        ]
    );

    // A second submission is refused and the transcript stays put
    let again = session.transcribe().await;
    assert!(matches!(again, Err(QuillError::Session(_))));
    assert_eq!(
        session.transcript(),
        Some("The mayor said the budget is final.")
    );
}

#[tokio::test]
async fn test_transcription_failure_transitions() {
    let dir = TempDir::new().unwrap();
    let path = write_media_file(&dir, "interview.mp3", 64);

    let mut session = Session::new(
        StubProvider::failing_transcription(),
        SessionConfig::default(),
    );
    let transitions = observed_transitions(&mut session);

    session.load_media(&path).unwrap();
    let result = session.transcribe().await;

    assert!(matches!(result, Err(QuillError::Provider(_))));
    assert_eq!(session.status(), SessionStatus::Error);
    assert!(session.transcript().is_none());
    assert!(session
        .error_message()
        .unwrap()
        .contains("model overloaded"));
    assert_eq!(
        transitions.lock().unwrap().as_slice(),
        &[
            SessionStatus::Idle,
            SessionStatus::Processing,
            SessionStatus::Transcribing,
            SessionStatus::Error,
        ]
    );
}

#[tokio::test]
async fn test_transcribe_without_media() {
    let mut session = Session::new(StubProvider::ok(), SessionConfig::default());
    let result = session.transcribe().await;
    assert!(matches!(result, Err(QuillError::Session(_))));
    assert_eq!(session.status(), SessionStatus::Idle);
}

/// Reset returns to idle from every reachable state
#[tokio::test]
async fn test_reset_clears_everything() {
    let dir = TempDir::new().unwrap();
    let path = write_media_file(&dir, "interview.mp3", 64);

    // From completed, with chat history
    let mut session = Session::new(StubProvider::ok(), SessionConfig::default());
    session.load_media(&path).unwrap();
    session.transcribe().await.unwrap();
    session.ask("Who spoke?").await.unwrap();
    assert_eq!(session.messages().len(), 2);

    session.reset();
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(session.media().is_none());
    assert!(session.transcript().is_none());
    assert!(session.error_message().is_none());
    assert!(session.messages().is_empty());

    // From error
    let mut session = Session::new(
        StubProvider::failing_transcription(),
        SessionConfig::default(),
    );
    session.load_media(&path).unwrap();
    let _ = session.transcribe().await;
    assert_eq!(session.status(), SessionStatus::Error);

    session.reset();
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(session.error_message().is_none());

    // From idle, reset is a no-op that still lands on idle
    let mut session = Session::new(StubProvider::ok(), SessionConfig::default());
    session.reset();
    assert_eq!(session.status(), SessionStatus::Idle);
}

/// Loading a new file clears the previous transcript and chat
#[tokio::test]
async fn test_new_media_clears_previous_session() {
    let dir = TempDir::new().unwrap();
    let first = write_media_file(&dir, "first.mp3", 64);
    let second = write_media_file(&dir, "second.wav", 64);

    let mut session = Session::new(StubProvider::ok(), SessionConfig::default());
    session.load_media(&first).unwrap();
    session.transcribe().await.unwrap();
    session.ask("Who spoke?").await.unwrap();

    session.load_media(&second).unwrap();
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(session.transcript().is_none());
    assert!(session.messages().is_empty());
    assert_eq!(session.media().unwrap().file_name(), "second.wav");
}

#[tokio::test]
async fn test_chat_turns_append_in_order() {
    let dir = TempDir::new().unwrap();
    let path = write_media_file(&dir, "interview.mp3", 64);

    let mut session = Session::new(StubProvider::ok(), SessionConfig::default());
    session.load_media(&path).unwrap();
    session.transcribe().await.unwrap();

    session.ask("Who spoke?").await.unwrap();
    session.ask("And then?").await.unwrap();

    let messages = session.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].text, "Who spoke?");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[2].role, Role::User);
    assert_eq!(messages[3].role, Role::Assistant);
}

/// A failed chat turn is surfaced inline as an assistant message
#[tokio::test]
async fn test_chat_failure_appends_inline_error() {
    let dir = TempDir::new().unwrap();
    let path = write_media_file(&dir, "interview.mp3", 64);

    let mut session = Session::new(StubProvider::failing_chat(), SessionConfig::default());
    session.load_media(&path).unwrap();
    session.transcribe().await.unwrap();

    let reply = session.ask("Who spoke?").await.unwrap();
    assert_eq!(reply.role, Role::Assistant);
    assert!(reply.text.contains("rate limited"));

    // The session stays usable and in completed state
    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(session.messages().len(), 2);
}

#[tokio::test]
async fn test_chat_requires_completed_transcript() {
    let mut session = Session::new(StubProvider::ok(), SessionConfig::default());
    let result = session.ask("Too early?").await;
    assert!(matches!(result, Err(QuillError::Session(_))));

    let dir = TempDir::new().unwrap();
    let path = write_media_file(&dir, "interview.mp3", 64);
    session.load_media(&path).unwrap();
    session.transcribe().await.unwrap();

    let empty = session.ask("   ").await;
    assert!(matches!(empty, Err(QuillError::Session(_))));
    assert!(session.messages().is_empty());
}

#[tokio::test]
async fn test_session_report() {
    let dir = TempDir::new().unwrap();
    let path = write_media_file(&dir, "interview.mp3", 64);

    let mut session = Session::new(StubProvider::ok(), SessionConfig::default());
    session.load_media(&path).unwrap();
    session.transcribe().await.unwrap();
    session.ask("Who spoke?").await.unwrap();

    let report = session.report();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["media"], "interview.mp3");
    assert_eq!(json["status"], "completed");
    assert_eq!(json["messages"].as_array().unwrap().len(), 2);
}

/// Search over a completed transcript, end to end
#[tokio::test]
async fn test_search_over_transcript() {
    let dir = TempDir::new().unwrap();
    let path = write_media_file(&dir, "interview.mp3", 64);

    let mut session = Session::new(StubProvider::ok(), SessionConfig::default());
    session.load_media(&path).unwrap();
    session.transcribe().await.unwrap();

    let mut search = TranscriptSearch::new(session.transcript().unwrap(), "THE");
    assert_eq!(search.len(), 2);
    assert_eq!(search.next(), Some(1));
    assert_eq!(search.next(), Some(0));
}
