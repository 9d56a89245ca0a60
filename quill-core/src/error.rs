//! Error types for the quill-core library

use thiserror::Error;

/// Main error type for quill operations
#[derive(Error, Debug)]
pub enum QuillError {
    #[error("Media error: {0}")]
    Media(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Session error: {0}")]
    Session(String),
}

/// Result type alias for quill operations
pub type Result<T> = std::result::Result<T, QuillError>;

impl PartialEq for QuillError {
    fn eq(&self, other: &Self) -> bool {
        match self {
            QuillError::Media(msg) => {
                matches!(other, QuillError::Media(o) if msg == o)
            }
            QuillError::Provider(msg) => {
                matches!(other, QuillError::Provider(o) if msg == o)
            }
            QuillError::Http(err) => {
                matches!(other, QuillError::Http(e) if err.to_string() == e.to_string())
            }
            QuillError::Io(err) => {
                matches!(other, QuillError::Io(e) if err.to_string() == e.to_string())
            }
            QuillError::Configuration(msg) => {
                matches!(other, QuillError::Configuration(o) if msg == o)
            }
            QuillError::Session(msg) => {
                matches!(other, QuillError::Session(o) if msg == o)
            }
        }
    }
}
