//! Generation error types

use thiserror::Error;

/// Generation failure with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Transport, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Timeout, message)
    }

    pub fn status(code: u16, body: &str) -> Self {
        Self::new(GenerationErrorKind::Status(code), format!("HTTP {code}: {body}"))
    }

    pub fn unexpected_content(content_type: &str) -> Self {
        Self::new(
            GenerationErrorKind::UnexpectedContent,
            format!("Unexpected response content type: {content_type:?}"),
        )
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Decode, message)
    }

    /// Classify a reqwest failure; the URL is dropped so credentials in it never reach logs
    pub fn from_reqwest(context: &str, e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_timeout() {
            Self::timeout(format!("{context}: request timeout: {e}"))
        } else if e.is_connect() {
            Self::transport(format!("{context}: connection failed: {e}"))
        } else if e.is_decode() || e.is_body() {
            Self::decode(format!("{context}: failed to read response: {e}"))
        } else {
            Self::transport(format!("{context}: request failed: {e}"))
        }
    }
}

/// Error classification for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    /// Connection or protocol failure
    Transport,
    /// Connect or total deadline exceeded
    Timeout,
    /// Non-success HTTP status
    Status(u16),
    /// Response was neither an image nor JSON with an image location
    UnexpectedContent,
    /// Body could not be read or parsed
    Decode,
}

impl GenerationErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Timeout => "timeout",
            Self::Status(_) => "status",
            Self::UnexpectedContent => "unexpected_content",
            Self::Decode => "decode",
        }
    }
}
