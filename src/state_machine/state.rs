//! Session state types

use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Chat-platform user identity; the session key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat to reply into for the current turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to an image held by the chat platform.
///
/// The bytes are only fetched when generation is actually requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotoRef(pub String);

impl PhotoRef {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self(file_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Session
// ============================================================================

/// Conversation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for the user's photo
    #[default]
    AwaitingInput,
    /// Photo recorded, waiting for a bag colour
    AwaitingChoice,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::AwaitingInput => "awaiting_input",
            SessionState::AwaitingChoice => "awaiting_choice",
        }
    }
}

/// Per-user conversation progress.
///
/// An absent session is equivalent to `Session::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub state: SessionState,
    /// Present only once `AwaitingChoice` has been entered
    pub pending_photo: Option<PhotoRef>,
}

impl Session {
    pub fn awaiting_choice(photo: PhotoRef) -> Self {
        Self {
            state: SessionState::AwaitingChoice,
            pending_photo: Some(photo),
        }
    }

    #[allow(dead_code)] // Used by tests
    pub fn is_fresh(&self) -> bool {
        self.state == SessionState::AwaitingInput && self.pending_photo.is_none()
    }
}

// ============================================================================
// Context
// ============================================================================

/// Immutable per-user configuration for transitions
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: UserId,
    /// When set, prompts carry an "open form" affordance
    pub form_url: Option<String>,
}

impl SessionContext {
    pub fn new(user_id: UserId, form_url: Option<String>) -> Self {
        Self { user_id, form_url }
    }
}
