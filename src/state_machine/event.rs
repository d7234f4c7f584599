//! Events that can occur in a session

use super::state::PhotoRef;
use super::BagColor;

/// Where a choice came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceSource {
    /// Inline button under a bot message
    Button,
    /// Web App form posted into the chat as a message
    Form,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    /// Explicit reset (`/start`)
    Start,
    /// An image attachment
    Photo { photo: PhotoRef },
    /// A choice from either input surface, not yet validated
    ChoiceReceived { value: String, source: ChoiceSource },
    /// Anything else the user sent
    Other,

    // Generation events
    GenerationSucceeded { image: Vec<u8> },
    GenerationFailed,
    /// The stored photo could not be downloaded from the chat platform
    InputFetchFailed,
}

impl Event {
    pub fn choice(value: impl Into<String>) -> Self {
        Event::ChoiceReceived {
            value: value.into(),
            source: ChoiceSource::Button,
        }
    }

    pub fn form_choice(value: impl Into<String>) -> Self {
        Event::ChoiceReceived {
            value: value.into(),
            source: ChoiceSource::Form,
        }
    }

    #[allow(dead_code)] // Test and adapter convenience
    pub fn choice_of(color: BagColor) -> Self {
        Self::choice(color.as_str())
    }

    /// Short name for logging; never includes payload bytes
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::Photo { .. } => "photo",
            Event::ChoiceReceived { .. } => "choice_received",
            Event::Other => "other",
            Event::GenerationSucceeded { .. } => "generation_succeeded",
            Event::GenerationFailed => "generation_failed",
            Event::InputFetchFailed => "input_fetch_failed",
        }
    }
}
