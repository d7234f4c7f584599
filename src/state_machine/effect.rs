//! Effects produced by state transitions

use super::state::PhotoRef;
use super::BagColor;

/// Keyboard attached to an outgoing text message.
///
/// Surface-neutral; the chat adapter decides how each variant is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Leave whatever the client currently shows
    Keep,
    /// Hide a previously shown reply keyboard
    Remove,
    /// One inline button per `BagColor`
    Choices,
    /// A button that opens the hosted choice form
    OpenForm { url: String },
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write the new session to the store
    PersistSession,

    /// Send a text message to the current chat
    SendText { text: String, keyboard: Keyboard },

    /// Download the stored photo and call the generation service.
    /// Produces a generation outcome event.
    RequestGeneration { photo: PhotoRef, choice: BagColor },

    /// Deliver a generated image
    SendImage { image: Vec<u8>, caption: String },
}

impl Effect {
    pub fn text(text: impl Into<String>) -> Self {
        Effect::SendText {
            text: text.into(),
            keyboard: Keyboard::Keep,
        }
    }

    pub fn text_with(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Effect::SendText {
            text: text.into(),
            keyboard,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Effect::PersistSession => "persist_session",
            Effect::SendText { .. } => "send_text",
            Effect::RequestGeneration { .. } => "request_generation",
            Effect::SendImage { .. } => "send_image",
        }
    }
}
