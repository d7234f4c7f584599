//! Core session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod choice;
mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use choice::BagColor;
pub use effect::{Effect, Keyboard};
pub use event::{ChoiceSource, Event};
pub use state::{ChatId, PhotoRef, Session, SessionContext, SessionState, UserId};
pub use transition::transition;
