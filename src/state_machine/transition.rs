//! Pure state transition function
//!
//! Given the same session, context and event this always produces the same
//! result. All I/O happens in the runtime when effects are executed.

use super::state::{PhotoRef, Session, SessionContext, SessionState};
use super::{BagColor, ChoiceSource, Effect, Event, Keyboard};
use crate::replies;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            new_session: session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Session unchanged, nothing persisted
    fn stay(session: &Session) -> Self {
        Self::new(session.clone())
    }

    /// Back to `AwaitingInput` with the cleared session written first
    fn reset() -> Self {
        Self::new(Session::default()).with_effect(Effect::PersistSession)
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Invalid transition: no {event} event expected in {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}

pub fn transition(
    session: &Session,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (session.state, event) {
        // ============================================================
        // Explicit reset
        // ============================================================
        (_, Event::Start) => Ok(TransitionResult::reset().with_effect(Effect::text_with(
            replies::welcome(context.form_url.is_some()),
            form_keyboard(context),
        ))),

        // ============================================================
        // Input capture (most recent photo wins)
        // ============================================================
        (SessionState::AwaitingInput | SessionState::AwaitingChoice, Event::Photo { photo }) => {
            Ok(photo_received(context, photo))
        }

        // A form submission arrives as an ordinary message, so it counts as non-image input
        (
            SessionState::AwaitingInput,
            Event::Other
            | Event::ChoiceReceived {
                source: ChoiceSource::Form,
                ..
            },
        ) => Ok(TransitionResult::stay(session).with_effect(Effect::text(replies::photo_required()))),

        // ============================================================
        // Choice handling
        // ============================================================
        (SessionState::AwaitingChoice, Event::ChoiceReceived { value, .. }) => {
            let Ok(choice) = value.parse::<BagColor>() else {
                return Ok(TransitionResult::stay(session)
                    .with_effect(Effect::text(replies::unknown_color())));
            };

            match &session.pending_photo {
                // Inconsistent session: never proceed without an input
                None => Ok(TransitionResult::reset().with_effect(Effect::text(replies::missing_photo()))),
                Some(photo) => Ok(TransitionResult::stay(session)
                    .with_effect(Effect::text_with(replies::processing(choice), Keyboard::Remove))
                    .with_effect(Effect::RequestGeneration {
                        photo: photo.clone(),
                        choice,
                    })),
            }
        }

        // ============================================================
        // Generation outcome
        // ============================================================
        (SessionState::AwaitingChoice, Event::GenerationSucceeded { image }) => {
            Ok(TransitionResult::reset().with_effect(Effect::SendImage {
                image,
                caption: replies::result_caption(),
            }))
        }

        (SessionState::AwaitingChoice, Event::GenerationFailed) => {
            Ok(TransitionResult::reset().with_effect(Effect::text(replies::generation_failed())))
        }

        (SessionState::AwaitingChoice, Event::InputFetchFailed) => {
            Ok(TransitionResult::reset().with_effect(Effect::text(replies::download_failed())))
        }

        // ============================================================
        // Fallthrough
        // ============================================================
        (
            SessionState::AwaitingInput,
            Event::ChoiceReceived {
                source: ChoiceSource::Button,
                ..
            },
        )
        | (SessionState::AwaitingChoice, Event::Other) => {
            Ok(TransitionResult::stay(session).with_effect(Effect::text(replies::help())))
        }

        (
            state @ SessionState::AwaitingInput,
            event @ (Event::GenerationSucceeded { .. } | Event::GenerationFailed | Event::InputFetchFailed),
        ) => Err(TransitionError::InvalidTransition {
            state: state.as_str(),
            event: event.kind(),
        }),
    }
}

fn photo_received(context: &SessionContext, photo: PhotoRef) -> TransitionResult {
    TransitionResult::new(Session::awaiting_choice(photo))
        .with_effect(Effect::PersistSession)
        .with_effect(Effect::text_with(replies::choose_color(), form_keyboard(context)))
        .with_effect(Effect::text_with(replies::quick_choice(), Keyboard::Choices))
}

fn form_keyboard(context: &SessionContext) -> Keyboard {
    match &context.form_url {
        Some(url) => Keyboard::OpenForm { url: url.clone() },
        None => Keyboard::Remove,
    }
}
