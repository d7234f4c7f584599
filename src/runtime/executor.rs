//! Per-user session runtime

use super::traits::{ChatChannel, ImageGenerator, SessionStore};
use super::Inbound;
use crate::state_machine::{transition, ChatId, Effect, Event, Session, SessionContext, SessionState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Drives one user's session: runs transitions and executes their effects.
///
/// A runtime handles one turn at a time, so the same session is never touched
/// by two handlers concurrently.
pub struct SessionRuntime<S, C, G>
where
    S: SessionStore + 'static,
    C: ChatChannel + 'static,
    G: ImageGenerator + 'static,
{
    context: SessionContext,
    store: Arc<S>,
    channel: Arc<C>,
    generator: Arc<G>,
}

impl<S, C, G> SessionRuntime<S, C, G>
where
    S: SessionStore + 'static,
    C: ChatChannel + 'static,
    G: ImageGenerator + 'static,
{
    pub fn new(context: SessionContext, store: Arc<S>, channel: Arc<C>, generator: Arc<G>) -> Self {
        Self {
            context,
            store,
            channel,
            generator,
        }
    }

    /// Handle turns in order until the channel closes or has been empty for
    /// `idle_timeout`.
    pub async fn run(&self, event_rx: &mut mpsc::Receiver<Inbound>, idle_timeout: Duration) {
        loop {
            let inbound = match tokio::time::timeout(idle_timeout, event_rx.recv()).await {
                Ok(Some(inbound)) => inbound,
                Ok(None) | Err(_) => return,
            };

            let span = tracing::info_span!(
                "turn",
                user_id = %self.context.user_id,
                chat_id = %inbound.chat_id,
                turn_id = %uuid::Uuid::new_v4(),
            );
            if let Err(e) = self
                .process_turn(inbound.chat_id, inbound.event)
                .instrument(span)
                .await
            {
                tracing::error!(user_id = %self.context.user_id, error = %e, "Error handling turn");
            }
        }
    }

    /// Handle one user event, including any events its effects generate.
    pub async fn process_turn(&self, chat_id: ChatId, event: Event) -> Result<(), String> {
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            let session = self
                .store
                .get(self.context.user_id)
                .await
                .unwrap_or_default();
            let event_kind = current_event.kind();

            // Pure state transition
            let result = transition(&session, &self.context, current_event).map_err(|e| e.to_string())?;

            tracing::info!(
                event = event_kind,
                from = session.state.as_str(),
                to = result.new_session.state.as_str(),
                "Session transition"
            );

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(chat_id, &result.new_session, effect).await {
                    events_to_process.push(generated_event);
                }
            }
        }

        Ok(())
    }

    async fn execute_effect(&self, chat_id: ChatId, new_session: &Session, effect: Effect) -> Option<Event> {
        let user_id = self.context.user_id;
        tracing::debug!(effect = effect.kind(), "Executing effect");
        match effect {
            Effect::PersistSession => {
                match (new_session.state, &new_session.pending_photo) {
                    (SessionState::AwaitingChoice, Some(photo)) => {
                        self.store.set_input(user_id, photo.clone()).await;
                    }
                    _ => self.store.clear(user_id).await,
                }
                None
            }

            Effect::SendText { text, keyboard } => {
                if let Err(e) = self.channel.send_text(chat_id, &text, &keyboard).await {
                    tracing::warn!(error = %e, "Failed to send message");
                }
                None
            }

            Effect::SendImage { image, caption } => {
                let size = image.len();
                if let Err(e) = self.channel.send_image(chat_id, image, &caption).await {
                    tracing::error!(error = %e, size, "Failed to deliver generated image");
                }
                None
            }

            Effect::RequestGeneration { photo, choice } => {
                let input = match self.channel.download_photo(&photo).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::error!(error = %e, photo = photo.as_str(), "Failed to download photo");
                        return Some(Event::InputFetchFailed);
                    }
                };

                match self.generator.generate(input, choice, user_id).await {
                    Ok(image) => Some(Event::GenerationSucceeded { image }),
                    // Cause already logged by the generator
                    Err(_) => Some(Event::GenerationFailed),
                }
            }
        }
    }
}
