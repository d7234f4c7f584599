//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::generation::GenerationError;
use crate::state_machine::{BagColor, ChatId, Keyboard, PhotoRef, Session, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Per-user session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current session, `None` when the user has none
    async fn get(&self, user_id: UserId) -> Option<Session>;

    /// Record the photo and enter `AwaitingChoice`
    async fn set_input(&self, user_id: UserId, photo: PhotoRef);

    /// Drop the session; the user is back at `AwaitingInput`
    async fn clear(&self, user_id: UserId);
}

/// Errors talking to the chat platform
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("API error {code}: {description}")]
    Api { code: i64, description: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("file {0} has no download path")]
    MissingFile(String),
}

/// Outbound side of the chat platform
#[async_trait]
pub trait ChatChannel: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str, keyboard: &Keyboard) -> Result<(), ChannelError>;

    async fn send_image(&self, chat_id: ChatId, image: Vec<u8>, caption: &str) -> Result<(), ChannelError>;

    /// Fetch the bytes behind a photo reference
    async fn download_photo(&self, photo: &PhotoRef) -> Result<Vec<u8>, ChannelError>;
}

/// External image generation
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, image: Vec<u8>, choice: BagColor, user_id: UserId) -> Result<Vec<u8>, GenerationError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get(&self, user_id: UserId) -> Option<Session> {
        (**self).get(user_id).await
    }

    async fn set_input(&self, user_id: UserId, photo: PhotoRef) {
        (**self).set_input(user_id, photo).await;
    }

    async fn clear(&self, user_id: UserId) {
        (**self).clear(user_id).await;
    }
}

#[async_trait]
impl<T: ChatChannel + ?Sized> ChatChannel for Arc<T> {
    async fn send_text(&self, chat_id: ChatId, text: &str, keyboard: &Keyboard) -> Result<(), ChannelError> {
        (**self).send_text(chat_id, text, keyboard).await
    }

    async fn send_image(&self, chat_id: ChatId, image: Vec<u8>, caption: &str) -> Result<(), ChannelError> {
        (**self).send_image(chat_id, image, caption).await
    }

    async fn download_photo(&self, photo: &PhotoRef) -> Result<Vec<u8>, ChannelError> {
        (**self).download_photo(photo).await
    }
}

#[async_trait]
impl<T: ImageGenerator + ?Sized> ImageGenerator for Arc<T> {
    async fn generate(&self, image: Vec<u8>, choice: BagColor, user_id: UserId) -> Result<Vec<u8>, GenerationError> {
        (**self).generate(image, choice, user_id).await
    }
}
