//! Mock implementations for testing
//!
//! These mocks enable runtime testing without real I/O.

use super::traits::*;
use crate::generation::GenerationError;
use crate::state_machine::{BagColor, ChatId, Keyboard, PhotoRef, UserId};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Chat Channel
// ============================================================================

/// Something the bot sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
        keyboard: Keyboard,
    },
    Image {
        chat_id: ChatId,
        image: Vec<u8>,
        caption: String,
    },
}

/// Chat channel that records outgoing messages and serves registered photos
pub struct MockChannel {
    photos: Mutex<HashMap<String, Vec<u8>>>,
    sent: Mutex<Vec<Sent>>,
    fail_sends: AtomicBool,
    /// Notified after every send
    pub sent_notify: Notify,
}

#[allow(dead_code)]
impl MockChannel {
    pub fn new() -> Self {
        Self {
            photos: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            fail_sends: AtomicBool::new(false),
            sent_notify: Notify::new(),
        }
    }

    /// Make `download_photo` succeed for this reference
    pub fn add_photo(&self, file_id: &str, bytes: Vec<u8>) {
        self.photos.lock().unwrap().insert(file_id.to_string(), bytes);
    }

    /// Make every send fail after being recorded
    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent.lock().unwrap().iter().rev().find_map(|s| match s {
            Sent::Text { text, .. } => Some(text.clone()),
            Sent::Image { .. } => None,
        })
    }

    /// Wait until at least `count` messages have been sent
    pub async fn wait_for_sent(&self, count: usize) {
        let wait = async {
            loop {
                let notified = self.sent_notify.notified();
                if self.sent.lock().unwrap().len() >= count {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("timed out waiting for sent messages");
    }

    fn record(&self, sent: Sent) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(sent);
        self.sent_notify.notify_waiters();
        if self.fail_sends.load(Ordering::SeqCst) {
            Err(ChannelError::Transport("mock send failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatChannel for MockChannel {
    async fn send_text(&self, chat_id: ChatId, text: &str, keyboard: &Keyboard) -> Result<(), ChannelError> {
        self.record(Sent::Text {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.clone(),
        })
    }

    async fn send_image(&self, chat_id: ChatId, image: Vec<u8>, caption: &str) -> Result<(), ChannelError> {
        self.record(Sent::Image {
            chat_id,
            image,
            caption: caption.to_string(),
        })
    }

    async fn download_photo(&self, photo: &PhotoRef) -> Result<Vec<u8>, ChannelError> {
        self.photos
            .lock()
            .unwrap()
            .get(photo.as_str())
            .cloned()
            .ok_or_else(|| ChannelError::MissingFile(photo.as_str().to_string()))
    }
}

// ============================================================================
// Mock Image Generator
// ============================================================================

/// Generator that returns queued results and records every call
pub struct MockGenerator {
    results: Mutex<VecDeque<Result<Vec<u8>, GenerationError>>>,
    calls: Mutex<Vec<(Vec<u8>, BagColor, UserId)>>,
}

#[allow(dead_code)]
impl MockGenerator {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_image(&self, image: Vec<u8>) {
        self.results.lock().unwrap().push_back(Ok(image));
    }

    pub fn queue_error(&self, error: GenerationError) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_calls(&self) -> Vec<(Vec<u8>, BagColor, UserId)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerator for MockGenerator {
    async fn generate(&self, image: Vec<u8>, choice: BagColor, user_id: UserId) -> Result<Vec<u8>, GenerationError> {
        self.calls.lock().unwrap().push((image, choice, user_id));
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::transport("No mock result queued")))
    }
}
