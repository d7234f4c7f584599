//! In-memory session store
//!
//! Sessions live for the lifetime of the process unless cleared. Every write
//! swaps the whole `Session` for a key under one lock acquisition.

use crate::runtime::SessionStore;
use crate::state_machine::{PhotoRef, Session, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<UserId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)] // Diagnostics and tests
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: UserId) -> Option<Session> {
        self.sessions.read().await.get(&user_id).cloned()
    }

    async fn set_input(&self, user_id: UserId, photo: PhotoRef) {
        self.sessions
            .write()
            .await
            .insert(user_id, Session::awaiting_choice(photo));
    }

    async fn clear(&self, user_id: UserId) {
        self.sessions.write().await.remove(&user_id);
    }
}
