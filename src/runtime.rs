//! Runtime for executing sessions
//!
//! Each user gets one worker task that owns the receiving end of a channel.
//! Updates for the same user are handled strictly in order while different
//! users proceed independently. Workers shut down after a period without
//! updates and are started again on the next one.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use traits::*;

use crate::state_machine::{ChatId, Event, SessionContext, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::RwLock;

/// Updates one user may have queued behind a running turn
const WORKER_QUEUE_CAPACITY: usize = 32;
/// How long a worker waits for its next update before it exits
const WORKER_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

type Workers = Arc<RwLock<HashMap<UserId, mpsc::Sender<Inbound>>>>;

/// An event addressed to one user's session
#[derive(Debug)]
pub struct Inbound {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub event: Event,
}

/// Manager for all session runtimes
pub struct SessionManager<S, C, G>
where
    S: SessionStore + 'static,
    C: ChatChannel + 'static,
    G: ImageGenerator + 'static,
{
    store: Arc<S>,
    channel: Arc<C>,
    generator: Arc<G>,
    form_url: Option<String>,
    idle_timeout: Duration,
    /// Enqueueing happens under the read lock; a worker only deregisters
    /// under the write lock.
    workers: Workers,
}

impl<S, C, G> SessionManager<S, C, G>
where
    S: SessionStore + 'static,
    C: ChatChannel + 'static,
    G: ImageGenerator + 'static,
{
    pub fn new(store: Arc<S>, channel: Arc<C>, generator: Arc<G>, form_url: Option<String>) -> Self {
        Self {
            store,
            channel,
            generator,
            form_url,
            idle_timeout: WORKER_IDLE_TIMEOUT,
            workers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[allow(dead_code)] // Used by tests
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Queue an event for its user's worker without waiting on that worker.
    ///
    /// When the user's queue is full the update is dropped and an error
    /// returned; other users are never held up.
    pub async fn dispatch(&self, inbound: Inbound) -> Result<(), String> {
        let user_id = inbound.user_id;

        let inbound = {
            let workers = self.workers.read().await;
            match workers.get(&user_id) {
                Some(tx) => match tx.try_send(inbound) {
                    Ok(()) => return Ok(()),
                    Err(TrySendError::Full(_)) => return Err(backlog_error(user_id)),
                    // Worker died without deregistering; replace it below
                    Err(TrySendError::Closed(inbound)) => inbound,
                },
                None => inbound,
            }
        };

        let mut workers = self.workers.write().await;
        // Another dispatch may have started a worker while we waited for the lock
        let live = workers.get(&user_id).filter(|tx| !tx.is_closed()).cloned();
        let tx = if let Some(tx) = live {
            tx
        } else {
            let tx = self.spawn_worker(user_id);
            workers.insert(user_id, tx.clone());
            tx
        };

        tx.try_send(inbound).map_err(|e| match e {
            TrySendError::Full(_) => backlog_error(user_id),
            TrySendError::Closed(_) => format!("Session worker for user {user_id} is gone"),
        })
    }

    fn spawn_worker(&self, user_id: UserId) -> mpsc::Sender<Inbound> {
        let (event_tx, mut event_rx) = mpsc::channel(WORKER_QUEUE_CAPACITY);
        let runtime = SessionRuntime::new(
            SessionContext::new(user_id, self.form_url.clone()),
            self.store.clone(),
            self.channel.clone(),
            self.generator.clone(),
        );
        let workers = Arc::clone(&self.workers);
        let idle_timeout = self.idle_timeout;

        tokio::spawn(async move {
            tracing::debug!(user_id = %user_id, "Session worker started");
            loop {
                runtime.run(&mut event_rx, idle_timeout).await;

                let mut map = workers.write().await;
                // Queued while we were waiting for the lock
                if !event_rx.is_empty() {
                    continue;
                }
                event_rx.close();
                if map.get(&user_id).is_some_and(mpsc::Sender::is_closed) {
                    map.remove(&user_id);
                }
                break;
            }
            tracing::debug!(user_id = %user_id, "Session worker stopped");
        });

        event_tx
    }

    pub async fn active_workers(&self) -> usize {
        self.workers.read().await.len()
    }
}

fn backlog_error(user_id: UserId) -> String {
    format!("Update queue for user {user_id} is full; update dropped")
}
