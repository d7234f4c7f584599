//! Long-polling update loop

use super::updates::to_inbound;
use super::BotApi;
use crate::runtime::{ChatChannel, ImageGenerator, SessionManager, SessionStore};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Pause after a failed `getUpdates` before polling again
const POLL_ERROR_PAUSE: Duration = Duration::from_secs(5);

/// Receive updates until `shutdown` fires, handing each one to its session.
///
/// Dispatch never waits on a busy session, so a slow generation for one user
/// never stalls polling for the others.
pub async fn run_polling<S, C, G>(
    api: &BotApi,
    manager: &SessionManager<S, C, G>,
    poll_timeout_secs: u64,
    shutdown: CancellationToken,
) where
    S: SessionStore + 'static,
    C: ChatChannel + 'static,
    G: ImageGenerator + 'static,
{
    let mut offset = 0_i64;
    tracing::info!("Polling for updates");

    loop {
        let updates = tokio::select! {
            () = shutdown.cancelled() => break,
            result = api.get_updates(offset, poll_timeout_secs) => result,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed");
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    () = tokio::time::sleep(POLL_ERROR_PAUSE) => continue,
                }
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);

            // Stop the client-side spinner regardless of how the press is handled
            if let Some(query) = &update.callback_query {
                if let Err(e) = api.answer_callback_query(&query.id).await {
                    tracing::warn!(error = %e, "Failed to answer callback query");
                }
            }

            let update_id = update.update_id;
            let Some(inbound) = to_inbound(update) else {
                tracing::debug!(update_id, "Ignoring update");
                continue;
            };
            tracing::debug!(
                update_id,
                user_id = %inbound.user_id,
                event = inbound.event.kind(),
                "Dispatching update"
            );
            if let Err(e) = manager.dispatch(inbound).await {
                tracing::error!(update_id, error = %e, "Failed to dispatch update");
            }
        }
    }

    tracing::info!("Polling stopped");
}
