//! Nano Banana bot
//!
//! A Telegram bot that takes a customer photo and a bag colour, sends both to
//! an external image-generation flow and returns the finished picture.

mod config;
mod form;
mod generation;
mod replies;
mod runtime;
mod session;
mod state_machine;
mod telegram;

use config::BotConfig;
use generation::{FlowClient, LoggingGenerator};
use runtime::SessionManager;
use session::InMemorySessionStore;
use std::sync::Arc;
use std::time::Duration;
use telegram::{run_polling, BotApi, TelegramChannel};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Timeout for ordinary Bot API calls; `getUpdates` sets its own
const TELEGRAM_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nano_banana_bot=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    let api = Arc::new(BotApi::new(&config.telegram_api_url, &config.bot_token, TELEGRAM_TIMEOUT)?);
    let me = api.get_me().await?;
    tracing::info!(bot_id = me.id, username = ?me.username, "Connected to Telegram");

    let flow = FlowClient::new(&config.flow_config())?;
    tracing::info!(
        authenticated = config.flow_api_key.is_some(),
        timeout_secs = config.flow_timeout.as_secs(),
        "Generation client ready"
    );

    if config.webapp_url.is_none() {
        tracing::info!("WEBAPP_URL not set; colour choice via inline buttons only");
    }

    let manager = SessionManager::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(TelegramChannel::new(api.clone())),
        Arc::new(LoggingGenerator::new(flow)),
        config.webapp_url.clone(),
    );

    let shutdown = CancellationToken::new();

    let form_server = config.form_bind_addr.map(|addr| {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = form::serve(addr, shutdown).await {
                tracing::error!(error = %e, %addr, "Form server failed");
            }
        })
    });

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                return;
            }
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        });
    }

    run_polling(&api, &manager, config.poll_timeout_secs, shutdown.clone()).await;

    shutdown.cancel();
    if let Some(handle) = form_server {
        handle.await?;
    }

    tracing::info!(active_sessions = manager.active_workers().await, "Bot stopped");
    Ok(())
}
