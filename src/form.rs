//! Self-hosted choice form
//!
//! Optional: the form can live on any static host, in which case only
//! `WEBAPP_URL` is set and this server never starts.

mod assets;
mod handlers;

use handlers::create_router;

use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

/// Serve the form until `shutdown` fires
pub async fn serve(addr: SocketAddr, shutdown: CancellationToken) -> std::io::Result<()> {
    let compression = CompressionLayer::new().gzip(true).br(true);
    let app = create_router()
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Form server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}
