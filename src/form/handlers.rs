//! HTTP handlers for the form server

use super::assets::{index_html, serve_static, INDEX};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

pub fn create_router() -> Router {
    Router::new()
        .route("/", get(serve_form))
        .route(&format!("/{INDEX}"), get(serve_form))
        .route("/healthz", get(healthz))
        .fallback(serve_static)
}

async fn serve_form() -> impl IntoResponse {
    match index_html() {
        Some(content) => Html(content).into_response(),
        None => (StatusCode::NOT_FOUND, Html("<h1>404 - form page missing</h1>")).into_response(),
    }
}

async fn healthz() -> &'static str {
    "ok"
}
