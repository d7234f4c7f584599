//! Embedded form page

use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "webapp"]
struct Assets;

pub const INDEX: &str = "index.html";

/// Serve an embedded file by request path, 404 when absent
pub async fn serve_static(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

pub fn index_html() -> Option<String> {
    let content = Assets::get(INDEX)?;
    String::from_utf8(content.data.into_owned()).ok()
}
