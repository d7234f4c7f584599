//! In-process stand-in for the Bot API, for tests

use super::BotApi;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TOKEN: &str = "TEST";
pub const PHOTO_BYTES: &[u8] = b"\xff\xd8 user photo";

/// A request the fake received
#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Call {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Clone, Default)]
struct Shared {
    updates: Arc<Mutex<Vec<Value>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

#[derive(Clone)]
pub struct FakeTelegram {
    pub base: String,
    shared: Shared,
}

impl FakeTelegram {
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let shared = Shared::default();

        let app = Router::new()
            .route(&format!("/bot{TOKEN}/:method"), post(method_handler))
            .route(&format!("/file/bot{TOKEN}/*path"), get(file_handler))
            .with_state(shared.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base, shared }
    }

    pub fn api(&self) -> BotApi {
        BotApi::new(&self.base, TOKEN, Duration::from_secs(5)).unwrap()
    }

    pub fn push_update(&self, update: Value) {
        self.shared.updates.lock().unwrap().push(update);
    }

    pub fn calls(&self, method: &str) -> Vec<Call> {
        self.shared
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    pub fn seen_offsets(&self) -> Vec<i64> {
        self.calls("getUpdates")
            .iter()
            .filter_map(|c| c.json().get("offset").and_then(Value::as_i64))
            .collect()
    }

    pub fn answered_callbacks(&self) -> Vec<String> {
        self.calls("answerCallbackQuery")
            .iter()
            .filter_map(|c| {
                c.json()
                    .get("callback_query_id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .collect()
    }
}

fn ok(result: Value) -> Response {
    Json(json!({ "ok": true, "result": result })).into_response()
}

fn api_error(code: u16, description: &str) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (
        status,
        Json(json!({ "ok": false, "error_code": code, "description": description })),
    )
        .into_response()
}

async fn method_handler(
    State(shared): State<Shared>,
    Path(method): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let call = Call {
        method: method.clone(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
        body: body.to_vec(),
    };
    let params = call.json();
    shared.calls.lock().unwrap().push(call);

    let sent_message = json!({ "message_id": 77, "chat": { "id": 300, "type": "private" }, "date": 0 });

    match method.as_str() {
        "getMe" => ok(json!({ "id": 1, "is_bot": true, "first_name": "Nano", "username": "nano_bot" })),
        "getUpdates" => {
            let offset = params.get("offset").and_then(Value::as_i64).unwrap_or(0);
            let pending: Vec<Value> = shared
                .updates
                .lock()
                .unwrap()
                .iter()
                .filter(|u| u.get("update_id").and_then(Value::as_i64).unwrap_or(0) >= offset)
                .cloned()
                .collect();
            if pending.is_empty() {
                // Behave like a short long-poll
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            ok(Value::Array(pending))
        }
        "sendMessage" | "sendPhoto" => ok(sent_message),
        "answerCallbackQuery" => ok(Value::Bool(true)),
        "getFile" => match params.get("file_id").and_then(Value::as_str) {
            Some("known") => ok(json!({ "file_id": "known", "file_unique_id": "k", "file_path": "photos/file_1.jpg" })),
            Some("no-path") => ok(json!({ "file_id": "no-path", "file_unique_id": "n" })),
            _ => api_error(400, "Bad Request: invalid file_id"),
        },
        _ => api_error(404, "Not Found"),
    }
}

async fn file_handler(Path(path): Path<String>) -> Response {
    if path == "photos/file_1.jpg" {
        ([(header::CONTENT_TYPE, "image/jpeg")], PHOTO_BYTES).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
