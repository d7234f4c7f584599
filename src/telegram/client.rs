//! Minimal Telegram Bot API client

use super::types::{
    AnswerCallbackQuery, ApiResponse, File, GetFile, GetUpdates, SendMessage, Update, User,
};
use crate::runtime::ChannelError;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];
/// Slack on top of the long-poll timeout before the HTTP request itself gives up
const POLL_GRACE: Duration = Duration::from_secs(15);
pub const PARSE_MODE: &str = "HTML";

/// Bot API client bound to one bot token.
///
/// The token is part of every URL, so transport errors are stripped of their
/// URL before they leave this module.
pub struct BotApi {
    client: Client,
    method_base: String,
    file_base: String,
}

impl BotApi {
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self, ChannelError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        let api_url = api_url.trim_end_matches('/');

        Ok(Self {
            client,
            method_base: format!("{api_url}/bot{token}"),
            file_base: format!("{api_url}/file/bot{token}"),
        })
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, ChannelError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.method_base))
            .json(params)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    pub async fn get_me(&self) -> Result<User, ChannelError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, ChannelError> {
        let params = GetUpdates {
            offset,
            timeout: timeout_secs,
            allowed_updates: ALLOWED_UPDATES,
        };
        let response = self
            .client
            .post(format!("{}/getUpdates", self.method_base))
            .timeout(Duration::from_secs(timeout_secs).saturating_add(POLL_GRACE))
            .json(&params)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    pub async fn send_message(&self, params: &SendMessage<'_>) -> Result<(), ChannelError> {
        let _: serde_json::Value = self.call("sendMessage", params).await?;
        Ok(())
    }

    pub async fn send_photo(&self, chat_id: i64, image: Vec<u8>, caption: &str) -> Result<(), ChannelError> {
        let photo = Part::bytes(image).file_name("result.jpg");
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .text("parse_mode", PARSE_MODE)
            .part("photo", photo);

        let response = self
            .client
            .post(format!("{}/sendPhoto", self.method_base))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let _: serde_json::Value = decode(response).await?;
        Ok(())
    }

    pub async fn get_file(&self, file_id: &str) -> Result<File, ChannelError> {
        self.call("getFile", &GetFile { file_id }).await
    }

    pub async fn download_file(&self, file_path: &str) -> Result<Vec<u8>, ChannelError> {
        let response = self
            .client
            .get(format!("{}/{file_path}", self.file_base))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChannelError::Api {
                code: i64::from(status.as_u16()),
                description: "file download failed".to_string(),
            });
        }
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }

    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), ChannelError> {
        let _: bool = self
            .call("answerCallbackQuery", &AnswerCallbackQuery { callback_query_id })
            .await?;
        Ok(())
    }
}

fn transport(e: reqwest::Error) -> ChannelError {
    ChannelError::Transport(e.without_url().to_string())
}

/// Unwrap the `{ ok, result }` envelope; error statuses still carry one
async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ChannelError> {
    let status = response.status();
    let body = response.bytes().await.map_err(transport)?;
    let envelope: ApiResponse<R> = serde_json::from_slice(&body)
        .map_err(|e| ChannelError::Decode(format!("HTTP {status}: {e}")))?;

    if envelope.ok {
        envelope
            .result
            .ok_or_else(|| ChannelError::Decode("response has no result".to_string()))
    } else {
        Err(ChannelError::Api {
            code: envelope
                .error_code
                .unwrap_or_else(|| i64::from(status.as_u16())),
            description: envelope.description.unwrap_or_default(),
        })
    }
}
