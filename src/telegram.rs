//! Telegram Bot API adapter
//!
//! Inbound: long-polled updates become session events (`updates`, `poller`).
//! Outbound: `TelegramChannel` implements `ChatChannel` over `BotApi`.

mod client;
mod poller;
mod types;
mod updates;

#[cfg(test)]
mod fake;

pub use client::BotApi;
pub use poller::run_polling;

use crate::runtime::{ChannelError, ChatChannel};
use crate::state_machine::{BagColor, ChatId, Keyboard, PhotoRef};
use async_trait::async_trait;
use std::sync::Arc;
use types::{InlineKeyboardButton, KeyboardButton, ReplyMarkup, SendMessage, WebAppInfo};

const FORM_BUTTON_TEXT: &str = "Open the mini app";
const FORM_PLACEHOLDER: &str = "Or pick a colour below";

/// Production chat channel
#[derive(Clone)]
pub struct TelegramChannel {
    api: Arc<BotApi>,
}

impl TelegramChannel {
    pub fn new(api: Arc<BotApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ChatChannel for TelegramChannel {
    async fn send_text(&self, chat_id: ChatId, text: &str, keyboard: &Keyboard) -> Result<(), ChannelError> {
        let params = SendMessage {
            chat_id: chat_id.0,
            text,
            parse_mode: client::PARSE_MODE,
            reply_markup: render_keyboard(keyboard),
        };
        self.api.send_message(&params).await
    }

    async fn send_image(&self, chat_id: ChatId, image: Vec<u8>, caption: &str) -> Result<(), ChannelError> {
        self.api.send_photo(chat_id.0, image, caption).await
    }

    async fn download_photo(&self, photo: &PhotoRef) -> Result<Vec<u8>, ChannelError> {
        let file = self.api.get_file(photo.as_str()).await?;
        let path = file
            .file_path
            .ok_or_else(|| ChannelError::MissingFile(photo.as_str().to_string()))?;
        self.api.download_file(&path).await
    }
}

fn render_keyboard(keyboard: &Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::Keep => None,
        Keyboard::Remove => Some(ReplyMarkup::Remove {
            remove_keyboard: true,
        }),
        Keyboard::Choices => Some(ReplyMarkup::Inline {
            inline_keyboard: BagColor::ALL
                .iter()
                .map(|&color| {
                    vec![InlineKeyboardButton {
                        text: color.label().to_string(),
                        callback_data: updates::callback_data(color),
                    }]
                })
                .collect(),
        }),
        Keyboard::OpenForm { url } => Some(ReplyMarkup::Reply {
            keyboard: vec![vec![KeyboardButton {
                text: FORM_BUTTON_TEXT.to_string(),
                web_app: WebAppInfo { url: url.clone() },
            }]],
            resize_keyboard: true,
            one_time_keyboard: true,
            input_field_placeholder: FORM_PLACEHOLDER.to_string(),
        }),
    }
}
