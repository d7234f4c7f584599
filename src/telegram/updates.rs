//! Turns Bot API updates into session events
//!
//! Both choice surfaces end up as `Event::ChoiceReceived`, tagged with their
//! `ChoiceSource`: inline buttons carry `color:<tag>` callback data, the hosted
//! form sends `{"color": "<tag>"}` as Web App data. Validation of the tag is
//! left to the state machine.

use super::types::{CallbackQuery, Message, Update};
use crate::runtime::Inbound;
use crate::state_machine::{BagColor, ChatId, Event, PhotoRef, UserId};
use serde::Deserialize;

pub const CALLBACK_PREFIX: &str = "color:";
const START_COMMAND: &str = "/start";

pub fn callback_data(color: BagColor) -> String {
    format!("{CALLBACK_PREFIX}{}", color.as_str())
}

/// What the form page posts back through `Telegram.WebApp.sendData`
#[derive(Debug, Deserialize)]
struct FormSubmission {
    #[serde(default)]
    color: Option<String>,
}

/// Extract the choice tag from a form payload.
///
/// Malformed payloads yield an empty tag, which never validates.
pub fn parse_form_payload(data: &str) -> String {
    match serde_json::from_str::<FormSubmission>(data) {
        Ok(submission) => submission.color.unwrap_or_default(),
        Err(e) => {
            tracing::debug!(error = %e, len = data.len(), "Unparseable form payload");
            String::new()
        }
    }
}

/// `None` for updates that carry nothing a session can react to
pub fn to_inbound(update: Update) -> Option<Inbound> {
    if let Some(message) = update.message {
        return from_message(message);
    }
    if let Some(query) = update.callback_query {
        return Some(from_callback(query));
    }
    None
}

fn from_message(message: Message) -> Option<Inbound> {
    // Channel posts and service messages have no sender
    let user_id = UserId(message.from.as_ref()?.id);
    let chat_id = ChatId(message.chat.id);

    let event = if let Some(photo) = message.photo.as_ref().and_then(|sizes| sizes.last()) {
        Event::Photo {
            photo: PhotoRef::new(photo.file_id.clone()),
        }
    } else if let Some(web_app) = &message.web_app_data {
        Event::form_choice(parse_form_payload(&web_app.data))
    } else if message.text.as_deref().is_some_and(is_start_command) {
        Event::Start
    } else {
        Event::Other
    };

    Some(Inbound {
        user_id,
        chat_id,
        event,
    })
}

fn from_callback(query: CallbackQuery) -> Inbound {
    let user_id = UserId(query.from.id);
    // Private chats share the user's id
    let chat_id = query
        .message
        .as_ref()
        .map_or(ChatId(query.from.id), |m| ChatId(m.chat.id));

    let event = match query.data.as_deref().and_then(|d| d.strip_prefix(CALLBACK_PREFIX)) {
        Some(value) => Event::choice(value),
        None => Event::Other,
    };

    Inbound {
        user_id,
        chat_id,
        event,
    }
}

/// `/start`, `/start@bot_name` and `/start <payload>`
fn is_start_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or_default();
    command == START_COMMAND
        || command
            .strip_prefix(START_COMMAND)
            .is_some_and(|rest| rest.starts_with('@'))
}
