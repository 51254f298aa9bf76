//! Bot API wire types
//!
//! Only the fields the bot reads or writes are modelled; serde ignores the
//! rest of each payload.

use crate::order::GeoPoint;
use crate::session::{ChatId, Command, Inbound};
use crate::state_machine::{Keyboard, ShareRequest};
use serde::{Deserialize, Serialize};

/// Envelope around every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub error_code: Option<u16>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
    pub contact: Option<Contact>,
    pub location: Option<Location>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct Contact {
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct GetUpdates {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyKeyboardMarkup>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct KeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub request_contact: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub request_location: bool,
}

impl Message {
    /// Classify a message as bot input. Unsupported kinds yield `None`.
    pub fn into_inbound(self) -> Option<(ChatId, Inbound)> {
        let chat = ChatId(self.chat.id);
        if let Some(contact) = self.contact {
            return Some((
                chat,
                Inbound::Contact {
                    phone: contact.phone_number,
                },
            ));
        }
        if let Some(location) = self.location {
            return Some((
                chat,
                Inbound::Location(GeoPoint {
                    latitude: location.latitude,
                    longitude: location.longitude,
                }),
            ));
        }
        let text = self.text?;
        let inbound = match Command::parse(&text) {
            Some(command) => Inbound::Command(command),
            None => Inbound::Text(text),
        };
        Some((chat, inbound))
    }
}

impl ReplyKeyboardMarkup {
    /// Markup for a keyboard, or `None` to leave the current one in place
    pub fn from_keyboard(keyboard: &Keyboard) -> Option<Self> {
        match keyboard {
            Keyboard::Keep => None,
            Keyboard::Choices(rows) => Some(ReplyKeyboardMarkup {
                keyboard: rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|choice| KeyboardButton {
                                text: choice.label.clone(),
                                request_contact: choice.request == Some(ShareRequest::Contact),
                                request_location: choice.request == Some(ShareRequest::Location),
                            })
                            .collect()
                    })
                    .collect(),
                resize_keyboard: true,
            }),
        }
    }
}
