//! Telegram Bot API transport
//!
//! Long-polls `getUpdates` for input and delivers replies and order
//! notifications with `sendMessage`.

mod poller;
pub mod types;

pub use poller::run_poller;

use crate::runtime::{NotificationSink, ReplySink, SinkError};
use crate::session::ChatId;
use crate::state_machine::Reply;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use types::{ApiResponse, GetUpdates, ReplyKeyboardMarkup, SendMessage, Update};

/// Slack on top of the long-poll timeout before the HTTP client gives up
const REQUEST_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TelegramError {
    /// Transport failure. The URL is stripped because it contains the token.
    #[error("request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("Bot API error {code}: {description}")]
    Api { code: u16, description: String },
    #[error("malformed Bot API response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        TelegramError::Http(e.without_url())
    }
}

pub struct TelegramClient {
    client: Client,
    base_url: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str, poll_timeout: Duration) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(poll_timeout + REQUEST_GRACE)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
            poll_timeout,
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            TelegramError::Decode(format!("{method} returned HTTP {status}: {e}"))
        })?;

        if !parsed.ok {
            return Err(TelegramError::Api {
                code: parsed.error_code.unwrap_or(status.as_u16()),
                description: parsed.description.unwrap_or_default(),
            });
        }
        parsed
            .result
            .ok_or_else(|| TelegramError::Decode(format!("{method} returned no result")))
    }

    /// Fetch updates after `offset`, waiting up to the poll timeout
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdates {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: vec!["message"],
        };
        self.call("getUpdates", &request).await
    }

    pub async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        reply_markup: Option<ReplyKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        let request = SendMessage {
            chat_id: chat.0,
            text,
            reply_markup,
        };
        // The sent message echoed back is of no use here
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }
}

#[async_trait]
impl ReplySink for TelegramClient {
    async fn send_reply(&self, chat: ChatId, reply: &Reply) -> Result<(), SinkError> {
        self.send_message(chat, &reply.text, ReplyKeyboardMarkup::from_keyboard(&reply.keyboard))
            .await
            .map_err(|e| SinkError(e.to_string()))
    }
}

#[async_trait]
impl NotificationSink for TelegramClient {
    async fn notify(&self, recipient: ChatId, text: &str) -> Result<(), SinkError> {
        self.send_message(recipient, text, None)
            .await
            .map_err(|e| SinkError(e.to_string()))
    }
}
