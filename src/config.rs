//! Startup configuration from environment variables
//!
//! Any error here is fatal: the bot refuses to start without credentials,
//! recipients or a staff roster.

use crate::session::ChatId;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has an invalid chat id: {value:?}")]
    InvalidChatId { name: &'static str, value: String },
    #[error("STAFF_IDS must list at least one staff chat id")]
    EmptyStaffRoster,
    #[error("POLL_TIMEOUT_SECS must be a whole number of seconds: {0:?}")]
    InvalidPollTimeout(String),
}

/// Static shop texts shown from the main menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopInfo {
    pub name: String,
    pub about: String,
    pub contact: String,
}

impl Default for ShopInfo {
    fn default() -> Self {
        Self {
            name: "Basketo Grocery Bot".to_string(),
            about: "🏪 Basketo is your trusted Kerala-based grocery service!".to_string(),
            contact: "📞 9876543210\n📍 Kerala\n🕒 8 AM to 8 PM".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub admin: ChatId,
    pub group: ChatId,
    pub staff: Vec<ChatId>,
    pub catalog_path: PathBuf,
    pub api_url: String,
    pub poll_timeout: Duration,
    pub shop: ShopInfo,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let bot_token = required("BOT_TOKEN")?;
        let admin = parse_chat_id("ADMIN_ID", &required("ADMIN_ID")?)?;
        let group = parse_chat_id("GROUP_ID", &required("GROUP_ID")?)?;

        let staff = required("STAFF_IDS")?
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| parse_chat_id("STAFF_IDS", id))
            .collect::<Result<Vec<_>, _>>()?;
        if staff.is_empty() {
            return Err(ConfigError::EmptyStaffRoster);
        }

        let poll_timeout = match get("POLL_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidPollTimeout(raw))?,
            None => Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
        };

        let defaults = ShopInfo::default();
        let shop = ShopInfo {
            name: get("SHOP_NAME").unwrap_or(defaults.name),
            about: get("SHOP_ABOUT").unwrap_or(defaults.about),
            contact: get("SHOP_CONTACT").unwrap_or(defaults.contact),
        };

        Ok(Self {
            bot_token,
            admin,
            group,
            staff,
            catalog_path: get("CATALOG_PATH")
                .map_or_else(|| PathBuf::from("items.json"), PathBuf::from),
            api_url: get("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            poll_timeout,
            shop,
        })
    }
}

fn parse_chat_id(name: &'static str, value: &str) -> Result<ChatId, ConfigError> {
    value
        .trim()
        .parse()
        .map(ChatId)
        .map_err(|_| ConfigError::InvalidChatId {
            name,
            value: value.to_string(),
        })
}
