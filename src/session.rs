//! Per-chat session state
//!
//! A session is owned by exactly one chat runtime task, so no locking is
//! needed here. It lives as long as the process.

use crate::cart::Cart;
use crate::order::GeoPoint;
use crate::state_machine::{ChatState, Choice, Event, Keyboard};
use std::fmt;

/// Telegram chat (or user) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Commands understood in any state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Checkout,
}

impl Command {
    pub fn parse(text: &str) -> Option<Self> {
        // Telegram appends "@botname" in group chats
        let word = text.split_whitespace().next()?;
        let name = word.split('@').next().unwrap_or(word);
        match name {
            "/start" => Some(Command::Start),
            "/checkout" => Some(Command::Checkout),
            _ => None,
        }
    }
}

/// Raw input as delivered by a transport
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Text(String),
    Contact { phone: String },
    Location(GeoPoint),
    Command(Command),
}

#[derive(Debug, Clone)]
pub struct Session {
    pub chat_id: ChatId,
    pub state: ChatState,
    pub cart: Cart,
    /// Buttons from the last keyboard shown to the user
    offered: Vec<Choice>,
}

impl Session {
    pub fn new(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            state: ChatState::MainMenu,
            cart: Cart::new(),
            offered: Vec::new(),
        }
    }

    /// Turn transport input into a state machine event.
    ///
    /// Text equal to the label of an offered button resolves to that
    /// button's id, so handlers never parse display labels.
    pub fn resolve(&self, inbound: Inbound) -> Event {
        match inbound {
            Inbound::Text(text) => {
                let text = text.trim();
                match self.offered.iter().find(|c| c.label == text) {
                    Some(choice) => Event::Choice(choice.id.clone()),
                    None => Event::Text(text.to_string()),
                }
            }
            Inbound::Contact { phone } => {
                let phone = phone.trim();
                Event::Contact {
                    phone: (!phone.is_empty()).then(|| phone.to_string()),
                }
            }
            Inbound::Location(point) => Event::Location(point),
            Inbound::Command(Command::Start) => Event::Restart,
            Inbound::Command(Command::Checkout) => Event::Checkout,
        }
    }

    /// Track the buttons the user can currently press
    pub fn remember_keyboard(&mut self, keyboard: &Keyboard) {
        match keyboard {
            Keyboard::Keep => {}
            Keyboard::Choices(rows) => {
                self.offered = rows.iter().flatten().cloned().collect();
            }
        }
    }
}
