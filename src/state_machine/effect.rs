//! Effects produced by state transitions

use super::choice::Choice;
use crate::cart::LineItem;
use crate::order::{Customer, PaymentMethod};

/// Keyboard to show alongside a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Leave whatever the user currently sees
    Keep,
    /// Rows of buttons
    Choices(Vec<Vec<Choice>>),
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    /// Text only, keyboard unchanged
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, Keyboard::Keep)
    }

    pub fn with_choices(text: impl Into<String>, rows: Vec<Vec<Choice>>) -> Self {
        Self::new(text, Keyboard::Choices(rows))
    }

    /// Prefix a validation error onto a re-prompt
    #[must_use]
    pub fn with_error(mut self, error: &str) -> Self {
        self.text = format!("❌ {error}\n\n{}", self.text);
        self
    }
}

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send a message to the user
    Reply(Reply),

    /// Append a line to the session cart
    AddToCart(LineItem),

    /// Remove the first cart entry equal to this line
    RemoveFromCart(LineItem),

    /// Empty the session cart
    ClearCart,

    /// Hand the cart to the order dispatcher; the runtime reports the outcome
    PlaceOrder {
        customer: Customer,
        payment: PaymentMethod,
    },
}
