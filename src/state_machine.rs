//! Conversation state machine
//!
//! Pure transitions from (state, event) to (state, effects); the runtime
//! owns all I/O.

mod choice;
mod effect;
mod event;
mod menus;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use choice::{Action, Choice, ChoiceId, ShareRequest};
pub use effect::{Effect, Keyboard, Reply};
pub use event::Event;
pub(crate) use menus::{order_failed, order_placed};
pub use state::{ChatContext, ChatState};
pub use transition::transition;
