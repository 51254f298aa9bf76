//! Events that can occur in a chat

use super::choice::ChoiceId;
use crate::order::GeoPoint;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Free text that matched no offered button
    Text(String),
    /// An offered button was pressed
    Choice(ChoiceId),
    /// A shared contact card; `None` when it carried no phone number
    Contact { phone: Option<String> },
    /// A shared location
    Location(GeoPoint),
    /// `/start`: reset the session from any state
    Restart,
    /// `/checkout`: begin checkout from any state
    Checkout,
}
