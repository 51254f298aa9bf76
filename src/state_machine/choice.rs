//! Structured choices offered to the user
//!
//! Every button carries a [`ChoiceId`] next to its display label. Handlers
//! match on the id; the label is only ever compared verbatim when resolving
//! what the user pressed.

use crate::cart::{format_price, LineItem};
use crate::catalog::{QuantityOption, SearchHit};

/// Fixed navigation and command buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Browse,
    Search,
    About,
    Contact,
    Back,
    Cancel,
    ViewCart,
    Checkout,
    RemoveItems,
    AddMore,
    Retry,
    PayNow,
    CashOnDelivery,
    ShareLocation,
    ShareContact,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Browse => "🍭 Shop Now",
            Action::Search => "🔍 Search",
            Action::About => "ℹ About Us",
            Action::Contact => "📞 Contact Us",
            Action::Back => "🔙 Back",
            Action::Cancel => "🔙 Cancel",
            Action::ViewCart => "🛒 View Cart",
            Action::Checkout => "✅ Checkout",
            Action::RemoveItems => "🗑 Remove Items",
            Action::AddMore => "➕ Add More Items",
            Action::Retry => "🔁 Try Again",
            Action::PayNow => "💳 Pay Now",
            Action::CashOnDelivery => "💵 Cash on Delivery",
            Action::ShareLocation => "📍 Share Location",
            Action::ShareContact => "📱 Share Contact",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceId {
    Action(Action),
    Category(String),
    /// An item together with the category that owns it
    Item { category: String, item: String },
    /// A quantity option label of the item being selected
    Quantity(String),
    /// A cart entry offered for removal
    CartLine(LineItem),
}

/// Buttons that ask the client to share something instead of sending text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareRequest {
    Contact,
    Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: ChoiceId,
    pub label: String,
    pub request: Option<ShareRequest>,
}

impl Choice {
    pub fn new(id: ChoiceId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            request: None,
        }
    }

    pub fn action(action: Action) -> Self {
        Self::new(ChoiceId::Action(action), action.label())
    }

    pub fn category(name: &str) -> Self {
        Self::new(ChoiceId::Category(name.to_string()), name)
    }

    pub fn item(hit: &SearchHit) -> Self {
        Self::new(
            ChoiceId::Item {
                category: hit.category.clone(),
                item: hit.item.clone(),
            },
            hit.item.as_str(),
        )
    }

    pub fn quantity(option: &QuantityOption) -> Self {
        Self::new(
            ChoiceId::Quantity(option.label.clone()),
            format!("{} {}", option.label, format_price(option.price)),
        )
    }

    pub fn cart_line(line: &LineItem) -> Self {
        Self::new(ChoiceId::CartLine(line.clone()), line.label())
    }

    pub fn requesting(mut self, request: ShareRequest) -> Self {
        self.request = Some(request);
        self
    }
}
