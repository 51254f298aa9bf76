//! Conversation state types

use crate::catalog::{Catalog, SearchHit};
use crate::config::ShopInfo;
use crate::order::{Customer, GeoPoint};
use std::sync::Arc;

/// Where a chat is in the ordering flow.
///
/// Scratch data lives in the variant that needs it, so a state can never be
/// reached without its prerequisites.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChatState {
    /// Entry point and reset target
    #[default]
    MainMenu,

    /// Choosing a category; also hosts the cart view
    Category,

    /// Choosing an item, either within a browsed category or from search hits
    Item {
        category: Option<String>,
        search_results: Vec<SearchHit>,
    },

    /// Choosing a quantity option for one item
    Quantity { category: String, item: String },

    /// Waiting for a search query
    Search,

    /// Choosing a cart entry to remove
    RemoveItem,

    CheckoutName,

    CheckoutAddress { name: String },

    /// Waiting for a contact card; a location may be shared first
    CheckoutPhone {
        name: String,
        address: String,
        location: Option<GeoPoint>,
    },

    CheckoutPayment { customer: Customer },
}

impl ChatState {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ChatState::MainMenu => "main_menu",
            ChatState::Category => "category",
            ChatState::Item { .. } => "item",
            ChatState::Quantity { .. } => "quantity",
            ChatState::Search => "search",
            ChatState::RemoveItem => "remove_item",
            ChatState::CheckoutName => "checkout_name",
            ChatState::CheckoutAddress { .. } => "checkout_address",
            ChatState::CheckoutPhone { .. } => "checkout_phone",
            ChatState::CheckoutPayment { .. } => "checkout_payment",
        }
    }
}

/// Read-only context shared by every chat
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub catalog: Arc<Catalog>,
    pub shop: ShopInfo,
}

impl ChatContext {
    pub fn new(catalog: Arc<Catalog>, shop: ShopInfo) -> Self {
        Self { catalog, shop }
    }
}
