//! Shopping cart for a single session
//!
//! Entries are kept in insertion order and never merged: adding the same
//! item and quantity twice yields two lines.

use crate::catalog::Price;
use std::fmt;

const CURRENCY: &str = "₹";

/// Render a price with the shop currency
pub fn format_price(price: Price) -> String {
    format!("{CURRENCY}{price}")
}

/// One (item, quantity, price) entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub item: String,
    pub quantity: String,
    pub price: Price,
}

impl LineItem {
    pub fn new(item: impl Into<String>, quantity: impl Into<String>, price: Price) -> Self {
        Self {
            item: item.into(),
            quantity: quantity.into(),
            price,
        }
    }

    /// Display label, also used as the removal button text
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}", self.item, self.quantity, format_price(self.price))
    }
}

/// Snapshot of the cart contents with their total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartListing<'a> {
    pub items: &'a [LineItem],
    pub total: Price,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, line: LineItem) {
        self.items.push(line);
    }

    /// Remove the first entry matching `predicate`.
    ///
    /// Returns `None` ("not found") and leaves the cart untouched when
    /// nothing matches.
    pub fn remove_first<F>(&mut self, predicate: F) -> Option<LineItem>
    where
        F: Fn(&LineItem) -> bool,
    {
        let index = self.items.iter().position(predicate)?;
        Some(self.items.remove(index))
    }

    pub fn list(&self) -> CartListing<'_> {
        CartListing {
            items: &self.items,
            total: self.total(),
        }
    }

    pub fn total(&self) -> Price {
        self.items.iter().map(|line| line.price).sum()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn find_by_label(&self, label: &str) -> Option<&LineItem> {
        self.items.iter().find(|line| line.label() == label)
    }

    pub fn contains(&self, line: &LineItem) -> bool {
        self.items.contains(line)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
