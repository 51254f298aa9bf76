//! Orders and the process-wide allocators behind them

mod dispatcher;
mod summary;

pub use dispatcher::OrderDispatcher;

use crate::cart::LineItem;
use crate::catalog::Price;
use crate::session::ChatId;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId(u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ORD-{:04}", self.0)
    }
}

/// A location shared by the customer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn map_link(&self) -> String {
        format!(
            "https://maps.google.com/?q={},{}",
            self.latitude, self.longitude
        )
    }
}

/// Delivery details collected during checkout
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub name: String,
    pub address: String,
    /// `None` when the shared contact carried no usable number
    pub phone: Option<String>,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        }
    }
}

/// A confirmed order. Never modified after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub payment: PaymentMethod,
    pub line_items: Vec<LineItem>,
    pub total: Price,
    pub assigned_staff: ChatId,
    pub placed_at: DateTime<Utc>,
}

/// Hands out order ids 1, 2, 3, ... for the lifetime of the process
#[derive(Debug)]
pub struct OrderIdAllocator {
    next: AtomicU64,
}

impl OrderIdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn allocate(&self) -> OrderId {
        OrderId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for OrderIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed staff list, assigned in rotation by order id
#[derive(Debug)]
pub struct StaffRoster {
    staff: Vec<ChatId>,
}

impl StaffRoster {
    /// Returns `None` for an empty roster
    pub fn new(staff: Vec<ChatId>) -> Option<Self> {
        if staff.is_empty() {
            return None;
        }
        Some(Self { staff })
    }

    /// Staff member for an order: order k goes to `staff[(k - 1) % len]`.
    ///
    /// Deriving the pick from the id keeps the pairing fixed no matter how
    /// concurrent checkouts interleave.
    pub fn for_order(&self, id: OrderId) -> ChatId {
        let len = self.staff.len() as u64;
        let index = usize::try_from(id.0.saturating_sub(1) % len).unwrap_or_default();
        self.staff[index]
    }
}
