//! Order confirmation and fan-out to fulfillment

use super::summary::{render_summary, Audience};
use super::{Customer, Order, OrderIdAllocator, PaymentMethod, StaffRoster};
use crate::cart::Cart;
use crate::runtime::NotificationSink;
use crate::session::ChatId;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Customer name is missing")]
    MissingName,
    #[error("Delivery address is missing")]
    MissingAddress,
}

/// Builds orders and notifies staff, admin and the group chat.
///
/// Shared by every session. Ids come from one atomic counter and the
/// assigned staff member follows from the id.
pub struct OrderDispatcher {
    ids: OrderIdAllocator,
    roster: StaffRoster,
    admin: ChatId,
    group: ChatId,
    sink: Arc<dyn NotificationSink>,
}

impl OrderDispatcher {
    pub fn new(
        roster: StaffRoster,
        admin: ChatId,
        group: ChatId,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            ids: OrderIdAllocator::new(),
            roster,
            admin,
            group,
            sink,
        }
    }

    /// Confirm a cash-on-delivery order for the given cart.
    ///
    /// Validation happens before an id is allocated. Once allocated, the id
    /// and staff assignment stand even if every notification fails.
    pub async fn confirm(
        &self,
        cart: &Cart,
        customer: Customer,
        payment: PaymentMethod,
    ) -> Result<Order, DispatchError> {
        if cart.is_empty() {
            return Err(DispatchError::EmptyCart);
        }
        if customer.name.trim().is_empty() {
            return Err(DispatchError::MissingName);
        }
        if customer.address.trim().is_empty() {
            return Err(DispatchError::MissingAddress);
        }

        let listing = cart.list();
        let id = self.ids.allocate();
        let order = Order {
            id,
            customer,
            payment,
            line_items: listing.items.to_vec(),
            total: listing.total,
            assigned_staff: self.roster.for_order(id),
            placed_at: Utc::now(),
        };

        tracing::info!(
            order_id = %order.id,
            staff = %order.assigned_staff,
            total = order.total,
            lines = order.line_items.len(),
            "Order placed"
        );

        self.notify(order.assigned_staff, &render_summary(&order, Audience::Staff), &order)
            .await;
        self.notify(self.admin, &render_summary(&order, Audience::Admin), &order)
            .await;
        self.notify(self.group, &render_summary(&order, Audience::Group), &order)
            .await;

        Ok(order)
    }

    async fn notify(&self, recipient: ChatId, text: &str, order: &Order) {
        if let Err(e) = self.sink.notify(recipient, text).await {
            tracing::warn!(
                order_id = %order.id,
                recipient = %recipient,
                error = %e,
                "Order notification failed"
            );
        }
    }
}
