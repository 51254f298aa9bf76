//! Order summaries sent to staff, admin and the group chat

use super::Order;
use crate::cart::format_price;
use std::fmt::Write;

/// Who a summary is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// The assigned staff member; their own id is omitted
    Staff,
    Admin,
    Group,
}

pub fn render_summary(order: &Order, audience: Audience) -> String {
    let body = order_body(order);
    match audience {
        Audience::Staff => format!("📦 New Order Assigned!\n{body}"),
        Audience::Admin => format!(
            "✅ Order received\n{body}\n👤 Assigned staff: {}",
            order.assigned_staff
        ),
        Audience::Group => format!(
            "📢 New Order:\n{body}\n👤 Assigned staff: {}",
            order.assigned_staff
        ),
    }
}

fn order_body(order: &Order) -> String {
    let customer = &order.customer;
    let mut out = String::new();
    let _ = writeln!(out, "🧾 Order ID: {}", order.id);
    let _ = writeln!(out, "👤 {}", customer.name);
    let _ = writeln!(
        out,
        "📞 {}",
        customer.phone.as_deref().unwrap_or("not provided")
    );
    let _ = writeln!(out, "📍 {}", customer.address);
    if let Some(location) = &customer.location {
        let _ = writeln!(out, "🗺 {}", location.map_link());
    }
    let _ = writeln!(out, "💰 Payment: {}", order.payment.label());
    out.push_str("\n🛒 Items:\n");
    for line in &order.line_items {
        let _ = writeln!(out, "- {line}");
    }
    let _ = writeln!(out, "\nTotal: {}", format_price(order.total));
    let _ = write!(out, "🕒 {}", order.placed_at.format("%Y-%m-%d %H:%M UTC"));
    out
}
