//! Prompts and keyboards for each screen of the flow

use super::choice::{Action, Choice, ShareRequest};
use super::effect::Reply;
use crate::cart::{format_price, Cart, LineItem};
use crate::catalog::{Catalog, Category, Item, SearchHit};
use crate::config::ShopInfo;
use crate::order::Order;
use std::fmt::Write;

fn pairs(choices: Vec<Choice>) -> Vec<Vec<Choice>> {
    let mut rows = Vec::with_capacity(choices.len().div_ceil(2));
    let mut iter = choices.into_iter();
    while let Some(first) = iter.next() {
        let mut row = vec![first];
        row.extend(iter.next());
        rows.push(row);
    }
    rows
}

fn main_menu_rows() -> Vec<Vec<Choice>> {
    vec![
        vec![Choice::action(Action::Browse), Choice::action(Action::Search)],
        vec![Choice::action(Action::About), Choice::action(Action::Contact)],
    ]
}

pub fn welcome(shop: &ShopInfo) -> Reply {
    Reply::with_choices(
        format!("👋 Welcome to {}!\nChoose an option below:", shop.name),
        main_menu_rows(),
    )
}

pub fn main_menu() -> Reply {
    Reply::with_choices("Choose an option below:", main_menu_rows())
}

fn category_rows(catalog: &Catalog) -> Vec<Vec<Choice>> {
    let mut rows = pairs(
        catalog
            .categories()
            .iter()
            .map(|c| Choice::category(&c.name))
            .collect(),
    );
    rows.push(vec![
        Choice::action(Action::Search),
        Choice::action(Action::ViewCart),
    ]);
    rows.push(vec![Choice::action(Action::Back)]);
    rows
}

pub fn categories(catalog: &Catalog) -> Reply {
    Reply::with_choices("Choose a category:", category_rows(catalog))
}

pub fn items(category: &Category) -> Reply {
    let mut rows = pairs(
        category
            .items
            .iter()
            .map(|item| {
                Choice::item(&SearchHit {
                    category: category.name.clone(),
                    item: item.name.clone(),
                })
            })
            .collect(),
    );
    rows.push(vec![Choice::action(Action::Back)]);
    Reply::with_choices(format!("Choose an item in {}:", category.name), rows)
}

pub fn quantities(item: &Item) -> Reply {
    let mut rows = pairs(item.options.iter().map(Choice::quantity).collect());
    rows.push(vec![Choice::action(Action::Back)]);
    Reply::with_choices(format!("Select quantity for {}:", item.name), rows)
}

pub fn added(line: &LineItem) -> Reply {
    Reply::with_choices(
        format!("✅ {} ({}) added to cart.", line.item, line.quantity),
        vec![
            vec![
                Choice::action(Action::AddMore),
                Choice::action(Action::ViewCart),
            ],
            vec![Choice::action(Action::Checkout)],
        ],
    )
}

pub fn cart_empty(catalog: &Catalog) -> Reply {
    Reply::with_choices("🛒 Your cart is empty.", category_rows(catalog))
}

pub fn cart_view(cart: &Cart, catalog: &Catalog) -> Reply {
    if cart.is_empty() {
        return cart_empty(catalog);
    }
    let listing = cart.list();
    let mut text = String::from("🛒 Your Cart:\n");
    for line in listing.items {
        let _ = writeln!(text, "- {line}");
    }
    let _ = write!(text, "\nTotal: {}", format_price(listing.total));
    Reply::with_choices(
        text,
        vec![
            vec![
                Choice::action(Action::Checkout),
                Choice::action(Action::RemoveItems),
            ],
            vec![Choice::action(Action::AddMore), Choice::action(Action::Back)],
        ],
    )
}

pub fn remove_menu(cart: &Cart) -> Reply {
    let mut rows: Vec<Vec<Choice>> = cart
        .items()
        .iter()
        .map(|line| vec![Choice::cart_line(line)])
        .collect();
    rows.push(vec![Choice::action(Action::Cancel)]);
    Reply::with_choices("Select an item to remove:", rows)
}

pub fn removed(line: &LineItem) -> Reply {
    Reply::text(format!(
        "❌ Removed {} ({}) from your cart.",
        line.item, line.quantity
    ))
}

pub fn search_prompt() -> Reply {
    Reply::with_choices(
        "🔍 Type the name of the item you are looking for:",
        vec![vec![Choice::action(Action::Back)]],
    )
}

pub fn search_results(hits: &[SearchHit]) -> Reply {
    let mut rows = pairs(hits.iter().map(Choice::item).collect());
    rows.push(vec![Choice::action(Action::Back)]);
    Reply::with_choices(format!("Found {} item(s):", hits.len()), rows)
}

pub fn search_empty(query: &str) -> Reply {
    Reply::with_choices(
        format!("No items match \"{query}\"."),
        vec![vec![
            Choice::action(Action::Retry),
            Choice::action(Action::Back),
        ]],
    )
}

fn cancel_row() -> Vec<Choice> {
    vec![Choice::action(Action::Cancel)]
}

pub fn ask_name() -> Reply {
    Reply::with_choices("📝 Please enter your name:", vec![cancel_row()])
}

pub fn ask_address() -> Reply {
    Reply::with_choices("🏠 Enter your delivery address:", vec![cancel_row()])
}

/// Contact prompt; the location button is offered until one is shared
pub fn ask_contact(location_shared: bool) -> Reply {
    let contact = Choice::action(Action::ShareContact).requesting(ShareRequest::Contact);
    if location_shared {
        return Reply::with_choices(
            "📍 Location saved. Now share your contact so we can call you:",
            vec![vec![contact], cancel_row()],
        );
    }
    let location = Choice::action(Action::ShareLocation).requesting(ShareRequest::Location);
    Reply::with_choices(
        "📍 Optionally share your location for faster delivery, then share your contact:",
        vec![vec![location], vec![contact], cancel_row()],
    )
}

pub fn ask_payment() -> Reply {
    Reply::with_choices(
        "💰 Select payment method:",
        vec![
            vec![
                Choice::action(Action::PayNow),
                Choice::action(Action::CashOnDelivery),
            ],
            cancel_row(),
        ],
    )
}

/// Shown after the unsupported method is picked; only cash remains
pub fn payment_unavailable() -> Reply {
    Reply::with_choices(
        "💳 Online payment is not available yet. Please pay cash on delivery.",
        vec![vec![Choice::action(Action::CashOnDelivery)], cancel_row()],
    )
}

pub fn order_placed(order: &Order) -> Reply {
    let mut reply = main_menu();
    reply.text = format!(
        "🎉 Your order {} has been placed! Total: {}. You'll receive a call soon.",
        order.id,
        format_price(order.total)
    );
    reply
}

pub fn order_failed() -> Reply {
    let mut reply = main_menu();
    reply.text = "⚠️ Sorry, we could not place your order. Please try again.".to_string();
    reply
}

pub fn about(shop: &ShopInfo) -> Reply {
    Reply::text(shop.about.clone())
}

pub fn contact(shop: &ShopInfo) -> Reply {
    Reply::text(shop.contact.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::{ChoiceId, Keyboard};

    fn labels(reply: &Reply) -> Vec<Vec<String>> {
        match &reply.keyboard {
            Keyboard::Choices(rows) => rows
                .iter()
                .map(|row| row.iter().map(|c| c.label.clone()).collect())
                .collect(),
            other => panic!("expected choices, got {other:?}"),
        }
    }

    #[test]
    fn test_pairs_layout() {
        let rows = pairs((0..5).map(|i| Choice::category(&i.to_string())).collect());
        let sizes: Vec<_> = rows.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn test_quantity_labels_embed_price() {
        let catalog = Catalog::from_json(r#"{ "Fruits": { "Apple": { "1kg": 50, "2kg": 95 } } }"#)
            .unwrap();
        let reply = quantities(catalog.item("Fruits", "Apple").unwrap());
        assert_eq!(
            labels(&reply),
            vec![
                vec!["1kg ₹50".to_string(), "2kg ₹95".to_string()],
                vec![Action::Back.label().to_string()],
            ]
        );
        let Keyboard::Choices(rows) = &reply.keyboard else {
            unreachable!()
        };
        assert_eq!(rows[0][0].id, ChoiceId::Quantity("1kg".to_string()));
    }

    #[test]
    fn test_cart_view_lists_lines_and_total() {
        let catalog = Catalog::from_json(r#"{ "Fruits": { "Apple": { "1kg": 50 } } }"#).unwrap();
        let mut cart = Cart::new();
        cart.add(LineItem::new("Apple", "1kg", 50));
        cart.add(LineItem::new("Apple", "1kg", 50));

        let reply = cart_view(&cart, &catalog);
        assert!(reply.text.contains("- Apple (1kg) ₹50"));
        assert!(reply.text.contains("Total: ₹100"));

        let empty = cart_view(&Cart::new(), &catalog);
        assert!(empty.text.contains("empty"));
    }

    #[test]
    fn test_contact_prompt_requests() {
        let Keyboard::Choices(rows) = ask_contact(false).keyboard else {
            unreachable!()
        };
        let requests: Vec<_> = rows.iter().flatten().filter_map(|c| c.request).collect();
        assert_eq!(requests, vec![ShareRequest::Location, ShareRequest::Contact]);

        let Keyboard::Choices(rows) = ask_contact(true).keyboard else {
            unreachable!()
        };
        let requests: Vec<_> = rows.iter().flatten().filter_map(|c| c.request).collect();
        assert_eq!(requests, vec![ShareRequest::Contact]);
    }
}
