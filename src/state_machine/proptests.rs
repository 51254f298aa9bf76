//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use crate::cart::{Cart, LineItem};
use crate::catalog::{Catalog, SearchHit};
use crate::config::ShopInfo;
use crate::order::{Customer, GeoPoint};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Test Helpers
// ============================================================================

const CATALOG: &str = r#"{
    "Fruits": { "Apple": { "1kg": 50, "2kg": 95 }, "Pineapple": { "1 pc": 60 } },
    "Dairy": { "Milk": { "1l": 30 }, "Paneer": { "200g": 90 } },
    "Snacks": { "Chips": { "100g": 20 } }
}"#;

fn test_context() -> ChatContext {
    ChatContext::new(
        Arc::new(Catalog::from_json(CATALOG).unwrap()),
        ShopInfo::default(),
    )
}

/// Apply the cart effects of a transition the way the runtime does
fn apply_cart_effects(cart: &mut Cart, effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::AddToCart(line) => cart.add(line.clone()),
            Effect::RemoveFromCart(line) => {
                cart.remove_first(|entry| entry == line);
            }
            Effect::ClearCart | Effect::PlaceOrder { .. } => cart.clear(),
            Effect::Reply(_) => {}
        }
    }
}

fn touches_cart(effect: &Effect) -> bool {
    !matches!(effect, Effect::Reply(_))
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Browse),
        Just(Action::Search),
        Just(Action::About),
        Just(Action::Contact),
        Just(Action::Back),
        Just(Action::Cancel),
        Just(Action::ViewCart),
        Just(Action::Checkout),
        Just(Action::RemoveItems),
        Just(Action::AddMore),
        Just(Action::Retry),
        Just(Action::PayNow),
        Just(Action::CashOnDelivery),
        Just(Action::ShareLocation),
        Just(Action::ShareContact),
    ]
}

fn arb_hit() -> impl Strategy<Value = SearchHit> {
    prop_oneof![
        Just(("Fruits", "Apple")),
        Just(("Fruits", "Pineapple")),
        Just(("Dairy", "Milk")),
        Just(("Dairy", "Paneer")),
        Just(("Snacks", "Chips")),
    ]
    .prop_map(|(category, item)| SearchHit {
        category: category.to_string(),
        item: item.to_string(),
    })
}

fn arb_line() -> impl Strategy<Value = LineItem> {
    prop_oneof![
        Just(LineItem::new("Apple", "1kg", 50)),
        Just(LineItem::new("Apple", "2kg", 95)),
        Just(LineItem::new("Milk", "1l", 30)),
    ]
}

fn arb_cart() -> impl Strategy<Value = Cart> {
    proptest::collection::vec(arb_line(), 0..5).prop_map(|lines| {
        let mut cart = Cart::new();
        for line in lines {
            cart.add(line);
        }
        cart
    })
}

fn arb_point() -> impl Strategy<Value = GeoPoint> {
    (-90i32..90, -180i32..180).prop_map(|(lat, lon)| GeoPoint {
        latitude: f64::from(lat),
        longitude: f64::from(lon),
    })
}

fn arb_customer() -> impl Strategy<Value = Customer> {
    (
        "[A-Z][a-z]{1,8}",
        "[0-9]{1,3} [A-Z][a-z]{2,8} Road",
        proptest::option::of("[0-9]{10}"),
        proptest::option::of(arb_point()),
    )
        .prop_map(|(name, address, phone, location)| Customer {
            name,
            address,
            phone,
            location,
        })
}

fn arb_state() -> impl Strategy<Value = ChatState> {
    prop_oneof![
        Just(ChatState::MainMenu),
        Just(ChatState::Category),
        (
            proptest::option::of(prop_oneof![Just("Fruits"), Just("Dairy")]),
            proptest::collection::vec(arb_hit(), 0..3)
        )
            .prop_map(|(category, search_results)| ChatState::Item {
                category: category.map(str::to_string),
                search_results,
            }),
        arb_hit().prop_map(|hit| ChatState::Quantity {
            category: hit.category,
            item: hit.item,
        }),
        Just(ChatState::Search),
        Just(ChatState::RemoveItem),
        Just(ChatState::CheckoutName),
        "[A-Z][a-z]{1,8}".prop_map(|name| ChatState::CheckoutAddress { name }),
        arb_customer().prop_map(|c| ChatState::CheckoutPhone {
            name: c.name,
            address: c.address,
            location: c.location,
        }),
        arb_customer().prop_map(|customer| ChatState::CheckoutPayment { customer }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_action().prop_map(|a| Event::Choice(ChoiceId::Action(a))),
        prop_oneof![Just("Fruits"), Just("Dairy"), Just("Toys")]
            .prop_map(|c| Event::Choice(ChoiceId::Category(c.to_string()))),
        arb_hit().prop_map(|hit| Event::Choice(ChoiceId::Item {
            category: hit.category,
            item: hit.item,
        })),
        prop_oneof![Just("1kg"), Just("2kg"), Just("1l"), Just("5kg")]
            .prop_map(|q| Event::Choice(ChoiceId::Quantity(q.to_string()))),
        arb_line().prop_map(|l| Event::Choice(ChoiceId::CartLine(l))),
        "[a-zA-Z ]{0,12}".prop_map(Event::Text),
        proptest::option::of("[0-9]{10}").prop_map(|phone| Event::Contact { phone }),
        arb_point().prop_map(Event::Location),
        Just(Event::Restart),
        Just(Event::Checkout),
    ]
}

/// Text that can never name a category, item, quantity or cart line
fn arb_garbage() -> impl Strategy<Value = String> {
    "#[a-z]{1,10}"
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_every_transition_answers(
        state in arb_state(),
        cart in arb_cart(),
        event in arb_event(),
    ) {
        let result = transition(&state, &test_context(), &cart, event);
        let answered = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::Reply(_) | Effect::PlaceOrder { .. }));
        prop_assert!(answered, "no reply from {:?}", state);
    }

    #[test]
    fn prop_navigation_never_touches_cart(
        state in arb_state(),
        cart in arb_cart(),
        nav in prop_oneof![Just(Action::Back), Just(Action::Cancel)],
    ) {
        let event = Event::Choice(ChoiceId::Action(nav));
        let result = transition(&state, &test_context(), &cart, event);
        prop_assert!(!result.effects.iter().any(touches_cart));
    }

    #[test]
    fn prop_garbage_never_advances(
        state in arb_state().prop_filter("free-text states accept any text", |s| !matches!(
            s,
            ChatState::Search | ChatState::CheckoutName | ChatState::CheckoutAddress { .. }
        )),
        cart in arb_cart(),
        garbage in arb_garbage(),
    ) {
        let result = transition(&state, &test_context(), &cart, Event::Text(garbage));
        prop_assert_eq!(&result.new_state, &state);
        prop_assert!(!result.effects.iter().any(touches_cart));
    }

    #[test]
    fn prop_restart_resets_from_anywhere(state in arb_state(), cart in arb_cart()) {
        let result = transition(&state, &test_context(), &cart, Event::Restart);
        prop_assert_eq!(result.new_state, ChatState::MainMenu);
        prop_assert!(result.effects.contains(&Effect::ClearCart));
    }

    #[test]
    fn prop_orders_only_from_cash_payment_with_items(
        state in arb_state(),
        cart in arb_cart(),
        event in arb_event(),
    ) {
        let is_cash = event == Event::Choice(ChoiceId::Action(Action::CashOnDelivery));
        let result = transition(&state, &test_context(), &cart, event);
        let places = result.effects.iter().any(|e| matches!(e, Effect::PlaceOrder { .. }));
        if places {
            let in_payment = matches!(state, ChatState::CheckoutPayment { .. });
            prop_assert!(is_cash);
            prop_assert!(in_payment);
            prop_assert!(!cart.is_empty());
            prop_assert_eq!(result.new_state, ChatState::MainMenu);
        }
    }

    #[test]
    fn prop_pay_now_never_orders_or_clears(customer in arb_customer(), cart in arb_cart()) {
        let state = ChatState::CheckoutPayment { customer };
        let event = Event::Choice(ChoiceId::Action(Action::PayNow));
        let result = transition(&state, &test_context(), &cart, event);
        prop_assert_eq!(&result.new_state, &state);
        prop_assert!(!result.effects.iter().any(touches_cart));
    }

    #[test]
    fn prop_random_walk_keeps_cart_consistent(
        events in proptest::collection::vec(arb_event(), 1..40),
    ) {
        let context = test_context();
        let mut state = ChatState::MainMenu;
        let mut cart = Cart::new();

        for event in events {
            let before = cart.items().len();
            let result = transition(&state, &context, &cart, event);
            apply_cart_effects(&mut cart, &result.effects);

            // Every line in the cart is a real catalog option at its catalog price
            for line in cart.items() {
                let known = context.catalog.categories().iter().any(|c| {
                    c.item(&line.item)
                        .and_then(|i| i.option(&line.quantity))
                        .is_some_and(|o| o.price == line.price)
                });
                prop_assert!(known, "unknown line {:?}", line);
            }

            let removals = result
                .effects
                .iter()
                .filter(|e| matches!(e, Effect::RemoveFromCart(_)))
                .count();
            if removals > 0 {
                prop_assert_eq!(removals, 1);
                prop_assert_eq!(cart.items().len(), before - 1);
            }

            let expected: u64 = cart.items().iter().map(|l| l.price).sum();
            prop_assert_eq!(cart.list().total, expected);
            state = result.new_state;
        }
    }
}
