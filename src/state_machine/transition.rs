//! Pure state transition function
//!
//! Given the current state, the shared context, the session cart and one
//! event, compute the next state and the effects to run. No I/O happens here;
//! the runtime applies cart effects and places orders.
//!
//! Invalid input never advances the machine: it re-prompts in the same state
//! with a short error and the same choices.

use super::choice::{Action, ChoiceId};
use super::effect::{Effect, Reply};
use super::event::Event;
use super::menus;
use super::state::{ChatContext, ChatState};
use crate::cart::{Cart, LineItem};
use crate::catalog::SearchHit;
use crate::order::{Customer, GeoPoint, PaymentMethod};

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_reply(self, reply: Reply) -> Self {
        self.with_effect(Effect::Reply(reply))
    }
}

/// Pure transition function
pub fn transition(
    state: &ChatState,
    context: &ChatContext,
    cart: &Cart,
    event: Event,
) -> TransitionResult {
    match (state, event) {
        // ============================================================
        // Commands valid in every state
        // ============================================================
        (_, Event::Restart) => TransitionResult::new(ChatState::MainMenu)
            .with_effect(Effect::ClearCart)
            .with_reply(menus::welcome(&context.shop)),

        (_, Event::Checkout) => begin_checkout(context, cart),

        // ============================================================
        // Browsing
        // ============================================================
        (ChatState::MainMenu, event) => main_menu(context, cart, &event),

        (ChatState::Category, event) => category(context, cart, event),

        (
            ChatState::Item {
                category,
                search_results,
            },
            event,
        ) => item(context, cart, state, category.as_deref(), search_results, event),

        (ChatState::Quantity { category, item }, event) => {
            quantity(context, cart, state, category, item, event)
        }

        (ChatState::Search, event) => search(context, cart, event),

        // ============================================================
        // Cart editing
        // ============================================================
        (ChatState::RemoveItem, event) => remove_item(context, cart, event),

        // ============================================================
        // Checkout
        // ============================================================
        (ChatState::CheckoutName, event) => checkout_name(context, cart, &event),

        (ChatState::CheckoutAddress { name }, event) => {
            checkout_address(context, cart, name, &event)
        }

        (
            ChatState::CheckoutPhone {
                name,
                address,
                location,
            },
            event,
        ) => checkout_phone(context, cart, state, name, address, *location, event),

        (ChatState::CheckoutPayment { customer }, event) => {
            checkout_payment(context, cart, state, customer, &event)
        }
    }
}

/// Render the prompt that belongs to `state`
pub fn prompt_for(state: &ChatState, context: &ChatContext, cart: &Cart) -> Reply {
    let catalog = &context.catalog;
    match state {
        ChatState::MainMenu => menus::main_menu(),
        ChatState::Category => menus::categories(catalog),
        ChatState::Item {
            search_results,
            category,
        } => {
            if !search_results.is_empty() {
                return menus::search_results(search_results);
            }
            category
                .as_deref()
                .and_then(|name| catalog.category(name))
                .map_or_else(|| menus::categories(catalog), menus::items)
        }
        ChatState::Quantity { category, item } => catalog
            .item(category, item)
            .map_or_else(|| menus::categories(catalog), menus::quantities),
        ChatState::Search => menus::search_prompt(),
        ChatState::RemoveItem => menus::remove_menu(cart),
        ChatState::CheckoutName => menus::ask_name(),
        ChatState::CheckoutAddress { .. } => menus::ask_address(),
        ChatState::CheckoutPhone { location, .. } => menus::ask_contact(location.is_some()),
        ChatState::CheckoutPayment { .. } => menus::ask_payment(),
    }
}

/// Stay in `state`, repeating its prompt with an error line
fn invalid(state: &ChatState, context: &ChatContext, cart: &Cart, error: &str) -> TransitionResult {
    TransitionResult::new(state.clone())
        .with_reply(prompt_for(state, context, cart).with_error(error))
}

fn show_categories(context: &ChatContext) -> TransitionResult {
    TransitionResult::new(ChatState::Category).with_reply(menus::categories(&context.catalog))
}

fn show_cart(context: &ChatContext, cart: &Cart) -> TransitionResult {
    TransitionResult::new(ChatState::Category)
        .with_reply(menus::cart_view(cart, &context.catalog))
}

fn main_menu(context: &ChatContext, cart: &Cart, event: &Event) -> TransitionResult {
    match event {
        Event::Choice(ChoiceId::Action(Action::Browse)) => show_categories(context),
        Event::Choice(ChoiceId::Action(Action::Search)) => {
            TransitionResult::new(ChatState::Search).with_reply(menus::search_prompt())
        }
        Event::Choice(ChoiceId::Action(Action::About)) => {
            TransitionResult::new(ChatState::MainMenu).with_reply(menus::about(&context.shop))
        }
        Event::Choice(ChoiceId::Action(Action::Contact)) => {
            TransitionResult::new(ChatState::MainMenu).with_reply(menus::contact(&context.shop))
        }
        _ => invalid(&ChatState::MainMenu, context, cart, "Please choose an option below."),
    }
}

fn category(context: &ChatContext, cart: &Cart, event: Event) -> TransitionResult {
    let name = match event {
        Event::Choice(ChoiceId::Action(action)) => {
            return match action {
                Action::Back => {
                    TransitionResult::new(ChatState::MainMenu).with_reply(menus::main_menu())
                }
                Action::ViewCart => show_cart(context, cart),
                Action::Checkout => begin_checkout(context, cart),
                Action::RemoveItems if cart.is_empty() => show_cart(context, cart),
                Action::RemoveItems => TransitionResult::new(ChatState::RemoveItem)
                    .with_reply(menus::remove_menu(cart)),
                Action::Search => {
                    TransitionResult::new(ChatState::Search).with_reply(menus::search_prompt())
                }
                Action::AddMore => show_categories(context),
                _ => invalid(&ChatState::Category, context, cart, "Invalid category."),
            };
        }
        Event::Choice(ChoiceId::Category(name)) | Event::Text(name) => name,
        _ => return invalid(&ChatState::Category, context, cart, "Invalid category."),
    };

    match context.catalog.category(&name) {
        Some(found) => TransitionResult::new(ChatState::Item {
            category: Some(found.name.clone()),
            search_results: Vec::new(),
        })
        .with_reply(menus::items(found)),
        None => invalid(&ChatState::Category, context, cart, "Invalid category."),
    }
}

fn item(
    context: &ChatContext,
    cart: &Cart,
    state: &ChatState,
    category: Option<&str>,
    search_results: &[SearchHit],
    event: Event,
) -> TransitionResult {
    let selected = match event {
        Event::Choice(ChoiceId::Action(Action::Back | Action::Cancel)) => {
            return show_categories(context);
        }
        Event::Choice(ChoiceId::Item { category, item }) => Some(SearchHit { category, item }),
        Event::Text(name) => search_results
            .iter()
            .find(|hit| hit.item == name)
            .cloned()
            .or_else(|| {
                category.map(|category| SearchHit {
                    category: category.to_string(),
                    item: name,
                })
            }),
        _ => None,
    };

    let Some(hit) = selected else {
        return invalid(state, context, cart, "Invalid item.");
    };
    match context.catalog.item(&hit.category, &hit.item) {
        Some(found) => TransitionResult::new(ChatState::Quantity {
            category: hit.category,
            item: hit.item,
        })
        .with_reply(menus::quantities(found)),
        None => invalid(state, context, cart, "Invalid item."),
    }
}

fn quantity(
    context: &ChatContext,
    cart: &Cart,
    state: &ChatState,
    category: &str,
    item: &str,
    event: Event,
) -> TransitionResult {
    let Some(found) = context.catalog.item(category, item) else {
        return show_categories(context);
    };

    let label = match event {
        Event::Choice(ChoiceId::Action(Action::Back)) => {
            let back = ChatState::Item {
                category: Some(category.to_string()),
                search_results: Vec::new(),
            };
            let reply = prompt_for(&back, context, cart);
            return TransitionResult::new(back).with_reply(reply);
        }
        Event::Choice(ChoiceId::Quantity(label)) | Event::Text(label) => label,
        _ => return invalid(state, context, cart, "Please select a valid option."),
    };

    match found.option(&label) {
        Some(option) => {
            let line = LineItem::new(&found.name, &option.label, option.price);
            TransitionResult::new(ChatState::Category)
                .with_reply(menus::added(&line))
                .with_effect(Effect::AddToCart(line))
        }
        None => invalid(state, context, cart, "Please select a valid option."),
    }
}

fn search(context: &ChatContext, cart: &Cart, event: Event) -> TransitionResult {
    match event {
        Event::Choice(ChoiceId::Action(Action::Back)) => show_categories(context),
        Event::Choice(ChoiceId::Action(Action::Retry)) => {
            TransitionResult::new(ChatState::Search).with_reply(menus::search_prompt())
        }
        Event::Text(query) if !query.trim().is_empty() => {
            let hits = context.catalog.search(&query);
            if hits.is_empty() {
                return TransitionResult::new(ChatState::Search)
                    .with_reply(menus::search_empty(query.trim()));
            }
            let reply = menus::search_results(&hits);
            TransitionResult::new(ChatState::Item {
                category: None,
                search_results: hits,
            })
            .with_reply(reply)
        }
        _ => invalid(&ChatState::Search, context, cart, "Please type an item name."),
    }
}

fn remove_item(context: &ChatContext, cart: &Cart, event: Event) -> TransitionResult {
    let target = match event {
        Event::Choice(ChoiceId::Action(Action::Cancel)) => return show_cart(context, cart),
        Event::Choice(ChoiceId::CartLine(line)) => cart.contains(&line).then_some(line),
        Event::Text(label) => cart.find_by_label(&label).cloned(),
        _ => None,
    };

    let Some(line) = target else {
        return invalid(&ChatState::RemoveItem, context, cart, "Item not found in cart.");
    };

    let mut remaining = cart.clone();
    remaining.remove_first(|entry| *entry == line);
    TransitionResult::new(ChatState::Category)
        .with_reply(menus::removed(&line))
        .with_reply(menus::cart_view(&remaining, &context.catalog))
        .with_effect(Effect::RemoveFromCart(line))
}

fn begin_checkout(context: &ChatContext, cart: &Cart) -> TransitionResult {
    if cart.is_empty() {
        return TransitionResult::new(ChatState::Category)
            .with_reply(menus::cart_empty(&context.catalog));
    }
    TransitionResult::new(ChatState::CheckoutName).with_reply(menus::ask_name())
}

/// Free text for a checkout field, or `None` for anything else
fn field_text(event: &Event) -> Option<&str> {
    match event {
        Event::Text(text) if !text.trim().is_empty() => Some(text.trim()),
        _ => None,
    }
}

fn is_cancel(event: &Event) -> bool {
    matches!(event, Event::Choice(ChoiceId::Action(Action::Cancel)))
}

fn checkout_name(context: &ChatContext, cart: &Cart, event: &Event) -> TransitionResult {
    if is_cancel(event) {
        return show_cart(context, cart);
    }
    match field_text(event) {
        Some(name) => TransitionResult::new(ChatState::CheckoutAddress {
            name: name.to_string(),
        })
        .with_reply(menus::ask_address()),
        None => invalid(&ChatState::CheckoutName, context, cart, "Please type your name."),
    }
}

fn checkout_address(
    context: &ChatContext,
    cart: &Cart,
    name: &str,
    event: &Event,
) -> TransitionResult {
    if is_cancel(event) {
        return show_cart(context, cart);
    }
    match field_text(event) {
        Some(address) => TransitionResult::new(ChatState::CheckoutPhone {
            name: name.to_string(),
            address: address.to_string(),
            location: None,
        })
        .with_reply(menus::ask_contact(false)),
        None => invalid(
            &ChatState::CheckoutAddress {
                name: name.to_string(),
            },
            context,
            cart,
            "Please type your delivery address.",
        ),
    }
}

fn checkout_phone(
    context: &ChatContext,
    cart: &Cart,
    state: &ChatState,
    name: &str,
    address: &str,
    location: Option<GeoPoint>,
    event: Event,
) -> TransitionResult {
    match event {
        Event::Choice(ChoiceId::Action(Action::Cancel)) => show_cart(context, cart),
        Event::Location(point) => TransitionResult::new(ChatState::CheckoutPhone {
            name: name.to_string(),
            address: address.to_string(),
            location: Some(point),
        })
        .with_reply(menus::ask_contact(true)),
        Event::Contact { phone } => TransitionResult::new(ChatState::CheckoutPayment {
            customer: Customer {
                name: name.to_string(),
                address: address.to_string(),
                phone,
                location,
            },
        })
        .with_reply(menus::ask_payment()),
        _ => invalid(
            state,
            context,
            cart,
            "Please use the button below to share your contact.",
        ),
    }
}

fn checkout_payment(
    context: &ChatContext,
    cart: &Cart,
    state: &ChatState,
    customer: &Customer,
    event: &Event,
) -> TransitionResult {
    match event {
        Event::Choice(ChoiceId::Action(Action::Cancel)) => show_cart(context, cart),
        Event::Choice(ChoiceId::Action(Action::PayNow)) => {
            TransitionResult::new(state.clone()).with_reply(menus::payment_unavailable())
        }
        Event::Choice(ChoiceId::Action(Action::CashOnDelivery)) => {
            if cart.is_empty() {
                return begin_checkout(context, cart);
            }
            TransitionResult::new(ChatState::MainMenu).with_effect(Effect::PlaceOrder {
                customer: customer.clone(),
                payment: PaymentMethod::CashOnDelivery,
            })
        }
        _ => invalid(state, context, cart, "Please choose a payment method."),
    }
}
