//! Per-chat runtime executor

use super::traits::ReplySink;
use crate::order::OrderDispatcher;
use crate::session::{ChatId, Inbound, Session};
use crate::state_machine::{
    order_failed, order_placed, transition, ChatContext, Effect, Reply,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs one chat: owns its session and applies every transition to completion
/// before taking the next input.
pub struct ChatRuntime<R>
where
    R: ReplySink + 'static,
{
    session: Session,
    context: Arc<ChatContext>,
    replies: Arc<R>,
    dispatcher: Arc<OrderDispatcher>,
}

impl<R> ChatRuntime<R>
where
    R: ReplySink + 'static,
{
    pub fn new(
        chat_id: ChatId,
        context: Arc<ChatContext>,
        replies: Arc<R>,
        dispatcher: Arc<OrderDispatcher>,
    ) -> Self {
        Self {
            session: Session::new(chat_id),
            context,
            replies,
            dispatcher,
        }
    }

    pub async fn run(mut self, mut inbound_rx: mpsc::Receiver<Inbound>) {
        tracing::debug!(chat_id = %self.session.chat_id, "Starting chat runtime");

        while let Some(inbound) = inbound_rx.recv().await {
            self.handle(inbound).await;
        }

        tracing::debug!(chat_id = %self.session.chat_id, "Chat runtime stopped");
    }

    /// Process one input: resolve it, transition, then run the effects
    pub async fn handle(&mut self, inbound: Inbound) {
        let event = self.session.resolve(inbound);
        let result = transition(
            &self.session.state,
            &self.context,
            &self.session.cart,
            event,
        );

        let old_state = std::mem::replace(&mut self.session.state, result.new_state);
        if old_state.name() != self.session.state.name() {
            tracing::debug!(
                chat_id = %self.session.chat_id,
                from = old_state.name(),
                to = self.session.state.name(),
                "State transition"
            );
        }

        for effect in result.effects {
            self.execute_effect(effect).await;
        }
    }

    async fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Reply(reply) => self.send(&reply).await,

            Effect::AddToCart(line) => {
                tracing::debug!(chat_id = %self.session.chat_id, line = %line, "Added to cart");
                self.session.cart.add(line);
            }

            Effect::RemoveFromCart(line) => {
                if self.session.cart.remove_first(|entry| *entry == line).is_none() {
                    tracing::warn!(
                        chat_id = %self.session.chat_id,
                        line = %line,
                        "Cart line vanished before removal"
                    );
                }
            }

            Effect::ClearCart => self.session.cart.clear(),

            Effect::PlaceOrder { customer, payment } => {
                let placed = self
                    .dispatcher
                    .confirm(&self.session.cart, customer, payment)
                    .await;
                match placed {
                    Ok(order) => {
                        self.session.cart.clear();
                        self.send(&order_placed(&order)).await;
                    }
                    Err(e) => {
                        tracing::warn!(
                            chat_id = %self.session.chat_id,
                            error = %e,
                            "Order rejected"
                        );
                        self.send(&order_failed()).await;
                    }
                }
            }
        }
    }

    async fn send(&mut self, reply: &Reply) {
        self.session.remember_keyboard(&reply.keyboard);
        if let Err(e) = self.replies.send_reply(self.session.chat_id, reply).await {
            tracing::warn!(
                chat_id = %self.session.chat_id,
                error = %e,
                "Failed to deliver reply"
            );
        }
    }
}
