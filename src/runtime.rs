//! Runtime for driving chats
//!
//! Each chat gets its own task that owns the session and processes input in
//! arrival order. Different chats run concurrently and share only the
//! catalog and the order dispatcher.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ChatRuntime;
pub use traits::*;

use crate::order::OrderDispatcher;
use crate::session::{ChatId, Inbound};
use crate::state_machine::ChatContext;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

const CHAT_QUEUE_DEPTH: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The chat's queue is full; the input was dropped
    #[error("chat {0} is busy, input dropped")]
    Busy(ChatId),
    #[error("runtime for chat {0} has stopped")]
    Closed(ChatId),
}

/// Handle to interact with a running chat
#[derive(Clone)]
pub struct ChatHandle {
    pub inbound_tx: mpsc::Sender<Inbound>,
}

/// Manager for all chat runtimes
pub struct SessionManager<R>
where
    R: ReplySink + 'static,
{
    context: Arc<ChatContext>,
    replies: Arc<R>,
    dispatcher: Arc<OrderDispatcher>,
    chats: RwLock<HashMap<ChatId, ChatHandle>>,
}

impl<R> SessionManager<R>
where
    R: ReplySink + 'static,
{
    pub fn new(
        context: Arc<ChatContext>,
        replies: Arc<R>,
        dispatcher: Arc<OrderDispatcher>,
    ) -> Self {
        Self {
            context,
            replies,
            dispatcher,
            chats: RwLock::new(HashMap::new()),
        }
    }

    /// Get the handle for a chat, starting its runtime on first contact
    pub async fn get_or_create(&self, chat_id: ChatId) -> ChatHandle {
        if let Some(handle) = self.chats.read().await.get(&chat_id) {
            return handle.clone();
        }

        let mut chats = self.chats.write().await;
        // Another caller may have started it while we waited for the lock
        if let Some(handle) = chats.get(&chat_id) {
            return handle.clone();
        }

        let (inbound_tx, inbound_rx) = mpsc::channel(CHAT_QUEUE_DEPTH);
        let runtime = ChatRuntime::new(
            chat_id,
            self.context.clone(),
            self.replies.clone(),
            self.dispatcher.clone(),
        );
        tokio::spawn(async move {
            runtime.run(inbound_rx).await;
            tracing::info!(chat_id = %chat_id, "Chat runtime finished");
        });
        let handle = ChatHandle { inbound_tx };
        chats.insert(chat_id, handle.clone());
        tracing::info!(chat_id = %chat_id, active = chats.len(), "Started chat runtime");
        handle
    }

    /// Queue input for a chat without waiting on it.
    ///
    /// A chat whose queue is full gets `Busy` so that one stuck chat never
    /// holds up input for the others.
    pub async fn dispatch(&self, chat_id: ChatId, inbound: Inbound) -> Result<(), DispatchError> {
        let handle = self.get_or_create(chat_id).await;
        match handle.inbound_tx.try_send(inbound) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DispatchError::Busy(chat_id)),
            Err(TrySendError::Closed(_)) => {
                // The task is gone; forget it so the next message starts afresh
                self.chats.write().await.remove(&chat_id);
                Err(DispatchError::Closed(chat_id))
            }
        }
    }
}
