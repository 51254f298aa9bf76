//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::session::ChatId;
use crate::state_machine::Reply;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Delivery failure reported by a transport
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SinkError(pub String);

/// Delivers replies to the chat that produced the input
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_reply(&self, chat: ChatId, reply: &Reply) -> Result<(), SinkError>;
}

/// Delivers order summaries to staff, admin and group chats.
///
/// Callers treat a returned error as final; nothing is retried.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, recipient: ChatId, text: &str) -> Result<(), SinkError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ReplySink + ?Sized> ReplySink for Arc<T> {
    async fn send_reply(&self, chat: ChatId, reply: &Reply) -> Result<(), SinkError> {
        (**self).send_reply(chat, reply).await
    }
}

#[async_trait]
impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    async fn notify(&self, recipient: ChatId, text: &str) -> Result<(), SinkError> {
        (**self).notify(recipient, text).await
    }
}
