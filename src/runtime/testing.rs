//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use crate::session::ChatId;
use crate::state_machine::Reply;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// Mock Reply Sink
// ============================================================================

/// Records every reply sent to users
#[derive(Default)]
pub struct MockReplySink {
    replies: Mutex<Vec<(ChatId, Reply)>>,
    stalled: Option<ChatId>,
}

impl MockReplySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies to `chat` never complete, as with a hung transport
    pub fn stalling(chat: ChatId) -> Self {
        Self {
            stalled: Some(chat),
            ..Self::default()
        }
    }

    /// Replies sent to one chat, in order
    pub fn replies_for(&self, chat: ChatId) -> Vec<Reply> {
        self.replies
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| *to == chat)
            .map(|(_, reply)| reply.clone())
            .collect()
    }

    pub fn last_for(&self, chat: ChatId) -> Option<Reply> {
        self.replies_for(chat).pop()
    }
}

#[async_trait]
impl ReplySink for MockReplySink {
    async fn send_reply(&self, chat: ChatId, reply: &Reply) -> Result<(), SinkError> {
        if self.stalled == Some(chat) {
            std::future::pending::<()>().await;
        }
        self.replies.lock().unwrap().push((chat, reply.clone()));
        Ok(())
    }
}

// ============================================================================
// Mock Notification Sink
// ============================================================================

/// Records notifications; can be told to fail every delivery
#[derive(Default)]
pub struct MockNotificationSink {
    sent: Mutex<Vec<(ChatId, String)>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Successfully delivered notifications
    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Delivery attempts, successful or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationSink for MockNotificationSink {
    async fn notify(&self, recipient: ChatId, text: &str) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SinkError("mock delivery failure".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient, text.to_string()));
        Ok(())
    }
}
