//! Long-poll loop feeding updates into chat runtimes

use super::types::Update;
use super::TelegramClient;
use crate::runtime::{ReplySink, SessionManager};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const RETRY_BASE: Duration = Duration::from_secs(1);
const RETRY_MAX: Duration = Duration::from_secs(30);

/// Doubling delay between failed polls, reset by any success
#[derive(Debug, Default)]
struct Backoff {
    failures: u32,
}

impl Backoff {
    fn next_delay(&mut self) -> Duration {
        let delay = RETRY_BASE
            .saturating_mul(1 << self.failures.min(5))
            .min(RETRY_MAX);
        self.failures = self.failures.saturating_add(1);
        delay
    }

    fn reset(&mut self) {
        self.failures = 0;
    }
}

/// Offset that acknowledges every update in `updates`
fn next_offset(current: i64, updates: &[Update]) -> i64 {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .map_or(current, |next| next.max(current))
}

/// Poll until `shutdown` fires, routing each message to its chat's runtime
pub async fn run_poller<R>(
    client: Arc<TelegramClient>,
    sessions: Arc<SessionManager<R>>,
    shutdown: CancellationToken,
) where
    R: ReplySink + 'static,
{
    let mut offset = 0;
    let mut backoff = Backoff::default();
    tracing::info!("Polling for updates");

    loop {
        let polled = tokio::select! {
            () = shutdown.cancelled() => break,
            polled = client.get_updates(offset) => polled,
        };

        let updates = match polled {
            Ok(updates) => {
                backoff.reset();
                updates
            }
            Err(e) => {
                let delay = backoff.next_delay();
                tracing::warn!(error = %e, retry_in = ?delay, "Polling failed");
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    () = tokio::time::sleep(delay) => continue,
                }
            }
        };

        offset = next_offset(offset, &updates);
        for update in updates {
            let Some((chat_id, inbound)) = update.message.and_then(|m| m.into_inbound()) else {
                tracing::debug!(update_id = update.update_id, "Ignoring unsupported update");
                continue;
            };
            if let Err(e) = sessions.dispatch(chat_id, inbound).await {
                tracing::warn!(error = %e, "Dropped message");
            }
        }
    }

    tracing::info!("Poller stopped");
}
