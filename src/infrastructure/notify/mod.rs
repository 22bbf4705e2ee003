//! Alert delivery

mod discord_webhook;
mod message_split;

pub use discord_webhook::DiscordWebhook;
pub use message_split::{split_message, MESSAGE_MARKER};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::shared::errors::NotifyError;

/// Discord's 2000-character content limit, applied as a byte budget.
/// Bytes never undercount characters, so a chunk within it always fits.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Destination for formatted alert text
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Longest payload a single delivery accepts, in bytes
    fn max_message_len(&self) -> usize {
        DISCORD_MESSAGE_LIMIT
    }

    async fn deliver(&self, content: &str) -> Result<(), NotifyError>;
}

/// Sink used when no webhook is configured: alerts only go to the log
#[derive(Debug, Default, Clone)]
pub struct LogSink;

#[async_trait]
impl AlertSink for LogSink {
    fn max_message_len(&self) -> usize {
        usize::MAX
    }

    async fn deliver(&self, content: &str) -> Result<(), NotifyError> {
        info!("📣 Alert:\n{}", content);
        Ok(())
    }
}

/// Split `content` to fit the sink and deliver every chunk.
///
/// Best effort: a failed chunk is logged and the rest are still sent.
/// Returns the number of chunks delivered.
pub async fn deliver_alert<S>(sink: &S, content: &str) -> usize
where
    S: AlertSink + ?Sized,
{
    let chunks = split_message(content, sink.max_message_len());
    let total = chunks.len();
    let mut delivered = 0;

    for (i, chunk) in chunks.into_iter().enumerate() {
        match sink.deliver(chunk).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!("⚠️ Failed to deliver alert chunk {}/{}: {}", i + 1, total, e),
        }
    }
    delivered
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSink;
    use super::*;

    #[tokio::test]
    async fn test_deliver_alert_splits_for_sink() {
        let sink = RecordingSink::with_limit(20);
        let content = "header\n - aaaaaaaa\n - bbbbbbbb\n - cc";
        let delivered = deliver_alert(&sink, content).await;

        let messages = sink.messages();
        assert_eq!(delivered, messages.len());
        assert!(messages.len() > 1);
        assert!(messages.iter().all(|m| m.len() <= 20));
        assert_eq!(messages.concat(), content);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_not_fatal() {
        let sink = RecordingSink {
            limit: 2000,
            fail: true,
            ..Default::default()
        };
        assert_eq!(deliver_alert(&sink, "hello").await, 0);
    }

    #[tokio::test]
    async fn test_limit_is_a_byte_budget() {
        // 1200 characters but 2400 bytes
        let content = format!("header\n - {}", "é".repeat(1195));
        let sink = RecordingSink::with_limit(DISCORD_MESSAGE_LIMIT);
        deliver_alert(&sink, &content).await;

        let messages = sink.messages();
        assert!(messages.len() > 1);
        assert!(messages.iter().all(|m| m.len() <= DISCORD_MESSAGE_LIMIT));
        assert_eq!(messages.concat(), content);
    }

    #[tokio::test]
    async fn test_log_sink_never_splits() {
        let content = " - x".repeat(2000);
        assert_eq!(deliver_alert(&LogSink, &content).await, 1);
    }
}
