use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::AlertSink;
use crate::shared::errors::NotifyError;

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Discord channel webhook
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    http_client: Client,
    url: String,
    max_message_len: usize,
}

impl DiscordWebhook {
    pub fn new(url: impl Into<String>, max_message_len: usize, timeout: Duration) -> Result<Self, NotifyError> {
        Ok(Self {
            http_client: Client::builder().timeout(timeout).build()?,
            url: url.into(),
            max_message_len,
        })
    }
}

#[async_trait]
impl AlertSink for DiscordWebhook {
    fn max_message_len(&self) -> usize {
        self.max_message_len
    }

    async fn deliver(&self, content: &str) -> Result<(), NotifyError> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&WebhookMessage { content })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        debug!("Delivered {} byte alert to webhook", content.len());
        Ok(())
    }
}
