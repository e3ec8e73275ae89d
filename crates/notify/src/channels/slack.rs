//! Slack webhook notification channel.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::message::Message;
use crate::NotifyChannel;

/// Default timeout for webhook posts.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Slack incoming-webhook channel.
///
/// The destination channel is part of each [`Message`], so one webhook
/// serves every agent.
pub struct SlackChannel {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackChannel {
    /// Create a Slack channel posting to `webhook_url`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, ChannelError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            webhook_url: webhook_url.into(),
            client,
        })
    }
}

#[async_trait]
impl NotifyChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, message: &Message) -> Result<(), ChannelError> {
        debug!(
            channel = "slack",
            destination = %message.channel,
            attachments = message.attachments.len(),
            "Sending message"
        );

        let response = self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await?;

        if response.status().is_success() {
            debug!(channel = "slack", destination = %message.channel, "Message sent successfully");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            warn!(
                channel = "slack",
                status = %status,
                body = %body,
                "Slack webhook request failed"
            );

            Err(ChannelError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
