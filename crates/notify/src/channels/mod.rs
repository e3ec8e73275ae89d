//! Notification channel implementations.

pub mod console;
pub mod slack;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::message::Message;

/// Trait for places a message can be published to (Slack webhook, console).
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Publish one message.
    async fn send(&self, message: &Message) -> Result<(), ChannelError>;
}
