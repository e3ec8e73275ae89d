//! Dry-run channel that prints messages instead of posting them.

use std::fmt::Write as _;
use std::io::Write as _;

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::message::Message;
use crate::NotifyChannel;

/// Prints each message to stdout.
#[derive(Debug, Default)]
pub struct ConsoleChannel;

impl ConsoleChannel {
    /// Plain-text rendering: destination and summary, then one line per
    /// attachment with its field values.
    #[must_use]
    pub fn render(message: &Message) -> String {
        let mut out = String::new();
        if message.text.is_empty() {
            let _ = writeln!(out, "{}", message.channel);
        } else {
            let _ = writeln!(out, "{}: {}", message.channel, message.text);
        }

        for attachment in &message.attachments {
            let _ = write!(out, "  {}", attachment.fallback);
            for field in &attachment.fields {
                let _ = write!(out, " ({})", field.value);
            }
            out.push('\n');
        }
        out
    }
}

#[async_trait]
impl NotifyChannel for ConsoleChannel {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn send(&self, message: &Message) -> Result<(), ChannelError> {
        let rendered = Self::render(message);
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}
