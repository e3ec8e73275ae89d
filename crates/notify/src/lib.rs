//! Slack messages and publishing channels for the ticket digest.
//!
//! # Usage
//!
//! ```no_run
//! use notify::{Attachment, Color, Message, NotifyChannel, SlackChannel};
//!
//! # async fn run() -> Result<(), notify::ChannelError> {
//! let slack = SlackChannel::new("https://hooks.slack.com/services/T000/B000/XXX")?;
//!
//! slack
//!     .send(&Message {
//!         channel: "#support".to_string(),
//!         username: "Freshdesk".to_string(),
//!         icon_emoji: ":ticket:".to_string(),
//!         text: "1 ticket awaiting reply.".to_string(),
//!         attachments: vec![Attachment {
//!             fallback: "#42 - Acme - Login broken".to_string(),
//!             text: "<https://acme.freshdesk.com/a/tickets/42|#42 Login broken>".to_string(),
//!             pretext: None,
//!             color: Color::Danger,
//!             fields: vec![],
//!         }],
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`NotifyChannel`] trait defines the interface for publishing a [`Message`]
//! - [`SlackChannel`] posts to an incoming webhook
//! - [`ConsoleChannel`] prints to stdout for dry runs

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod error;
pub mod message;

pub use channels::console::ConsoleChannel;
pub use channels::slack::SlackChannel;
pub use channels::NotifyChannel;
pub use error::ChannelError;
pub use message::{Attachment, Color, Field, Message};
