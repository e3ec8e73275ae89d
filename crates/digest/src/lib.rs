#![allow(clippy::doc_markdown)] // Allow brand names like Freshdesk without backticks

//! Per-agent Slack digest of open Freshdesk tickets.
//!
//! Each run lists the open tickets, works out for every ticket whether the
//! customer or the agent spoke last, groups tickets by assigned agent and
//! posts one message per agent channel. Unassigned tickets are appended to
//! every agent's message.
//!
//! ## Configuration
//!
//! Read from the environment by [`Config::from_env`]:
//!
//! - `FRESHDESK_KEY`: API key
//! - `FRESHDESK_URL`: account subdomain (`acme` for `acme.freshdesk.com`)
//! - `FRESHDESK_AGENT_CHANNELS`: `agentId:channel,...` mapping
//! - `SLACK_URL`: incoming webhook URL (not needed with `DIGEST_DRY_RUN`)
//! - `SLACK_CHANNEL`: optional channel receiving only unassigned tickets
//! - `FRESHDESK_FILTER`: optional list filter replacing the open-status search
//! - `SLACK_USERNAME`, `SLACK_ICON`: optional bot identity
//! - `DIGEST_DRY_RUN`: set to "true" to print messages instead of posting

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod pipeline;

pub use aggregate::{ClassifiedTicket, Digest};
pub use classify::ReplyStatus;
pub use config::{AgentChannels, Config, ConfigError, PublishTarget, TicketSource};
pub use error::DigestError;
pub use format::MessageFormatter;
pub use pipeline::{run, RunReport};
