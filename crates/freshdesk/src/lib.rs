#![allow(clippy::doc_markdown)] // Allow brand names like Freshdesk without backticks

//! Freshdesk v2 API client.
//!
//! Read-only access to the parts of the helpdesk API the ticket digest needs:
//!
//! - **Tickets** - list by predefined filter, search by query, detail with
//!   embedded company / conversations
//! - **Conversations** - replies and notes of a ticket
//! - **Ticket fields** - status definitions used to build the open-status query
//!
//! List endpoints are paginated through the `Link` response header; search
//! is paginated by page number. Either way the records come back as one flat
//! `Vec` in server order.
//!
//! ## Example
//!
//! ```rust,ignore
//! use freshdesk::{FreshdeskClient, Include};
//!
//! let client = FreshdeskClient::for_subdomain("acme", api_key)?;
//!
//! let open = client.resolve_open_statuses().await?;
//! for summary in client.search_tickets(&open.to_string()).await? {
//!     let ticket = client.ticket(summary.id, &[Include::Company]).await?;
//!     let replies = client.conversations(ticket.id).await?;
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod status;

pub use client::{FreshdeskClient, SEARCH_MAX_PAGES, SEARCH_PAGE_SIZE};
pub use error::HelpdeskError;
pub use models::{AgentId, Company, Conversation, Include, Ticket, TicketField};
pub use status::{StatusQuery, CLOSED_STATUS_LABELS};
