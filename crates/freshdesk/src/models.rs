//! Freshdesk v2 API response models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Tickets
// ============================================================================

/// Identifier of a helpdesk agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A ticket as returned by the list, search and detail endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    /// Ticket number.
    pub id: u64,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Assigned agent, `None` when unassigned.
    pub responder_id: Option<AgentId>,
    /// Requester's company.
    pub company_id: Option<u64>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Numeric status code (2 = Open, 3 = Pending, ...).
    pub status: u32,
    /// Embedded company, only present with `include=company`.
    #[serde(default)]
    pub company: Option<Company>,
    /// Embedded conversations, only present with `include=conversations`.
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

/// A company record.
#[derive(Debug, Clone, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
}

/// A reply or note attached to a ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct Conversation {
    pub id: u64,
    pub ticket_id: u64,
    /// Internal note, hidden from the customer.
    pub private: bool,
    /// Sent by the customer.
    pub incoming: bool,
    pub created_at: DateTime<Utc>,
}

/// Sub-resources that can be embedded in a ticket detail response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Include {
    Company,
    Conversations,
}

impl Include {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Conversations => "conversations",
        }
    }
}

// ============================================================================
// Ticket fields
// ============================================================================

/// A ticket field definition from `ticket_fields`.
///
/// `choices` is left untyped because its shape depends on the field type:
/// the status field maps codes to label pairs, dropdowns carry plain lists.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketField {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub choices: serde_json::Value,
}

// ============================================================================
// Pagination envelope
// ============================================================================

/// One page of results.
///
/// List endpoints return a bare array; the search endpoint wraps its results
/// as `{"total": n, "results": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Page<T> {
    List(Vec<T>),
    Search { results: Vec<T> },
}

impl<T> Page<T> {
    pub(crate) fn into_records(self) -> Vec<T> {
        match self {
            Self::List(records) | Self::Search { results: records } => records,
        }
    }
}

/// One page of the search endpoint, which numbers its pages instead of
/// sending `Link` headers.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchPage<T> {
    /// Matches across all pages.
    #[serde(default)]
    pub(crate) total: Option<usize>,
    pub(crate) results: Vec<T>,
}
