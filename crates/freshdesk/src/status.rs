//! Open-status search query built from the account's status definitions.
//!
//! Status codes above 5 are account-defined, so the set of "open" statuses is
//! read from the `status` ticket field on every run instead of hardcoded.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::client::FreshdeskClient;
use crate::error::HelpdeskError;
use crate::models::TicketField;

/// Agent-facing labels of the statuses that count as finished.
pub const CLOSED_STATUS_LABELS: [&str; 2] = ["Resolved", "Closed"];

/// Name of the built-in status field.
const STATUS_FIELD_NAME: &str = "status";

/// Field type filter for `ticket_fields`.
const STATUS_FIELD_TYPE: &str = "default_status";

/// A search expression matching any of a set of status codes,
/// rendered as `status:2 OR status:3 OR ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusQuery {
    codes: Vec<u32>,
}

impl StatusQuery {
    /// Build the query from ticket field definitions, keeping every status
    /// whose agent label is not in [`CLOSED_STATUS_LABELS`].
    ///
    /// # Errors
    /// Returns [`HelpdeskError::UnexpectedShape`] if there is no status field,
    /// its choices cannot be read, or no open status remains.
    pub fn from_fields(fields: &[TicketField]) -> Result<Self, HelpdeskError> {
        let field = fields
            .iter()
            .find(|f| f.name == STATUS_FIELD_NAME)
            .ok_or_else(|| {
                HelpdeskError::UnexpectedShape("no `status` ticket field defined".to_string())
            })?;

        let choices = field.choices.as_object().ok_or_else(|| {
            HelpdeskError::UnexpectedShape(format!(
                "status choices should be an object, got {}",
                field.choices
            ))
        })?;

        let mut codes = Vec::with_capacity(choices.len());
        for (code, labels) in choices {
            let code: u32 = code.parse().map_err(|_| {
                HelpdeskError::UnexpectedShape(format!("status code `{code}` is not numeric"))
            })?;
            let label = agent_label(labels).ok_or_else(|| {
                HelpdeskError::UnexpectedShape(format!("status {code} has no label: {labels}"))
            })?;

            if CLOSED_STATUS_LABELS.contains(&label) {
                debug!(code, label, "Excluding closed status");
            } else {
                codes.push(code);
            }
        }

        if codes.is_empty() {
            return Err(HelpdeskError::UnexpectedShape(
                "every status is closed, nothing to search for".to_string(),
            ));
        }

        codes.sort_unstable();
        Ok(Self { codes })
    }

    /// Status codes included in the query, ascending.
    #[must_use]
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }
}

impl fmt::Display for StatusQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, code) in self.codes.iter().enumerate() {
            if i > 0 {
                f.write_str(" OR ")?;
            }
            write!(f, "status:{code}")?;
        }
        Ok(())
    }
}

/// Choices are `[agent label, customer label]`; some accounts return a bare
/// string instead.
fn agent_label(labels: &Value) -> Option<&str> {
    match labels {
        Value::String(label) => Some(label),
        Value::Array(labels) => labels.first().and_then(Value::as_str),
        _ => None,
    }
}

impl FreshdeskClient {
    /// Fetch the status field definition and build the open-status query.
    ///
    /// # Errors
    /// Returns error on transport failure or if the status field is unusable.
    pub async fn resolve_open_statuses(&self) -> Result<StatusQuery, HelpdeskError> {
        let fields = self.ticket_fields(Some(STATUS_FIELD_TYPE)).await?;
        let query = StatusQuery::from_fields(&fields)?;
        debug!(query = %query, "Resolved open statuses");
        Ok(query)
    }
}
