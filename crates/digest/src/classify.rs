//! Who spoke last on a ticket, and how long ago.

use chrono::{DateTime, Duration, Utc};
use freshdesk::Conversation;

/// Reply state of a ticket, derived from its public conversation entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyStatus {
    /// The last public entry came from the customer. Also true when there is
    /// no public entry at all: an untouched ticket is awaiting a reply.
    pub customer_replied: bool,
    /// Creation time of the last public entry.
    pub last_reply: Option<DateTime<Utc>>,
}

impl ReplyStatus {
    /// Classify from conversation entries in API order. Private notes are
    /// ignored; the last remaining entry decides.
    #[must_use]
    pub fn classify(conversations: &[Conversation]) -> Self {
        match conversations.iter().rev().find(|c| !c.private) {
            Some(last) => Self {
                customer_replied: last.incoming,
                last_reply: Some(last.created_at),
            },
            None => Self {
                customer_replied: true,
                last_reply: None,
            },
        }
    }

    /// Humanized time since the last public entry.
    #[must_use]
    pub fn since(&self, now: DateTime<Utc>) -> Option<String> {
        self.last_reply.map(|at| humanize_since(now - at))
    }

    /// `Customer replied 3 hours ago`, `Agent replied just now`, or
    /// `No replies yet`.
    #[must_use]
    pub fn description(&self, now: DateTime<Utc>) -> String {
        match self.since(now) {
            Some(since) => {
                let who = if self.customer_replied {
                    "Customer"
                } else {
                    "Agent"
                };
                format!("{who} replied {since}")
            }
            None => "No replies yet".to_string(),
        }
    }
}

/// Render an elapsed duration in its coarsest whole unit: months (28 days),
/// weeks, days, hours, or `just now` below one hour.
#[must_use]
pub fn humanize_since(elapsed: Duration) -> String {
    let days = elapsed.num_days();
    let (count, unit) = if days >= 28 {
        (days / 28, "month")
    } else if days >= 7 {
        (days / 7, "week")
    } else if days >= 1 {
        (days, "day")
    } else if elapsed.num_hours() >= 1 {
        (elapsed.num_hours(), "hour")
    } else {
        return "just now".to_string();
    };

    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{plural} ago")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(private: bool, incoming: bool, minute: u32) -> Conversation {
        Conversation {
            id: u64::from(minute),
            ticket_id: 1,
            private,
            incoming,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_no_public_entries_means_customer_waiting() {
        for conversations in [vec![], vec![entry(true, false, 1)]] {
            let status = ReplyStatus::classify(&conversations);
            assert!(status.customer_replied);
            assert!(status.last_reply.is_none());
            assert!(status.since(Utc::now()).is_none());
            assert_eq!(status.description(Utc::now()), "No replies yet");
        }
    }

    #[test]
    fn test_last_public_entry_wins() {
        let conversations = vec![
            entry(false, true, 1),
            entry(false, false, 2),
            entry(true, false, 3),
        ];
        let status = ReplyStatus::classify(&conversations);
        assert!(!status.customer_replied);
        assert_eq!(status.last_reply, Some(conversations[1].created_at));
    }

    #[test]
    fn test_customer_reply_after_agent() {
        let conversations = vec![entry(false, false, 1), entry(false, true, 2)];
        let status = ReplyStatus::classify(&conversations);
        assert!(status.customer_replied);

        let now = conversations[1].created_at + Duration::hours(3);
        assert_eq!(status.description(now), "Customer replied 3 hours ago");
    }

    #[test]
    fn test_agent_description() {
        let status = ReplyStatus::classify(&[entry(false, false, 0)]);
        let now = Utc.with_ymd_and_hms(2024, 3, 3, 11, 0, 0).unwrap();
        assert_eq!(status.description(now), "Agent replied 2 days ago");
    }

    #[test]
    fn test_humanize_buckets() {
        assert_eq!(humanize_since(Duration::minutes(59)), "just now");
        assert_eq!(humanize_since(Duration::minutes(60)), "1 hour ago");
        assert_eq!(humanize_since(Duration::hours(23)), "23 hours ago");
        assert_eq!(humanize_since(Duration::hours(24)), "1 day ago");
        assert_eq!(humanize_since(Duration::days(6)), "6 days ago");
        assert_eq!(humanize_since(Duration::days(7)), "1 week ago");
        assert_eq!(humanize_since(Duration::days(17)), "2 weeks ago");
        assert_eq!(humanize_since(Duration::days(27)), "3 weeks ago");
        assert_eq!(humanize_since(Duration::days(28)), "1 month ago");
        assert_eq!(humanize_since(Duration::days(90)), "3 months ago");
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        assert_eq!(humanize_since(Duration::minutes(-5)), "just now");
    }
}
