//! Group classified tickets by assigned agent.

use std::collections::BTreeMap;

use freshdesk::{AgentId, Conversation, Ticket};

use crate::classify::ReplyStatus;

/// Company name shown when a ticket has no company.
pub const UNKNOWN_COMPANY: &str = "Unknown";

/// A ticket with its company resolved and its reply state classified.
#[derive(Debug, Clone)]
pub struct ClassifiedTicket {
    pub ticket: Ticket,
    pub company_name: String,
    pub reply: ReplyStatus,
}

impl ClassifiedTicket {
    /// Classify a ticket detail (fetched with `include=company`) against its
    /// conversation entries.
    #[must_use]
    pub fn new(ticket: Ticket, conversations: &[Conversation]) -> Self {
        let company_name = ticket
            .company
            .as_ref()
            .map_or_else(|| UNKNOWN_COMPANY.to_string(), |c| c.name.clone());

        Self {
            reply: ReplyStatus::classify(conversations),
            company_name,
            ticket,
        }
    }

    /// The customer spoke last (or nobody has spoken yet).
    #[must_use]
    pub fn awaiting_reply(&self) -> bool {
        self.reply.customer_replied
    }
}

/// Tickets of one run, grouped by responder, most recently updated first.
#[derive(Debug, Default)]
pub struct Digest {
    assigned: BTreeMap<AgentId, Vec<ClassifiedTicket>>,
    unassigned: Vec<ClassifiedTicket>,
    awaiting_reply: BTreeMap<AgentId, usize>,
    new_tickets: usize,
}

impl Digest {
    /// Group tickets by `responder_id` and count those awaiting a reply.
    ///
    /// Within each group tickets are ordered by `updated_at` descending; equal
    /// timestamps keep their input order.
    #[must_use]
    pub fn aggregate(tickets: impl IntoIterator<Item = ClassifiedTicket>) -> Self {
        let mut digest = Self::default();

        for ticket in tickets {
            let awaiting = ticket.awaiting_reply();
            match ticket.ticket.responder_id {
                Some(agent) => {
                    if awaiting {
                        *digest.awaiting_reply.entry(agent).or_default() += 1;
                    }
                    digest.assigned.entry(agent).or_default().push(ticket);
                }
                None => {
                    if awaiting {
                        digest.new_tickets += 1;
                    }
                    digest.unassigned.push(ticket);
                }
            }
        }

        for group in digest.assigned.values_mut() {
            sort_by_recent(group);
        }
        sort_by_recent(&mut digest.unassigned);

        digest
    }

    /// Agents that have at least one ticket, ascending.
    pub fn agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.assigned.keys().copied()
    }

    /// Tickets assigned to `agent`.
    #[must_use]
    pub fn agent_tickets(&self, agent: AgentId) -> &[ClassifiedTicket] {
        self.assigned
            .get(&agent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Tickets without a responder.
    #[must_use]
    pub fn unassigned(&self) -> &[ClassifiedTicket] {
        &self.unassigned
    }

    /// Tickets assigned to `agent` whose customer spoke last.
    #[must_use]
    pub fn awaiting_reply(&self, agent: AgentId) -> usize {
        self.awaiting_reply.get(&agent).copied().unwrap_or(0)
    }

    /// Unassigned tickets whose customer spoke last.
    #[must_use]
    pub fn new_tickets(&self) -> usize {
        self.new_tickets
    }

    /// Total number of tickets in the digest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.unassigned.len() + self.assigned.values().map(Vec::len).sum::<usize>()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sort_by_recent(tickets: &mut [ClassifiedTicket]) {
    tickets.sort_by(|a, b| b.ticket.updated_at.cmp(&a.ticket.updated_at));
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use freshdesk::Company;

    pub(crate) fn ticket(id: u64, responder: Option<u64>, hour: u32) -> Ticket {
        Ticket {
            id,
            subject: format!("Ticket {id}"),
            responder_id: responder.map(AgentId),
            company_id: None,
            updated_at: Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
            status: 2,
            company: None,
            conversations: vec![],
        }
    }

    pub(crate) fn reply(ticket_id: u64, incoming: bool) -> Conversation {
        Conversation {
            id: ticket_id * 100,
            ticket_id,
            private: false,
            incoming,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    pub(crate) fn classified(
        id: u64,
        responder: Option<u64>,
        hour: u32,
        customer: bool,
    ) -> ClassifiedTicket {
        ClassifiedTicket::new(ticket(id, responder, hour), &[reply(id, customer)])
    }

    fn ids(tickets: &[ClassifiedTicket]) -> Vec<u64> {
        tickets.iter().map(|t| t.ticket.id).collect()
    }

    #[test]
    fn test_company_defaults_to_unknown() {
        let without = ClassifiedTicket::new(ticket(1, None, 1), &[]);
        assert_eq!(without.company_name, "Unknown");

        let mut with = ticket(2, None, 1);
        with.company = Some(Company {
            id: 9,
            name: "Acme".to_string(),
        });
        assert_eq!(ClassifiedTicket::new(with, &[]).company_name, "Acme");
    }

    #[test]
    fn test_groups_by_responder_most_recent_first() {
        let digest = Digest::aggregate(vec![
            classified(1, Some(5), 1, false),
            classified(2, Some(5), 3, true),
            classified(3, None, 2, true),
            classified(4, Some(8), 4, true),
            classified(5, None, 5, false),
        ]);

        assert_eq!(
            digest.agents().collect::<Vec<_>>(),
            vec![AgentId(5), AgentId(8)]
        );
        assert_eq!(ids(digest.agent_tickets(AgentId(5))), vec![2, 1]);
        assert_eq!(ids(digest.agent_tickets(AgentId(8))), vec![4]);
        assert_eq!(ids(digest.unassigned()), vec![5, 3]);
        assert!(digest.agent_tickets(AgentId(99)).is_empty());
        assert_eq!(digest.len(), 5);
    }

    #[test]
    fn test_counters() {
        let digest = Digest::aggregate(vec![
            classified(1, Some(5), 1, false),
            classified(2, Some(5), 3, true),
            classified(3, None, 2, true),
            classified(4, None, 4, false),
            ClassifiedTicket::new(ticket(6, None, 6), &[]),
        ]);

        assert_eq!(digest.awaiting_reply(AgentId(5)), 1);
        assert_eq!(digest.awaiting_reply(AgentId(8)), 0);
        // Ticket 3 replied by customer, ticket 6 untouched.
        assert_eq!(digest.new_tickets(), 2);
    }

    #[test]
    fn test_agent_reply_increments_nothing() {
        let digest = Digest::aggregate(vec![
            classified(1, Some(5), 1, false),
            classified(2, None, 1, false),
        ]);
        assert_eq!(digest.awaiting_reply(AgentId(5)), 0);
        assert_eq!(digest.new_tickets(), 0);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let digest = Digest::aggregate(vec![
            classified(7, Some(1), 2, true),
            classified(3, Some(1), 2, true),
            classified(9, Some(1), 2, true),
        ]);
        assert_eq!(ids(digest.agent_tickets(AgentId(1))), vec![7, 3, 9]);
    }
}
