//! Render a [`Digest`] into one Slack message per destination.

use chrono::{DateTime, Utc};
use notify::{Attachment, Color, Field, Message};

use crate::aggregate::{ClassifiedTicket, Digest};
use crate::config::{AgentChannels, Config};

/// Helpdesk view the section headers link to. It lists new (unassigned)
/// tickets together with the viewer's own open ones.
const TICKET_VIEW: &str = "new_and_my_open";

/// Builds messages for one run.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    portal_url: String,
    username: String,
    icon_emoji: String,
}

impl MessageFormatter {
    #[must_use]
    pub fn new(
        portal_url: impl Into<String>,
        username: impl Into<String>,
        icon_emoji: impl Into<String>,
    ) -> Self {
        Self {
            portal_url: portal_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            icon_emoji: icon_emoji.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.portal_url(),
            config.username.clone(),
            config.icon_emoji.clone(),
        )
    }

    /// One message per mapped agent that has something to show, then one for
    /// `unassigned_channel` when set and the pool is non-empty.
    ///
    /// Agents absent from `channels` get nothing; their tickets are not
    /// redirected anywhere.
    #[must_use]
    pub fn messages(
        &self,
        digest: &Digest,
        channels: &AgentChannels,
        unassigned_channel: Option<&str>,
        now: DateTime<Utc>,
    ) -> Vec<Message> {
        let unassigned = self.block(digest.unassigned(), "Unassigned tickets", now);
        let mut messages = Vec::new();

        for (agent, channel) in channels.iter() {
            let own = digest.agent_tickets(agent);
            if own.is_empty() && unassigned.is_empty() {
                continue;
            }

            let mut attachments = self.block(own, "Your tickets", now);
            attachments.extend(unassigned.iter().cloned());

            messages.push(self.message(
                channel,
                summary(digest.awaiting_reply(agent), digest.new_tickets()),
                attachments,
            ));
        }

        if let Some(channel) = unassigned_channel {
            if !unassigned.is_empty() {
                messages.push(self.message(
                    channel,
                    summary(0, digest.new_tickets()),
                    unassigned,
                ));
            }
        }

        messages
    }

    /// Attachments for a run of tickets; the first one carries the section
    /// header.
    fn block(
        &self,
        tickets: &[ClassifiedTicket],
        header: &str,
        now: DateTime<Utc>,
    ) -> Vec<Attachment> {
        tickets
            .iter()
            .enumerate()
            .map(|(i, ticket)| {
                let mut attachment = self.attachment(ticket, now);
                if i == 0 {
                    attachment.pretext = Some(format!(
                        "<{}/a/tickets/filters/{TICKET_VIEW}|{header}>",
                        self.portal_url
                    ));
                }
                attachment
            })
            .collect()
    }

    /// Render one ticket. Red when the customer is waiting, green otherwise.
    #[must_use]
    pub fn attachment(&self, ticket: &ClassifiedTicket, now: DateTime<Utc>) -> Attachment {
        let id = ticket.ticket.id;
        let subject = &ticket.ticket.subject;

        Attachment {
            fallback: format!("#{id} - {} - {subject}", ticket.company_name),
            text: format!(
                "<{}/a/tickets/{id}|#{id} {}>",
                self.portal_url,
                escape(subject)
            ),
            pretext: None,
            color: if ticket.awaiting_reply() {
                Color::Danger
            } else {
                Color::Good
            },
            fields: vec![Field {
                title: Some(ticket.company_name.clone()),
                value: ticket.reply.description(now),
                short: false,
            }],
        }
    }

    fn message(&self, channel: &str, text: String, attachments: Vec<Attachment>) -> Message {
        Message {
            channel: channel.to_string(),
            username: self.username.clone(),
            icon_emoji: self.icon_emoji.clone(),
            text,
            attachments,
        }
    }
}

/// `"2 tickets awaiting reply. 1 new ticket."`, leaving out zero counts.
#[must_use]
pub fn summary(awaiting_reply: usize, new_tickets: usize) -> String {
    let mut parts = Vec::with_capacity(2);
    if awaiting_reply > 0 {
        parts.push(format!("{} awaiting reply.", tickets(awaiting_reply)));
    }
    if new_tickets > 0 {
        parts.push(format!("{new_tickets} new {}.", noun(new_tickets)));
    }
    parts.join(" ")
}

fn tickets(count: usize) -> String {
    format!("{count} {}", noun(count))
}

const fn noun(count: usize) -> &'static str {
    if count == 1 {
        "ticket"
    } else {
        "tickets"
    }
}

/// Slack control characters inside link text.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
