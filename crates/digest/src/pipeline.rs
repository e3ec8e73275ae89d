//! One digest run: fetch, enrich, classify, aggregate, format, publish.

use chrono::{DateTime, Utc};
use freshdesk::{AgentId, FreshdeskClient, Include, Ticket};
use notify::NotifyChannel;
use tracing::{debug, info};

use crate::aggregate::{ClassifiedTicket, Digest};
use crate::config::{Config, TicketSource};
use crate::error::DigestError;
use crate::format::MessageFormatter;

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Tickets fetched and classified.
    pub tickets: usize,
    /// Messages published.
    pub messages: usize,
    /// Agents holding tickets but missing from the channel mapping.
    pub skipped_agents: Vec<AgentId>,
}

/// Run the digest once, publishing every message through `channel`.
///
/// Requests are issued one at a time; the first failure aborts the run.
///
/// # Errors
/// Returns [`DigestError`] on any helpdesk or publishing failure.
pub async fn run(
    config: &Config,
    client: &FreshdeskClient,
    channel: &dyn NotifyChannel,
    now: DateTime<Utc>,
) -> Result<RunReport, DigestError> {
    let mut summaries = fetch_tickets(client, &config.source).await?;
    summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    info!(tickets = summaries.len(), "Fetched open tickets");

    let mut classified = Vec::with_capacity(summaries.len());
    for summary in &summaries {
        classified.push(enrich(client, summary.id).await?);
    }

    let digest = Digest::aggregate(classified);

    let skipped_agents: Vec<AgentId> = digest
        .agents()
        .filter(|agent| config.agent_channels.get(*agent).is_none())
        .collect();
    for agent in &skipped_agents {
        info!(
            agent = %agent,
            tickets = digest.agent_tickets(*agent).len(),
            "No channel configured for agent, skipping"
        );
    }

    let messages = MessageFormatter::from_config(config).messages(
        &digest,
        &config.agent_channels,
        config.unassigned_channel.as_deref(),
        now,
    );

    for message in &messages {
        channel.send(message).await?;
        info!(
            channel = channel.name(),
            destination = %message.channel,
            attachments = message.attachments.len(),
            "Published digest"
        );
    }

    Ok(RunReport {
        tickets: digest.len(),
        messages: messages.len(),
        skipped_agents,
    })
}

/// Ticket summaries from the configured source.
async fn fetch_tickets(
    client: &FreshdeskClient,
    source: &TicketSource,
) -> Result<Vec<Ticket>, DigestError> {
    let tickets = match source {
        TicketSource::OpenStatusSearch => {
            let query = client.resolve_open_statuses().await?;
            client.search_tickets(&query.to_string()).await?
        }
        TicketSource::Filter(filter) => client.list_tickets(filter).await?,
    };
    Ok(tickets)
}

/// Ticket detail with company, plus its conversations.
async fn enrich(client: &FreshdeskClient, id: u64) -> Result<ClassifiedTicket, DigestError> {
    let ticket = client.ticket(id, &[Include::Company]).await?;
    let conversations = client.conversations(id).await?;
    debug!(
        ticket = id,
        conversations = conversations.len(),
        "Enriched ticket"
    );
    Ok(ClassifiedTicket::new(ticket, &conversations))
}
