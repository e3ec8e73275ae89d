//! desk-digest - post the open Freshdesk tickets of each agent to Slack.

use anyhow::{Context, Result};
use chrono::Utc;
use desk_digest::{Config, PublishTarget};
use freshdesk::FreshdeskClient;
use notify::{ConsoleChannel, NotifyChannel, SlackChannel};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting JSON log output.
const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("Invalid configuration")?;

    let client = FreshdeskClient::for_subdomain(&config.subdomain, config.api_key.clone())
        .context("Failed to create Freshdesk client")?;

    let channel: Box<dyn NotifyChannel> = match &config.publish {
        PublishTarget::Webhook(url) => {
            Box::new(SlackChannel::new(url.clone()).context("Failed to create Slack channel")?)
        }
        PublishTarget::DryRun => {
            info!("Dry run, printing messages instead of posting");
            Box::new(ConsoleChannel)
        }
    };

    let report = desk_digest::run(&config, &client, channel.as_ref(), Utc::now())
        .await
        .context("Digest run failed")?;

    info!(
        tickets = report.tickets,
        messages = report.messages,
        skipped_agents = report.skipped_agents.len(),
        "Digest complete"
    );
    Ok(())
}

/// Logs go to stderr so a dry run's stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
