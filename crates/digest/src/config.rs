//! Run configuration, read once from the environment and validated up front.

use std::collections::BTreeMap;

use freshdesk::AgentId;
use thiserror::Error;

/// Environment variable names.
pub const ENV_FRESHDESK_KEY: &str = "FRESHDESK_KEY";
pub const ENV_FRESHDESK_URL: &str = "FRESHDESK_URL";
pub const ENV_FRESHDESK_FILTER: &str = "FRESHDESK_FILTER";
pub const ENV_AGENT_CHANNELS: &str = "FRESHDESK_AGENT_CHANNELS";
pub const ENV_SLACK_URL: &str = "SLACK_URL";
pub const ENV_SLACK_CHANNEL: &str = "SLACK_CHANNEL";
pub const ENV_SLACK_USERNAME: &str = "SLACK_USERNAME";
pub const ENV_SLACK_ICON: &str = "SLACK_ICON";
pub const ENV_DRY_RUN: &str = "DIGEST_DRY_RUN";

const DEFAULT_USERNAME: &str = "Freshdesk";
const DEFAULT_ICON: &str = ":ticket:";

/// Configuration errors. All of them stop the run before any request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("Invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("Invalid agent mapping entry `{entry}`: {reason}")]
    InvalidMapping { entry: String, reason: String },
}

/// Agent id → destination channel, parsed from `"5:#support,7:@alice"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentChannels(BTreeMap<AgentId, String>);

impl AgentChannels {
    /// Parse the comma-separated `agentId:channel` list.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidMapping`] for an entry without a colon, a
    /// non-numeric id, an empty channel, a repeated agent, or a list without
    /// any entry.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut channels = BTreeMap::new();

        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = |reason: &str| ConfigError::InvalidMapping {
                entry: entry.to_string(),
                reason: reason.to_string(),
            };

            let (id, channel) = entry
                .split_once(':')
                .ok_or_else(|| invalid("expected `agentId:channel`"))?;
            let id: u64 = id
                .trim()
                .parse()
                .map_err(|_| invalid("agent id is not a number"))?;
            let channel = channel.trim();
            if channel.is_empty() {
                return Err(invalid("channel is empty"));
            }

            if channels.insert(AgentId(id), channel.to_string()).is_some() {
                return Err(invalid("agent is mapped twice"));
            }
        }

        if channels.is_empty() {
            return Err(ConfigError::InvalidMapping {
                entry: raw.to_string(),
                reason: "no agents mapped".to_string(),
            });
        }

        Ok(Self(channels))
    }

    /// Channel configured for `agent`, if any.
    #[must_use]
    pub fn get(&self, agent: AgentId) -> Option<&str> {
        self.0.get(&agent).map(String::as_str)
    }

    /// Mapped agents in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &str)> {
        self.0.iter().map(|(id, channel)| (*id, channel.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(AgentId, String)> for AgentChannels {
    fn from_iter<I: IntoIterator<Item = (AgentId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Where the ticket list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketSource {
    /// Search for every status not labelled Resolved or Closed.
    OpenStatusSearch,
    /// One of the predefined list filters, e.g. `new_and_my_open`.
    Filter(String),
}

/// Where messages go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    /// Slack incoming webhook URL.
    Webhook(String),
    /// Print to stdout.
    DryRun,
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Freshdesk API key.
    pub api_key: String,
    /// Account subdomain, `acme` for `acme.freshdesk.com`.
    pub subdomain: String,
    pub source: TicketSource,
    pub agent_channels: AgentChannels,
    /// Extra destination that receives only the unassigned pool.
    pub unassigned_channel: Option<String>,
    pub publish: PublishTarget,
    pub username: String,
    pub icon_emoji: String,
}

impl Config {
    /// Read the configuration from process environment variables.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a required variable is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`. Blank values count as unset.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a required variable is missing or malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let api_key = require(ENV_FRESHDESK_KEY)?;

        let subdomain = require(ENV_FRESHDESK_URL)?;
        if !subdomain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ConfigError::Invalid {
                var: ENV_FRESHDESK_URL,
                reason: format!("`{subdomain}` is not a bare account subdomain"),
            });
        }

        let agent_channels = AgentChannels::parse(&require(ENV_AGENT_CHANNELS)?)?;

        let dry_run =
            get(ENV_DRY_RUN).is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1");
        let publish = if dry_run {
            PublishTarget::DryRun
        } else {
            PublishTarget::Webhook(require(ENV_SLACK_URL)?)
        };

        let source = get(ENV_FRESHDESK_FILTER)
            .map_or(TicketSource::OpenStatusSearch, TicketSource::Filter);

        Ok(Self {
            api_key,
            subdomain,
            source,
            agent_channels,
            unassigned_channel: get(ENV_SLACK_CHANNEL),
            publish,
            username: get(ENV_SLACK_USERNAME).unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            icon_emoji: get(ENV_SLACK_ICON).unwrap_or_else(|| DEFAULT_ICON.to_string()),
        })
    }

    /// Agent-facing web portal, used for links in messages.
    #[must_use]
    pub fn portal_url(&self) -> String {
        format!("https://{}.freshdesk.com", self.subdomain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_FRESHDESK_KEY, "key"),
            (ENV_FRESHDESK_URL, "acme"),
            (ENV_AGENT_CHANNELS, "5:#support, 7:@alice"),
            (ENV_SLACK_URL, "https://hooks.slack.com/services/x"),
        ]
    }

    #[test]
    fn test_parse_agent_channels() {
        let channels = AgentChannels::parse("5:#support,7:@alice,").unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels.get(AgentId(5)), Some("#support"));
        assert_eq!(channels.get(AgentId(7)), Some("@alice"));
        assert_eq!(channels.get(AgentId(9)), None);
    }

    #[test]
    fn test_parse_agent_channels_rejects_malformed_entries() {
        for raw in ["5", "five:#support", "5:", "5:#a,5:#b", " , "] {
            let err = AgentChannels::parse(raw).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidMapping { .. }),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Config::from_lookup(lookup(&base())).unwrap();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.portal_url(), "https://acme.freshdesk.com");
        assert_eq!(config.source, TicketSource::OpenStatusSearch);
        assert_eq!(
            config.publish,
            PublishTarget::Webhook("https://hooks.slack.com/services/x".to_string())
        );
        assert_eq!(config.username, "Freshdesk");
        assert_eq!(config.icon_emoji, ":ticket:");
        assert!(config.unassigned_channel.is_none());
    }

    #[test]
    fn test_from_lookup_optional_values() {
        let mut vars = base();
        vars.push((ENV_FRESHDESK_FILTER, "new_and_my_open"));
        vars.push((ENV_SLACK_CHANNEL, "#helpdesk"));
        vars.push((ENV_SLACK_USERNAME, "Ticket Bot"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(
            config.source,
            TicketSource::Filter("new_and_my_open".to_string())
        );
        assert_eq!(config.unassigned_channel.as_deref(), Some("#helpdesk"));
        assert_eq!(config.username, "Ticket Bot");
    }

    #[test]
    fn test_missing_required_variable() {
        let vars: Vec<_> = base()
            .into_iter()
            .filter(|(k, _)| *k != ENV_FRESHDESK_KEY)
            .collect();
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_FRESHDESK_KEY)));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut vars = base();
        vars.retain(|(k, _)| *k != ENV_SLACK_URL);
        vars.push((ENV_SLACK_URL, "   "));
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_SLACK_URL)));
    }

    #[test]
    fn test_dry_run_does_not_need_webhook() {
        let mut vars = base();
        vars.retain(|(k, _)| *k != ENV_SLACK_URL);
        vars.push((ENV_DRY_RUN, "TRUE"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.publish, PublishTarget::DryRun);
    }

    #[test]
    fn test_subdomain_must_be_bare() {
        let mut vars = base();
        vars.retain(|(k, _)| *k != ENV_FRESHDESK_URL);
        vars.push((ENV_FRESHDESK_URL, "https://acme.freshdesk.com"));
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: ENV_FRESHDESK_URL,
                ..
            }
        ));
    }
}
