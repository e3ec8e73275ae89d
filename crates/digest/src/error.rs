//! Error type for a digest run.

use thiserror::Error;

use crate::config::ConfigError;

/// Every failure is fatal to the run.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Helpdesk(#[from] freshdesk::HelpdeskError),

    #[error(transparent)]
    Publish(#[from] notify::ChannelError),
}
