//! Integration entry points
//!
//! Both initializers are always called. Each one decides from the presence
//! of its settings whether the integration runs.

use config::{mask_secret, SlackSettings, TwitterSettings};
use std::fmt;
use tracing::{debug, info};

/// Outcome of initializing one integration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationStatus {
    Enabled { detail: String },
    Disabled,
}

impl IntegrationStatus {
    pub fn is_enabled(&self) -> bool {
        matches!(self, IntegrationStatus::Enabled { .. })
    }
}

impl fmt::Display for IntegrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationStatus::Enabled { detail } => write!(f, "enabled ({})", detail),
            IntegrationStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// Initialize the Slack bridge
pub fn slack_init(settings: Option<&SlackSettings>) -> IntegrationStatus {
    let Some(slack) = settings else {
        debug!("Slack integration disabled");
        return IntegrationStatus::Disabled;
    };

    info!("Slack integration enabled for channel {}", slack.channel_id);
    IntegrationStatus::Enabled {
        detail: format!("channel {}, prefix {}", slack.channel_id, slack.prefix),
    }
}

/// Initialize the Twitter integration
pub fn twitter_init(settings: Option<&TwitterSettings>) -> IntegrationStatus {
    let Some(twitter) = settings else {
        debug!("Twitter integration disabled");
        return IntegrationStatus::Disabled;
    };

    info!("Twitter integration enabled");
    IntegrationStatus::Enabled {
        detail: format!("consumer key {}", mask_secret(&twitter.consumer_key)),
    }
}
