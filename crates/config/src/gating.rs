//! Environment gating for integrations

use crate::env::{Env, OFFLINE_FLAG_VAR, SLACK_FLAG_VAR, TWITTER_FLAG_VAR};
use crate::schema::IntegrationsConfig;
use tracing::debug;

/// Snapshot of the flags that decide which integrations stay enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvGates {
    pub slack: bool,
    pub twitter: bool,
    /// Legacy global switch. When false it overrides both flags above.
    pub offline: bool,
}

impl EnvGates {
    pub fn from_env(env: &Env) -> Self {
        Self {
            slack: env.is_set(SLACK_FLAG_VAR),
            twitter: env.is_set(TWITTER_FLAG_VAR),
            offline: env.is_set(OFFLINE_FLAG_VAR),
        }
    }

    /// Clear every record whose gate is closed
    pub fn apply(&self, mut integrations: IntegrationsConfig) -> IntegrationsConfig {
        if !self.slack && integrations.slack.take().is_some() {
            debug!("Slack integration disabled: {} is not set", SLACK_FLAG_VAR);
        }
        if !self.twitter && integrations.twitter.take().is_some() {
            debug!("Twitter integration disabled: {} is not set", TWITTER_FLAG_VAR);
        }

        // Backwards compatible global switch
        if !self.offline {
            if integrations.slack.is_some() || integrations.twitter.is_some() {
                debug!("All integrations disabled: {} is not set", OFFLINE_FLAG_VAR);
            }
            integrations.slack = None;
            integrations.twitter = None;
        }

        integrations
    }
}
