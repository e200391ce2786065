//! Main application structure

use crate::integrations::{slack_init, twitter_init, IntegrationStatus};
use config::{ConfigSource, IntegrationsConfig, PrimaryConfig, ResolvedConfig};
use std::sync::Arc;
use tracing::info;

/// Read-only state shared with everything started after configuration
#[derive(Debug)]
pub struct AppState {
    pub config: PrimaryConfig,
    pub integrations: IntegrationsConfig,
    pub source: ConfigSource,
}

/// Application built from a resolved configuration
pub struct Application {
    state: Arc<AppState>,
    slack: IntegrationStatus,
    twitter: IntegrationStatus,
}

impl Application {
    /// Take ownership of the resolved configuration and initialize integrations
    pub fn new(resolved: ResolvedConfig) -> Self {
        info!("Initializing application components...");

        let state = Arc::new(AppState {
            config: resolved.primary,
            integrations: resolved.integrations,
            source: resolved.source,
        });

        let slack = slack_init(state.integrations.slack.as_ref());
        let twitter = twitter_init(state.integrations.twitter.as_ref());

        Self {
            state,
            slack,
            twitter,
        }
    }

    /// Get application state
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    pub fn slack_status(&self) -> &IntegrationStatus {
        &self.slack
    }

    pub fn twitter_status(&self) -> &IntegrationStatus {
        &self.twitter
    }

    /// Human-readable summary of the configuration in effect
    pub fn summary(&self) -> Vec<String> {
        let config = &self.state.config;
        let source = match &self.state.source {
            ConfigSource::Loaded(path) => format!("{} (loaded)", path.display()),
            ConfigSource::DefaultsWritten(path) => format!("{} (defaults written)", path.display()),
        };
        let integration_file = if config.integrations_enabled() {
            config.integration_config.as_str()
        } else {
            "none"
        };

        vec![
            format!("Config file: {}", source),
            format!("SSH port: {}", config.ssh_port),
            format!("Profile port: {}", config.profile_port),
            format!("Data dir: {}", config.data_dir),
            format!("Key file: {}", config.key_file),
            format!("Integration config: {}", integration_file),
            format!("Slack: {}", self.slack),
            format!("Twitter: {}", self.twitter),
        ]
    }
}
