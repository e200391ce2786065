//! Configuration schema definitions

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Prefix shown before Slack messages when the integrations file leaves it empty
pub const DEFAULT_SLACK_PREFIX: &str = "Slack";

/// Primary server configuration
///
/// Every field always holds a value: the defaults below, or whatever the
/// config file overrides them with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryConfig {
    /// SSH listen port
    #[serde(default = "default_ssh_port", deserialize_with = "null_as_default")]
    pub ssh_port: u16,
    /// Profiling listen port
    #[serde(default = "default_profile_port", deserialize_with = "null_as_default")]
    pub profile_port: u16,
    /// Directory for persistent server data
    #[serde(default = "default_data_dir", deserialize_with = "null_as_default")]
    pub data_dir: String,
    /// Host private key file
    #[serde(default = "default_key_file", deserialize_with = "null_as_default")]
    pub key_file: String,
    /// Path to the integrations file, empty disables integrations
    #[serde(default, deserialize_with = "null_as_default")]
    pub integration_config: String,
}

/// Optional third-party integrations
///
/// A `None` record means the integration is disabled. Consumers must check
/// presence before using a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// Twitter credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<TwitterSettings>,
    /// Slack bridge settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack: Option<SlackSettings>,
}

/// Credentials for the Twitter integration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitterSettings {
    #[serde(deserialize_with = "null_as_default")]
    pub consumer_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub consumer_secret: String,
    #[serde(deserialize_with = "null_as_default")]
    pub access_token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub access_token_secret: String,
}

/// Settings for the Slack integration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackSettings {
    /// Slack API token
    #[serde(deserialize_with = "null_as_default")]
    pub token: String,
    /// Channel to bridge
    #[serde(deserialize_with = "null_as_default")]
    pub channel_id: String,
    /// Prepended to Slack messages when rendered for SSH users
    #[serde(deserialize_with = "null_as_default")]
    pub prefix: String,
}

/// Where the primary configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// The file existed and was overlaid onto the defaults
    Loaded(PathBuf),
    /// The file was missing, so the defaults were written there
    DefaultsWritten(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Loaded(path) | ConfigSource::DefaultsWritten(path) => path,
        }
    }
}

/// Fully resolved startup configuration, read-only once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub primary: PrimaryConfig,
    pub integrations: IntegrationsConfig,
    pub source: ConfigSource,
}

// Default value functions
fn default_ssh_port() -> u16 {
    2221
}

fn default_profile_port() -> u16 {
    5555
}

fn default_data_dir() -> String {
    "./devzat-data".to_string()
}

fn default_key_file() -> String {
    "./devzat-sshkey".to_string()
}

/// A key written with no value (`key:`) is YAML null and takes the type's zero value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            ssh_port: default_ssh_port(),
            profile_port: default_profile_port(),
            data_dir: default_data_dir(),
            key_file: default_key_file(),
            integration_config: String::new(),
        }
    }
}

impl PrimaryConfig {
    /// Whether an integrations file is configured
    pub fn integrations_enabled(&self) -> bool {
        !self.integration_config.is_empty()
    }
}

impl IntegrationsConfig {
    /// Fill in defaults for optional fields of present records
    pub fn apply_defaults(&mut self) {
        if let Some(slack) = self.slack.as_mut() {
            if slack.prefix.is_empty() {
                slack.prefix = DEFAULT_SLACK_PREFIX.to_string();
            }
        }
    }

    /// Copy with every secret masked, for display
    pub fn redacted(&self) -> Self {
        Self {
            twitter: self.twitter.as_ref().map(|tw| TwitterSettings {
                consumer_key: mask_secret(&tw.consumer_key),
                consumer_secret: mask_secret(&tw.consumer_secret),
                access_token: mask_secret(&tw.access_token),
                access_token_secret: mask_secret(&tw.access_token_secret),
            }),
            slack: self.slack.as_ref().map(|sl| SlackSettings {
                token: mask_secret(&sl.token),
                channel_id: sl.channel_id.clone(),
                prefix: sl.prefix.clone(),
            }),
        }
    }
}

impl TwitterSettings {
    pub fn is_complete(&self) -> bool {
        !self.consumer_key.is_empty()
            && !self.consumer_secret.is_empty()
            && !self.access_token.is_empty()
            && !self.access_token_secret.is_empty()
    }
}

impl SlackSettings {
    pub fn is_complete(&self) -> bool {
        !self.token.is_empty() && !self.channel_id.is_empty()
    }
}

/// Mask a secret, keeping the last four characters of long values
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    } else {
        "****".to_string()
    }
}
