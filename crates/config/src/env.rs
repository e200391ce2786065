//! Environment variable lookups
//!
//! Production code reads the process environment through [`Env::real()`].
//! Tests build an [`Env`] from explicit pairs so they never touch the
//! process-wide environment.

use std::collections::HashMap;

/// Primary config file path override
pub const CONFIG_PATH_VAR: &str = "DEVZAT_CONFIG";
/// Opts the Slack integration in
pub const SLACK_FLAG_VAR: &str = "DEVZAT_OFFLINE_SLACK";
/// Opts the Twitter integration in
pub const TWITTER_FLAG_VAR: &str = "DEVZAT_OFFLINE_TWITTER";
/// Legacy global flag; when unset every integration is disabled
pub const OFFLINE_FLAG_VAR: &str = "DEVZAT_OFFLINE";

/// Environment variable reader
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Read from the real process environment
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Back lookups with explicit key-value pairs
    pub fn from_pairs(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Value of `name`, treating an empty value as unset
    pub fn var(&self, name: &str) -> Option<String> {
        let value = match &self.overrides {
            Some(map) => map.get(name).cloned(),
            None => std::env::var(name).ok(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Returns `true` if the variable holds a non-empty value
    pub fn is_set(&self, name: &str) -> bool {
        self.var(name).is_some()
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}
