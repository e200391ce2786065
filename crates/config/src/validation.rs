//! Configuration validation utilities

use crate::schema::{IntegrationsConfig, PrimaryConfig};
use types::ConfigError;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Check the primary configuration for suspicious values.
    ///
    /// The primary config is always usable, so everything found here is a warning.
    pub fn validate_primary(config: &PrimaryConfig) -> ValidationReport {
        let mut report = ValidationReport::new();

        Self::validate_port("ssh_port", config.ssh_port, &mut report);
        Self::validate_port("profile_port", config.profile_port, &mut report);

        if config.ssh_port != 0 && config.ssh_port == config.profile_port {
            report.add_warning("ports", "SSH port and profile port are the same");
        }

        if config.data_dir.is_empty() {
            report.add_warning("data_dir", "Data directory is empty, the working directory will be used");
        }

        if config.key_file.is_empty() {
            report.add_warning("key_file", "Key file path is empty");
        }

        report
    }

    fn validate_port(field: &str, port: u16, report: &mut ValidationReport) {
        if port == 0 {
            report.add_warning(field, "Port is 0, the OS will pick a random port");
        } else if port < 1024 {
            report.add_warning(field, &format!("Port {} is below 1024, may require elevated privileges", port));
        }
    }

    /// Reject integration records that are present but incomplete.
    ///
    /// Omitted records are disabled integrations and pass.
    pub fn validate_integrations(integrations: &IntegrationsConfig) -> Result<(), ConfigError> {
        if let Some(slack) = &integrations.slack {
            if !slack.is_complete() {
                return Err(ConfigError::validation("slack", "Slack token or Channel ID is missing"));
            }
        }

        if let Some(twitter) = &integrations.twitter {
            if !twitter.is_complete() {
                return Err(ConfigError::validation("twitter", "Twitter credentials are incomplete"));
            }
        }

        Ok(())
    }
}

/// Non-fatal findings about a configuration
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub warnings: Vec<ValidationIssue>,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn summary(&self) -> String {
        format!("Validation: {} warnings", self.warnings.len())
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
