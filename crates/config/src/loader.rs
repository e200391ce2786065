//! Configuration loader implementation

use crate::env::{Env, CONFIG_PATH_VAR};
use crate::gating::EnvGates;
use crate::schema::{ConfigSource, IntegrationsConfig, PrimaryConfig, ResolvedConfig};
use crate::validation::ConfigValidator;
use figment::{
    providers::{Format, Serialized, Yaml},
    Figment,
};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use types::{ConfigError, Result};

/// Config file used when `DEVZAT_CONFIG` is not set
pub const DEFAULT_CONFIG_FILE: &str = "devzat-config.yml";

/// Resolves the primary and integrations configuration at startup
pub struct ConfigLoader;

impl ConfigLoader {
    /// Primary config path: explicit override, then `DEVZAT_CONFIG`, then the default file
    pub fn config_path(env: &Env, override_path: Option<&Path>) -> PathBuf {
        match override_path {
            Some(path) => path.to_path_buf(),
            None => env
                .var(CONFIG_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        }
    }

    /// Resolve the configuration for the path named by the environment
    pub fn resolve_from_env(env: &Env) -> Result<ResolvedConfig> {
        let path = Self::config_path(env, None);
        Self::resolve(&path, env)
    }

    /// Run the whole resolution pipeline against `config_path`.
    ///
    /// A missing file gets the defaults written to it and the defaults are
    /// returned as-is, without reading the file back or loading integrations.
    pub fn resolve(config_path: &Path, env: &Env) -> Result<ResolvedConfig> {
        match fs::metadata(config_path) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "Config file not found, so writing the default one to {}",
                    config_path.display()
                );
                Self::write_default(config_path)?;
                return Ok(ResolvedConfig {
                    primary: PrimaryConfig::default(),
                    integrations: IntegrationsConfig::default(),
                    source: ConfigSource::DefaultsWritten(config_path.to_path_buf()),
                });
            }
            Err(e) => return Err(ConfigError::io(config_path, "access", e).into()),
        }

        let primary = Self::load_primary(config_path)?;
        info!("Config loaded from {}", config_path.display());

        let report = ConfigValidator::validate_primary(&primary);
        if report.has_warnings() {
            warn!("{}", report.summary());
            for issue in &report.warnings {
                warn!("Config warning: {}: {}", issue.field, issue.message);
            }
        }

        let integrations = if primary.integrations_enabled() {
            let integration_path = Path::new(&primary.integration_config);
            let integrations = Self::load_integrations(integration_path)?;
            info!("Integration config loaded from {}", integration_path.display());
            EnvGates::from_env(env).apply(integrations)
        } else {
            IntegrationsConfig::default()
        };

        Ok(ResolvedConfig {
            primary,
            integrations,
            source: ConfigSource::Loaded(config_path.to_path_buf()),
        })
    }

    /// Read the primary config file and overlay it onto the defaults
    pub fn load_primary(path: &Path) -> Result<PrimaryConfig> {
        let contents = read_file(path)?;
        Self::load_primary_from_str(&contents).map_err(|e| ConfigError::parse(path, e).into())
    }

    /// Overlay YAML onto the default primary configuration.
    ///
    /// Keys present in the YAML replace defaults; missing keys keep them.
    pub fn load_primary_from_str(yaml_content: &str) -> std::result::Result<PrimaryConfig, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(PrimaryConfig::default()));
        if !is_null_document(yaml_content) {
            figment = figment.merge(Yaml::string(yaml_content));
        }
        figment.extract()
    }

    /// Read, default, and validate the integrations file.
    ///
    /// Environment gating is not applied here.
    pub fn load_integrations(path: &Path) -> Result<IntegrationsConfig> {
        let contents = read_file(path)?;
        let mut integrations =
            Self::load_integrations_from_str(&contents).map_err(|e| ConfigError::parse(path, e))?;

        integrations.apply_defaults();
        ConfigValidator::validate_integrations(&integrations)?;

        Ok(integrations)
    }

    /// Parse integrations YAML. Omitted sections stay `None`.
    pub fn load_integrations_from_str(
        yaml_content: &str,
    ) -> std::result::Result<IntegrationsConfig, figment::Error> {
        let mut figment = Figment::new();
        if !is_null_document(yaml_content) {
            figment = figment.merge(Yaml::string(yaml_content));
        }
        figment.extract()
    }

    /// Render the default primary configuration as YAML
    pub fn default_yaml() -> Result<String> {
        serde_yaml::to_string(&PrimaryConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()).into())
    }

    /// Write the default primary configuration to `path`
    pub fn write_default(path: &Path) -> Result<()> {
        let yaml_content = Self::default_yaml()?;
        fs::write(path, yaml_content).map_err(|e| ConfigError::io(path, "write", e))?;
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ConfigError::io(path, "read", e).into())
}

/// Whether the YAML is empty, comments only, or a bare null (`~`, `null`).
///
/// Such documents overlay nothing. Anything that fails to parse is left for
/// figment to report.
fn is_null_document(yaml_content: &str) -> bool {
    let has_content = yaml_content.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#') && line != "---"
    });

    !has_content
        || matches!(
            serde_yaml::from_str::<serde_yaml::Value>(yaml_content),
            Ok(serde_yaml::Value::Null)
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{OFFLINE_FLAG_VAR, SLACK_FLAG_VAR, TWITTER_FLAG_VAR};
    use tempfile::TempDir;
    use types::{DevzatError, ExitStatus};

    const FULL_INTEGRATIONS: &str = r#"
twitter:
  consumer_key: "ck"
  consumer_secret: "cs"
  access_token: "at"
  access_token_secret: "ats"
slack:
  token: "xoxb-token"
  channel_id: "C0123"
"#;

    fn no_env() -> Env {
        Env::from_pairs(Vec::<(String, String)>::new())
    }

    /// Write a primary config pointing at an integrations file with `integrations` content
    fn write_pair(dir: &TempDir, integrations: &str) -> PathBuf {
        let integration_path = dir.path().join("integrations.yml");
        fs::write(&integration_path, integrations).unwrap();

        let config_path = dir.path().join("devzat-config.yml");
        fs::write(
            &config_path,
            format!("integration_config: {}\n", integration_path.display()),
        )
        .unwrap();
        config_path
    }

    fn exit_status(err: &DevzatError) -> ExitStatus {
        err.exit_status()
    }

    #[test]
    fn test_config_path_precedence() {
        let env = Env::from_pairs([(CONFIG_PATH_VAR, "from-env.yml")]);
        assert_eq!(ConfigLoader::config_path(&env, None), PathBuf::from("from-env.yml"));
        assert_eq!(
            ConfigLoader::config_path(&env, Some(Path::new("from-cli.yml"))),
            PathBuf::from("from-cli.yml")
        );
        assert_eq!(
            ConfigLoader::config_path(&no_env(), None),
            PathBuf::from(DEFAULT_CONFIG_FILE)
        );
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("devzat-config.yml");

        let resolved = ConfigLoader::resolve(&path, &no_env()).unwrap();

        assert_eq!(resolved.primary, PrimaryConfig::default());
        assert_eq!(resolved.integrations, IntegrationsConfig::default());
        assert_eq!(resolved.source, ConfigSource::DefaultsWritten(path.clone()));
        assert!(path.exists());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("ssh_port: 2221"));
        assert!(written.contains("profile_port: 5555"));
    }

    #[test]
    fn test_resolve_from_env_uses_config_var() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.yml");
        let env = Env::from_pairs([(CONFIG_PATH_VAR, path.display().to_string())]);

        let resolved = ConfigLoader::resolve_from_env(&env).unwrap();

        assert_eq!(resolved.source, ConfigSource::DefaultsWritten(path.clone()));
        assert!(path.exists());
    }

    #[test]
    fn test_default_round_trip() {
        let yaml = ConfigLoader::default_yaml().unwrap();
        let parsed = ConfigLoader::load_primary_from_str(&yaml).unwrap();
        assert_eq!(parsed, PrimaryConfig::default());

        let direct: PrimaryConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(direct, PrimaryConfig::default());
    }

    #[test]
    fn test_written_defaults_load_back_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("devzat-config.yml");

        let first = ConfigLoader::resolve(&path, &no_env()).unwrap();
        let second = ConfigLoader::resolve(&path, &no_env()).unwrap();

        assert_eq!(first.primary, second.primary);
        assert_eq!(second.source, ConfigSource::Loaded(path));
    }

    #[test]
    fn test_overlay_keeps_unset_defaults() {
        let config = ConfigLoader::load_primary_from_str("ssh_port: 2022\n").unwrap();
        assert_eq!(config.ssh_port, 2022);
        assert_eq!(
            config,
            PrimaryConfig {
                ssh_port: 2022,
                ..PrimaryConfig::default()
            }
        );
    }

    #[test]
    fn test_overlay_ignores_unknown_keys() {
        let config = ConfigLoader::load_primary_from_str("data_dir: /srv/devzat\nmotd: hi\n").unwrap();
        assert_eq!(config.data_dir, "/srv/devzat");
        assert_eq!(config.ssh_port, 2221);
    }

    #[test]
    fn test_empty_and_comment_only_files_keep_defaults() {
        assert_eq!(ConfigLoader::load_primary_from_str("").unwrap(), PrimaryConfig::default());
        assert_eq!(
            ConfigLoader::load_primary_from_str("# nothing here\n\n---\n").unwrap(),
            PrimaryConfig::default()
        );
    }

    #[test]
    fn test_null_document_keeps_defaults() {
        for yaml in ["~\n", "null\n", "---\n~\n"] {
            assert_eq!(ConfigLoader::load_primary_from_str(yaml).unwrap(), PrimaryConfig::default());
            assert_eq!(
                ConfigLoader::load_integrations_from_str(yaml).unwrap(),
                IntegrationsConfig::default()
            );
        }
    }

    #[test]
    fn test_blank_integration_config_leaves_integrations_off() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("devzat-config.yml");
        fs::write(&path, "ssh_port: 2022\nintegration_config:\n").unwrap();

        let resolved = ConfigLoader::resolve(&path, &no_env()).unwrap();

        assert_eq!(
            resolved.primary,
            PrimaryConfig {
                ssh_port: 2022,
                ..PrimaryConfig::default()
            }
        );
        assert!(!resolved.primary.integrations_enabled());
        assert_eq!(resolved.integrations, IntegrationsConfig::default());
    }

    #[test]
    fn test_unwritable_default_path_is_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("devzat-config.yml");

        let err = ConfigLoader::resolve(&path, &no_env()).unwrap_err();

        assert_eq!(exit_status(&err), ExitStatus::Filesystem);
        assert!(err.to_string().contains("Failed to write"));
        assert!(!path.exists());
        assert!(!dir.path().join("nope").exists());
    }

    #[test]
    fn test_malformed_primary_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("devzat-config.yml");
        fs::write(&path, "ssh_port: [not, a, port\n").unwrap();

        let err = ConfigLoader::resolve(&path, &no_env()).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::Parse);
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        assert!(ConfigLoader::load_primary_from_str("ssh_port: lots\n").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_path_is_filesystem_error() {
        let dir = TempDir::new().unwrap();
        // Stat'ing a path below a regular file fails with ENOTDIR
        let file = dir.path().join("plain");
        fs::write(&file, "x").unwrap();
        let path = file.join("devzat-config.yml");

        let err = ConfigLoader::resolve(&path, &no_env()).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::Filesystem);
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_integration_file_is_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("devzat-config.yml");
        fs::write(&path, "integration_config: /nonexistent/devzat-integrations.yml\n").unwrap();

        let err = ConfigLoader::resolve(&path, &no_env()).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::Filesystem);
    }

    #[test]
    fn test_global_flag_unset_disables_everything() {
        let dir = TempDir::new().unwrap();
        let path = write_pair(&dir, FULL_INTEGRATIONS);

        let resolved = ConfigLoader::resolve(&path, &no_env()).unwrap();

        assert!(resolved.primary.integrations_enabled());
        assert!(resolved.integrations.slack.is_none());
        assert!(resolved.integrations.twitter.is_none());
    }

    #[test]
    fn test_specific_flags_without_global_flag_disable_everything() {
        let dir = TempDir::new().unwrap();
        let path = write_pair(&dir, FULL_INTEGRATIONS);
        let env = Env::from_pairs([(SLACK_FLAG_VAR, "1"), (TWITTER_FLAG_VAR, "1")]);

        let resolved = ConfigLoader::resolve(&path, &env).unwrap();

        assert_eq!(resolved.integrations, IntegrationsConfig::default());
    }

    #[test]
    fn test_global_and_slack_flags_enable_only_slack() {
        let dir = TempDir::new().unwrap();
        let path = write_pair(&dir, FULL_INTEGRATIONS);
        let env = Env::from_pairs([(OFFLINE_FLAG_VAR, "1"), (SLACK_FLAG_VAR, "1")]);

        let resolved = ConfigLoader::resolve(&path, &env).unwrap();

        let slack = resolved.integrations.slack.expect("slack enabled");
        assert_eq!(slack.token, "xoxb-token");
        assert_eq!(slack.channel_id, "C0123");
        assert_eq!(slack.prefix, "Slack");
        assert!(resolved.integrations.twitter.is_none());
    }

    #[test]
    fn test_all_flags_enable_both() {
        let dir = TempDir::new().unwrap();
        let path = write_pair(&dir, FULL_INTEGRATIONS);
        let env = Env::from_pairs([
            (OFFLINE_FLAG_VAR, "1"),
            (SLACK_FLAG_VAR, "1"),
            (TWITTER_FLAG_VAR, "1"),
        ]);

        let resolved = ConfigLoader::resolve(&path, &env).unwrap();

        assert!(resolved.integrations.slack.is_some());
        assert_eq!(resolved.integrations.twitter.unwrap().access_token, "at");
    }

    #[test]
    fn test_incomplete_twitter_fails_regardless_of_env() {
        let dir = TempDir::new().unwrap();
        let path = write_pair(
            &dir,
            r#"
twitter:
  consumer_key: "ck"
  consumer_secret: "cs"
  access_token: "at"
  access_token_secret: ""
"#,
        );

        for env in [
            no_env(),
            Env::from_pairs([(OFFLINE_FLAG_VAR, "1"), (TWITTER_FLAG_VAR, "1")]),
        ] {
            let err = ConfigLoader::resolve(&path, &env).unwrap_err();
            assert_eq!(exit_status(&err), ExitStatus::Validation);
            assert!(err.to_string().contains("Twitter credentials are incomplete"));
        }
    }

    #[test]
    fn test_blank_twitter_credential_is_validation_error() {
        let dir = TempDir::new().unwrap();
        let path = write_pair(
            &dir,
            "twitter:\n  consumer_key: ck\n  consumer_secret: cs\n  access_token: at\n  access_token_secret:\n",
        );

        let err = ConfigLoader::resolve(&path, &no_env()).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::Validation);
        assert!(err.to_string().contains("Twitter credentials are incomplete"));
    }

    #[test]
    fn test_blank_slack_token_is_validation_error() {
        let dir = TempDir::new().unwrap();
        let path = write_pair(&dir, "slack:\n  token:\n  channel_id: C1\n  prefix:\n");

        let err = ConfigLoader::resolve(&path, &no_env()).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::Validation);
        assert!(err.to_string().contains("Slack token or Channel ID is missing"));
    }

    #[test]
    fn test_slack_without_channel_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_pair(&dir, "slack:\n  token: xoxb\n");

        let err = ConfigLoader::resolve(&path, &no_env()).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::Validation);
        assert!(err.to_string().contains("Slack token or Channel ID is missing"));
    }

    #[test]
    fn test_omitted_sections_are_disabled_not_errors() {
        let dir = TempDir::new().unwrap();
        let path = write_pair(&dir, "slack:\n  token: xoxb\n  channel_id: C9\n  prefix: Bridge\n");
        let env = Env::from_pairs([
            (OFFLINE_FLAG_VAR, "1"),
            (SLACK_FLAG_VAR, "1"),
            (TWITTER_FLAG_VAR, "1"),
        ]);

        let resolved = ConfigLoader::resolve(&path, &env).unwrap();

        assert_eq!(resolved.integrations.slack.unwrap().prefix, "Bridge");
        assert!(resolved.integrations.twitter.is_none());
    }

    #[test]
    fn test_empty_integrations_file_enables_nothing() {
        let integrations = ConfigLoader::load_integrations_from_str("").unwrap();
        assert_eq!(integrations, IntegrationsConfig::default());

        let integrations = ConfigLoader::load_integrations_from_str("slack:\ntwitter:\n").unwrap();
        assert_eq!(integrations, IntegrationsConfig::default());
    }

    #[test]
    fn test_malformed_integrations_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_pair(&dir, "slack: [unterminated\n");

        let err = ConfigLoader::resolve(&path, &no_env()).unwrap_err();
        assert_eq!(exit_status(&err), ExitStatus::Parse);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write_pair(&dir, FULL_INTEGRATIONS);
        let env = Env::from_pairs([(OFFLINE_FLAG_VAR, "1"), (TWITTER_FLAG_VAR, "1")]);

        let first = ConfigLoader::resolve(&path, &env).unwrap();
        let second = ConfigLoader::resolve(&path, &env).unwrap();

        assert_eq!(first, second);
    }
}
