//! devzat - Configuration Bootstrap Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use config::{ConfigLoader, Env, IntegrationsConfig, PrimaryConfig, ResolvedConfig};
use serde::Serialize;
use std::env;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use types::{DevzatError, ExitStatus};

mod app;
mod cli;
mod integrations;

use app::Application;
use cli::{Cli, Command, OutputFormat};

fn main() -> ExitCode {
    // Load .env before logging so RUST_LOG and LOG_FORMAT can come from it
    let dotenv_result = dotenv::dotenv();

    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Command::Check);

    // `show` writes its document to stdout, so its logs go to stderr
    let log_to_stderr = matches!(command, Command::Show { .. });
    if let Err(e) = init_logging(log_to_stderr) {
        eprintln!("err: {}", e);
        return e.exit_status().into();
    }

    match dotenv_result {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Could not load .env file: {}", e),
    }

    match run(&cli, command) {
        Ok(()) => ExitStatus::Success.into(),
        Err(e) => {
            error!("{:#}", e);
            exit_status_for(&e).into()
        }
    }
}

fn run(cli: &Cli, command: Command) -> Result<()> {
    info!("Starting devzat v{}", env!("CARGO_PKG_VERSION"));

    let env = Env::real();
    let config_path = ConfigLoader::config_path(&env, cli.config.as_deref());
    let resolved = ConfigLoader::resolve(&config_path, &env)
        .context("Failed to resolve configuration")?;

    match command {
        Command::Check => {
            let app = Application::new(resolved);
            for line in app.summary() {
                info!("{}", line);
            }
        }
        Command::Show { format } => {
            println!("{}", render_show(&resolved, format)?);
        }
    }

    Ok(())
}

/// Pick the exit status from the first devzat error in the chain
fn exit_status_for(err: &anyhow::Error) -> ExitStatus {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DevzatError>())
        .map(DevzatError::exit_status)
        .unwrap_or(ExitStatus::Internal)
}

#[derive(Serialize)]
struct ShowDocument<'a> {
    source: String,
    config: &'a PrimaryConfig,
    integrations: IntegrationsConfig,
}

/// Render the resolved configuration with integration secrets masked
fn render_show(resolved: &ResolvedConfig, format: OutputFormat) -> Result<String> {
    let document = ShowDocument {
        source: resolved.source.path().display().to_string(),
        config: &resolved.primary,
        integrations: resolved.integrations.redacted(),
    };

    match format {
        OutputFormat::Yaml => serde_yaml::to_string(&document).context("Failed to render YAML"),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&document).context("Failed to render JSON")
        }
    }
}

/// Initialize logging based on environment variables
fn init_logging(to_stderr: bool) -> types::Result<()> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let writer = || {
        if to_stderr {
            BoxMakeWriter::new(std::io::stderr)
        } else {
            BoxMakeWriter::new(std::io::stdout)
        }
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(writer()))
                .try_init()
                .map_err(|e| DevzatError::Logging(format!("Failed to initialize JSON logging: {}", e)))?;
        }
        "compact" => {
            registry
                .with(tracing_subscriber::fmt::layer().compact().with_writer(writer()))
                .try_init()
                .map_err(|e| DevzatError::Logging(format!("Failed to initialize compact logging: {}", e)))?;
        }
        "pretty" | _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(writer()))
                .try_init()
                .map_err(|e| DevzatError::Logging(format!("Failed to initialize pretty logging: {}", e)))?;
        }
    }

    if log_level == "trace" || log_level == "debug" {
        warn!("Debug/trace logging enabled, integration gating decisions will be logged");
    }

    Ok(())
}
