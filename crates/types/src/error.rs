//! Error types for the devzat server

use crate::exit::ExitStatus;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the devzat server
#[derive(Error, Debug)]
pub enum DevzatError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(String),
}

impl DevzatError {
    /// Exit status the process should terminate with for this error
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            DevzatError::Config(err) => err.exit_status(),
            DevzatError::Logging(_) => ExitStatus::Internal,
        }
    }
}

/// Result type alias for devzat operations
pub type Result<T> = std::result::Result<T, DevzatError>;

/// Configuration specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Filesystem failure while stating, reading or writing a config file
    #[error("Failed to {operation} {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Malformed file content
    #[error("Configuration parse error in {}: {message}", .path.display())]
    ParseError { path: PathBuf, message: String },

    /// Default configuration could not be rendered
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// Validation error
    #[error("Configuration validation error: {field}: {message}")]
    ValidationError { field: String, message: String },
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ConfigError::ParseError {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn validation(field: &str, message: &str) -> Self {
        ConfigError::ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Exit status grouped by failure category
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            ConfigError::Io { .. } => ExitStatus::Filesystem,
            ConfigError::ParseError { .. } | ConfigError::Serialize(_) => ExitStatus::Parse,
            ConfigError::ValidationError { .. } => ExitStatus::Validation,
        }
    }
}
