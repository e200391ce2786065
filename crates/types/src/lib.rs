//! Shared types for the devzat server
//!
//! This crate holds the error taxonomy and process exit codes shared by the
//! configuration resolver and the server binary.

pub mod error;
pub mod exit;

// Re-export commonly used types
pub use error::{ConfigError, DevzatError, Result};
pub use exit::ExitStatus;
