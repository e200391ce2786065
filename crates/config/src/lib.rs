//! Configuration management for the devzat server
//!
//! This crate resolves the primary configuration from a YAML file (writing
//! the defaults out when the file is missing), then loads the optional
//! integrations file and gates each integration on environment flags.

pub mod env;
pub mod gating;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::Env;
pub use gating::EnvGates;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validation::*;
