//! Process-level plumbing shared by the server binary: layered configuration,
//! logging setup and shutdown signals.

pub mod config;
pub mod logging;
pub mod shutdown;

pub use config::{AppConfig, CliArgs, DatabaseConfig, LoggingConfig, ServerConfig};
