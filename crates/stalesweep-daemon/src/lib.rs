//! stalesweep daemon library.
//!
//! Configuration loading, logging setup, signal wiring and the command-line
//! interface around the Janitor's cleanup scheduler.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod logging;
pub mod signal;

pub use cli::Cli;
pub use config::{ConfigError, DaemonConfig, LogLevel, LoggingConfig};
