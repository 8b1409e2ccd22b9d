//! Configuration file parsing for the daemon.
//!
//! Loads the logging settings and the Janitor configuration from a TOML file.

use serde::Deserialize;
use stalesweep_janitor::{JanitorConfig, JanitorError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// Daemon configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Values rejected by the Janitor
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] JanitorError),
}

/// Log verbosity accepted in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    /// Debug
    Debug,
    /// Info
    #[default]
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Critical (logged at error level)
    Critical,
}

impl LogLevel {
    /// Equivalent tracing level filter
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            other => Err(format!(
                "unknown log level '{}' (expected debug, info, warning, error or critical)",
                other
            )),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level written to the log (default: info)
    #[serde(default)]
    pub level: LogLevel,

    /// Log file path, or "-" for stderr (default: cleanup_log.log)
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("cleanup_log.log")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            file: default_log_file(),
        }
    }
}

impl LoggingConfig {
    /// Whether logs go to stderr instead of a file
    pub fn to_stderr(&self) -> bool {
        self.file.as_os_str() == "-"
    }
}

/// Daemon configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Sweep settings
    pub janitor: JanitorConfig,
}

impl DaemonConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        contents.parse()
    }
}

impl FromStr for DaemonConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: DaemonConfig = toml::from_str(s)?;
        config.janitor.validate()?;
        Ok(config)
    }
}
