//! Command-line argument parsing.

use crate::config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// stalesweep - Periodically remove stale files and empty directories.
#[derive(Debug, Parser)]
#[command(name = "stalesweep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "STALESWEEP_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,

    /// Run a single sweep cycle immediately, then exit
    #[arg(long)]
    pub once: bool,

    /// Override the configured log level
    #[arg(short, long, value_parser = parse_level)]
    pub log_level: Option<LogLevel>,
}

fn parse_level(value: &str) -> Result<LogLevel, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["stalesweep"]).unwrap();
        assert!(!cli.once);
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "stalesweep",
            "--config",
            "/etc/stalesweep.toml",
            "--once",
            "--log-level",
            "WARNING",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/stalesweep.toml"));
        assert!(cli.once);
        assert_eq!(cli.log_level, Some(LogLevel::Warning));
    }

    #[test]
    fn test_rejects_unknown_level() {
        assert!(Cli::try_parse_from(["stalesweep", "--log-level", "verbose"]).is_err());
    }
}
