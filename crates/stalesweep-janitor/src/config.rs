//! Configuration for Janitor operations
//!
//! Defines the staleness threshold, the roots to sweep, the sweep interval
//! and the deletion retry policy.

use crate::JanitorError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// How a stale directory is treated once its children have been processed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryPolicy {
    /// Remove the whole subtree of a stale directory, including any fresh
    /// descendants still inside it
    #[default]
    RemoveSubtree,

    /// Leave a stale directory alone while it still contains entries
    KeepFreshDescendants,
}

/// Configuration for the Janitor service
///
/// Built once at startup and shared read-only by the scheduler and the
/// sweeper for the lifetime of the process.
///
/// # Examples
///
/// ```
/// use stalesweep_janitor::JanitorConfig;
/// use std::time::Duration;
///
/// let config = JanitorConfig::for_roots(vec!["/tmp".into()]);
/// assert_eq!(config.threshold_minutes, 180);
/// assert_eq!(config.sweep_interval(), Duration::from_secs(3600));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Minimum idle time (in minutes) before an entry may be deleted
    /// Default: 180 minutes
    #[serde(default = "default_threshold_minutes")]
    pub threshold_minutes: u64,

    /// Directory trees to sweep, in sweep order
    pub roots: Vec<PathBuf>,

    /// How often to run the sweep cycle (in minutes)
    /// Default: Every 60 minutes (hourly)
    #[serde(default = "default_sweep_interval_minutes")]
    pub sweep_interval_minutes: u64,

    /// Attempts made to delete a single stale entry before abandoning it
    /// Default: 3
    #[serde(default = "default_max_delete_attempts")]
    pub max_delete_attempts: u32,

    /// Wait between failed deletion attempts (in seconds)
    /// Default: 5
    #[serde(default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,

    /// Treatment of stale directories that still hold fresh entries
    #[serde(default)]
    pub directory_policy: DirectoryPolicy,
}

/// Longest accepted sweep interval: one year
const MAX_SWEEP_INTERVAL_MINUTES: u64 = 366 * 24 * 60;

fn default_threshold_minutes() -> u64 {
    180
}

fn default_sweep_interval_minutes() -> u64 {
    60
}

fn default_max_delete_attempts() -> u32 {
    3
}

fn default_retry_backoff_secs() -> u64 {
    5
}

impl JanitorConfig {
    /// Default configuration sweeping the given roots
    ///
    /// - Threshold: 180 minutes
    /// - Sweep interval: 60 minutes
    /// - Deletion: 3 attempts, 5 seconds apart
    /// - Stale directories removed with their whole subtree
    pub fn for_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            threshold_minutes: default_threshold_minutes(),
            roots,
            sweep_interval_minutes: default_sweep_interval_minutes(),
            max_delete_attempts: default_max_delete_attempts(),
            retry_backoff_secs: default_retry_backoff_secs(),
            directory_policy: DirectoryPolicy::default(),
        }
    }

    /// Check the values the scheduler and sweeper cannot work with
    pub fn validate(&self) -> Result<(), JanitorError> {
        if self.roots.is_empty() {
            return Err(JanitorError::Config(
                "at least one root path must be configured".to_string(),
            ));
        }
        if self.threshold_minutes.checked_mul(60).is_none() {
            return Err(JanitorError::Config(format!(
                "threshold_minutes {} is too large",
                self.threshold_minutes
            )));
        }
        if self.sweep_interval_minutes == 0 {
            return Err(JanitorError::Config(
                "sweep_interval_minutes must be greater than zero".to_string(),
            ));
        }
        if self.sweep_interval_minutes > MAX_SWEEP_INTERVAL_MINUTES {
            return Err(JanitorError::Config(format!(
                "sweep_interval_minutes must not exceed {}",
                MAX_SWEEP_INTERVAL_MINUTES
            )));
        }
        if self.max_delete_attempts == 0 {
            return Err(JanitorError::Config(
                "max_delete_attempts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get staleness threshold as Duration
    pub fn threshold(&self) -> Duration {
        Duration::from_secs(self.threshold_minutes.saturating_mul(60))
    }

    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes.saturating_mul(60))
    }

    /// Get retry backoff as Duration
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_secs(self.retry_backoff_secs)
    }
}
