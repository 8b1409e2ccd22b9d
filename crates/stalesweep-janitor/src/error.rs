//! Error types for Janitor operations

use thiserror::Error;

/// Errors that can occur during Janitor operations
///
/// Filesystem failures during a sweep never surface here; they are logged
/// and the affected entry is skipped.
#[derive(Error, Debug)]
pub enum JanitorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Scheduler lifecycle call made from the wrong state
    #[error("Invalid scheduler transition: {0}")]
    InvalidTransition(String),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
