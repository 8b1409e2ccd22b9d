//! stalesweep Janitor
//!
//! Periodic removal of stale files and directories from a set of directory
//! trees.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Staleness evaluation**: an entry is stale once its modification time is
//!   older than the configured threshold
//! - **Tree sweeping**: bottom-up deletion of stale entries with bounded retry,
//!   followed by removal of directories left empty
//! - **Scheduling**: running a sweep over every configured root on a fixed
//!   interval, with a cancellable shutdown
//! - **Metrics collection**: counting what each sweep removed or failed to remove
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```no_run
//! use stalesweep_janitor::{CleanupScheduler, JanitorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = JanitorConfig::for_roots(vec!["/tmp".into(), "/var/cache/app".into()]);
//! let scheduler = CleanupScheduler::new(config);
//!
//! let metrics = scheduler.run_once().await?;
//! println!("{}", metrics.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Scheduler
//!
//! ```no_run
//! use stalesweep_janitor::{CleanupScheduler, JanitorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = JanitorConfig::for_roots(vec!["/tmp".into()]);
//!     let mut scheduler = CleanupScheduler::new(config);
//!
//!     scheduler.start()?;
//!     tokio::signal::ctrl_c().await?;
//!     scheduler.stop().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! [janitor]
//! threshold_minutes = 180
//! sweep_interval_minutes = 60
//! max_delete_attempts = 3
//! retry_backoff_secs = 5
//! directory_policy = "remove_subtree"
//! roots = ["/tmp"]
//! ```
//!
//! A stale directory is removed with its whole subtree, even when fresh
//! files remain inside it. Set `directory_policy = "keep_fresh_descendants"`
//! to leave such directories in place instead.

#![warn(missing_docs)]

mod config;
mod error;
pub mod fs;
mod metrics;
mod scheduler;
pub mod staleness;
mod sweeper;

pub use config::{DirectoryPolicy, JanitorConfig};
pub use error::JanitorError;
pub use fs::{FileSystem, LocalFs};
pub use metrics::SweepMetrics;
pub use scheduler::{CleanupScheduler, SchedulerState};
pub use staleness::is_stale;
pub use sweeper::TreeSweeper;
