//! Background scheduler that runs sweep cycles on a fixed interval

use crate::fs::{FileSystem, LocalFs};
use crate::{JanitorConfig, JanitorError, SweepMetrics, TreeSweeper};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

/// Lifecycle state of the recurring sweep job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Constructed, not yet started
    Created,
    /// Sweep cycles are being triggered
    Running,
    /// Shut down; no further cycles will run
    Stopped,
}

/// The recurring unit of work: one sweep over every configured root
struct SweepJob<F> {
    config: Arc<JanitorConfig>,
    sweeper: TreeSweeper<F>,
    metrics: watch::Sender<SweepMetrics>,
}

impl<F: FileSystem + 'static> SweepJob<F> {
    /// Sweep every root in configured order, one after another
    async fn run_sweep_cycle(&self, cancel: &CancellationToken) -> SweepMetrics {
        let cycle_id = Uuid::now_v7();
        let span = tracing::info_span!("sweep_cycle", %cycle_id);

        async {
            let start = Instant::now();
            let mut cycle = SweepMetrics::new();

            for root in &self.config.roots {
                if cancel.is_cancelled() {
                    break;
                }
                let swept = self.sweeper.sweep(root, cancel).await;
                tracing::debug!(
                    root = %root.display(),
                    removed = swept.total_removed(),
                    failed_attempts = swept.failed_attempts,
                    "Root swept"
                );
                cycle.merge(&swept);
            }
            cycle.total_runtime_secs = start.elapsed().as_secs();

            if cancel.is_cancelled() {
                tracing::info!("Sweep cycle interrupted by shutdown");
            } else {
                cycle.record_sweep();
                tracing::info!(
                    "Sweep completed: {} files, {} directories, {} empty directories removed, {} failed attempts",
                    cycle.files_deleted,
                    cycle.dirs_deleted,
                    cycle.empty_dirs_removed,
                    cycle.failed_attempts
                );
            }

            self.metrics.send_modify(|total| total.merge(&cycle));
            cycle
        }
        .instrument(span)
        .await
    }
}

/// Scheduler that runs the sweep job at a fixed interval
///
/// The first cycle fires one interval after [`start`](Self::start). Cycles
/// run inline in a single background task, so they never overlap; a tick
/// that comes due while a cycle is still running is skipped.
///
/// # Examples
///
/// ```no_run
/// use stalesweep_janitor::{CleanupScheduler, JanitorConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = JanitorConfig::for_roots(vec!["/tmp".into()]);
///     let mut scheduler = CleanupScheduler::new(config);
///
///     scheduler.start()?;
///     tokio::signal::ctrl_c().await?;
///     scheduler.stop().await?;
///     Ok(())
/// }
/// ```
pub struct CleanupScheduler<F = LocalFs> {
    job: Arc<SweepJob<F>>,
    state: SchedulerState,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl CleanupScheduler<LocalFs> {
    /// Create a scheduler sweeping the local filesystem
    pub fn new(config: JanitorConfig) -> Self {
        let sweeper = TreeSweeper::new(&config);
        Self::with_sweeper(config, sweeper)
    }
}

impl<F: FileSystem + 'static> CleanupScheduler<F> {
    /// Create a scheduler around an existing sweeper
    pub fn with_sweeper(config: JanitorConfig, sweeper: TreeSweeper<F>) -> Self {
        let (metrics, _) = watch::channel(SweepMetrics::new());
        Self {
            job: Arc::new(SweepJob {
                config: Arc::new(config),
                sweeper,
                metrics,
            }),
            state: SchedulerState::Created,
            cancel: CancellationToken::new(),
            handle: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Shared read-only configuration
    pub fn config(&self) -> &Arc<JanitorConfig> {
        &self.job.config
    }

    /// Snapshot of the metrics accumulated over every cycle so far
    pub fn metrics(&self) -> SweepMetrics {
        self.job.metrics.borrow().clone()
    }

    /// Watch cumulative metrics; the value changes after every cycle
    pub fn subscribe(&self) -> watch::Receiver<SweepMetrics> {
        self.job.metrics.subscribe()
    }

    /// Start triggering sweep cycles
    ///
    /// Must be called from within a tokio runtime. Only valid once, from
    /// [`SchedulerState::Created`], and only with a configuration that
    /// passes [`JanitorConfig::validate`].
    pub fn start(&mut self) -> Result<(), JanitorError> {
        if self.state != SchedulerState::Created {
            return Err(JanitorError::InvalidTransition(format!(
                "cannot start scheduler in {:?} state",
                self.state
            )));
        }
        self.job.config.validate()?;

        let period = self.job.config.sweep_interval();
        let first_tick = Instant::now().checked_add(period).ok_or_else(|| {
            JanitorError::Config(format!("sweep interval {:?} is out of range", period))
        })?;
        let mut ticker = interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let job = Arc::clone(&self.job);
        let cancel = self.cancel.clone();
        self.handle = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        job.run_sweep_cycle(&cancel).await;
                    }
                }
            }
            tracing::debug!("Sweep job exited");
        }));
        self.state = SchedulerState::Running;

        tracing::info!(
            roots = self.job.config.roots.len(),
            threshold_minutes = self.job.config.threshold_minutes,
            "Cleanup scheduler started (interval: {:?})",
            period
        );
        Ok(())
    }

    /// Stop the scheduler
    ///
    /// No cycle starts after this call. A cycle in flight stops at its next
    /// entry boundary or retry backoff, and the background task is awaited.
    /// Stopping an already stopped scheduler is a no-op.
    pub async fn stop(&mut self) -> Result<(), JanitorError> {
        match self.state {
            SchedulerState::Created => Err(JanitorError::InvalidTransition(
                "cannot stop a scheduler that was never started".to_string(),
            )),
            SchedulerState::Stopped => {
                tracing::debug!("Cleanup scheduler already stopped");
                Ok(())
            }
            SchedulerState::Running => {
                tracing::info!("Shutdown requested, stopping cleanup scheduler");
                self.cancel.cancel();
                self.state = SchedulerState::Stopped;

                if let Some(handle) = self.handle.take() {
                    if let Err(e) = handle.await {
                        tracing::error!("Sweep job did not shut down cleanly: {}", e);
                        return Err(JanitorError::Worker(e.to_string()));
                    }
                }

                tracing::info!(
                    "Cleanup scheduler shut down. Final metrics:\n{}",
                    self.metrics().summary()
                );
                Ok(())
            }
        }
    }

    /// Run a single sweep cycle immediately, without scheduling
    ///
    /// Only valid in [`SchedulerState::Created`]; a running scheduler owns
    /// its cycles and never overlaps them.
    pub async fn run_once(&self) -> Result<SweepMetrics, JanitorError> {
        if self.state != SchedulerState::Created {
            return Err(JanitorError::InvalidTransition(format!(
                "cannot run a single sweep in {:?} state",
                self.state
            )));
        }
        Ok(self.job.run_sweep_cycle(&self.cancel).await)
    }
}

impl<F> Drop for CleanupScheduler<F> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn stale_file(root: &Path, name: &str) -> PathBuf {
        let path = root.join(name);
        fs::write(&path, b"stale").unwrap();
        let then = FileTime::from_unix_time(FileTime::now().unix_seconds() - 4 * 3600, 0);
        filetime::set_file_mtime(&path, then).unwrap();
        path
    }

    fn config_for(roots: &[&Path]) -> JanitorConfig {
        JanitorConfig::for_roots(roots.iter().map(|root| root.to_path_buf()).collect())
    }

    #[tokio::test]
    async fn test_scheduler_creation() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = CleanupScheduler::new(config_for(&[dir.path()]));

        assert_eq!(scheduler.state(), SchedulerState::Created);
        assert_eq!(scheduler.metrics().sweep_count, 0);
        assert_eq!(scheduler.config().roots, vec![dir.path().to_path_buf()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_first_interval_prevents_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let file = stale_file(dir.path(), "old.log");
        let mut scheduler = CleanupScheduler::new(config_for(&[dir.path()]));

        scheduler.start().unwrap();
        scheduler.stop().await.unwrap();
        tokio::time::sleep(Duration::from_secs(3 * 3600)).await;

        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(scheduler.metrics().sweep_count, 0);
        assert!(file.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_cycle_fires_after_one_interval() {
        let dir = tempfile::tempdir().unwrap();
        let file = stale_file(dir.path(), "old.log");
        let mut scheduler = CleanupScheduler::new(config_for(&[dir.path()]));
        let mut updates = scheduler.subscribe();

        scheduler.start().unwrap();
        tokio::time::sleep(Duration::from_secs(3600 - 1)).await;
        assert_eq!(scheduler.metrics().sweep_count, 0);
        assert!(file.exists());

        updates.changed().await.unwrap();
        assert_eq!(updates.borrow().sweep_count, 1);
        assert_eq!(updates.borrow().files_deleted, 1);
        assert!(!file.exists());

        scheduler.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycles_repeat_every_interval() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = CleanupScheduler::new(config_for(&[dir.path()]));
        let mut updates = scheduler.subscribe();

        scheduler.start().unwrap();
        updates.changed().await.unwrap();
        updates.changed().await.unwrap();

        assert_eq!(updates.borrow().sweep_count, 2);
        scheduler.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_twice_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = CleanupScheduler::new(config_for(&[dir.path()]));

        scheduler.start().unwrap();
        scheduler.stop().await.unwrap();
        assert!(scheduler.stop().await.is_ok());
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
    }

    #[tokio::test]
    async fn test_invalid_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = CleanupScheduler::new(config_for(&[dir.path()]));

        assert!(matches!(
            scheduler.stop().await,
            Err(JanitorError::InvalidTransition(_))
        ));

        scheduler.start().unwrap();
        assert!(matches!(
            scheduler.start(),
            Err(JanitorError::InvalidTransition(_))
        ));

        scheduler.stop().await.unwrap();
        assert!(matches!(
            scheduler.start(),
            Err(JanitorError::InvalidTransition(_))
        ));
        assert!(scheduler.run_once().await.is_err());
    }

    #[tokio::test]
    async fn test_run_once_rejected_while_running() {
        let dir = tempfile::tempdir().unwrap();
        let file = stale_file(dir.path(), "old.log");
        let mut scheduler = CleanupScheduler::new(config_for(&[dir.path()]));

        scheduler.start().unwrap();
        assert!(matches!(
            scheduler.run_once().await,
            Err(JanitorError::InvalidTransition(_))
        ));
        assert!(file.exists());
        assert_eq!(scheduler.metrics().sweep_count, 0);

        scheduler.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_start_rejects_out_of_range_interval() {
        let dir = tempfile::tempdir().unwrap();
        let config = JanitorConfig {
            sweep_interval_minutes: u64::MAX,
            ..config_for(&[dir.path()])
        };
        let mut scheduler = CleanupScheduler::new(config);

        assert!(matches!(scheduler.start(), Err(JanitorError::Config(_))));
        assert_eq!(scheduler.state(), SchedulerState::Created);

        let config = JanitorConfig {
            threshold_minutes: u64::MAX,
            ..config_for(&[dir.path()])
        };
        let mut scheduler = CleanupScheduler::new(config);
        assert!(matches!(scheduler.start(), Err(JanitorError::Config(_))));
    }

    #[tokio::test]
    async fn test_run_once_sweeps_every_root() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let a = stale_file(first.path(), "a.log");
        let b = stale_file(second.path(), "b.log");
        let missing = first.path().join("does-not-exist");

        let scheduler = CleanupScheduler::new(config_for(&[
            first.path(),
            missing.as_path(),
            second.path(),
        ]));

        let cycle = scheduler.run_once().await.unwrap();

        assert!(!a.exists());
        assert!(!b.exists());
        assert_eq!(cycle.files_deleted, 2);
        assert_eq!(cycle.skipped, 1);
        assert_eq!(cycle.sweep_count, 1);
        assert_eq!(scheduler.metrics().sweep_count, 1);
    }
}
