//! Metrics collection for sweep operations

/// Metrics collected during sweeps
///
/// One value is produced per swept root; values merge into per-cycle and
/// cumulative totals held by the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepMetrics {
    /// Stale files (and symlinks) deleted
    pub files_deleted: usize,

    /// Stale directories deleted together with their subtree
    pub dirs_deleted: usize,

    /// Empty directories removed by the reclamation pass
    pub empty_dirs_removed: usize,

    /// Deletion attempts that failed (each one logged)
    pub failed_attempts: usize,

    /// Stale entries given up on after exhausting every attempt
    pub abandoned: usize,

    /// Entries skipped because their metadata or listing could not be read
    pub skipped: usize,

    /// Stale directories left in place because they still held entries
    pub kept_dirs: usize,

    /// Total sweep cycles completed
    pub sweep_count: usize,

    /// Total runtime in seconds
    pub total_runtime_secs: u64,
}

impl SweepMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stale file deletion
    pub fn record_file_deleted(&mut self) {
        self.files_deleted += 1;
    }

    /// Record a stale directory deletion
    pub fn record_dir_deleted(&mut self) {
        self.dirs_deleted += 1;
    }

    /// Record an empty directory removal
    pub fn record_empty_dir_removed(&mut self) {
        self.empty_dirs_removed += 1;
    }

    /// Record one failed deletion attempt
    pub fn record_failed_attempt(&mut self) {
        self.failed_attempts += 1;
    }

    /// Record an entry abandoned after its final attempt
    pub fn record_abandoned(&mut self) {
        self.abandoned += 1;
    }

    /// Record an entry skipped because it could not be inspected
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Record a stale directory kept because it still held entries
    pub fn record_kept_dir(&mut self) {
        self.kept_dirs += 1;
    }

    /// Record a sweep cycle completion
    pub fn record_sweep(&mut self) {
        self.sweep_count += 1;
    }

    /// Fold another set of metrics into this one
    pub fn merge(&mut self, other: &SweepMetrics) {
        self.files_deleted += other.files_deleted;
        self.dirs_deleted += other.dirs_deleted;
        self.empty_dirs_removed += other.empty_dirs_removed;
        self.failed_attempts += other.failed_attempts;
        self.abandoned += other.abandoned;
        self.skipped += other.skipped;
        self.kept_dirs += other.kept_dirs;
        self.sweep_count += other.sweep_count;
        self.total_runtime_secs += other.total_runtime_secs;
    }

    /// Get total entries removed by either pass
    pub fn total_removed(&self) -> usize {
        self.files_deleted + self.dirs_deleted + self.empty_dirs_removed
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let lines = [
            "Sweep Metrics Summary".to_string(),
            "=====================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Total runtime: {}s", self.total_runtime_secs),
            String::new(),
            format!("Files deleted: {}", self.files_deleted),
            format!("Directories deleted: {}", self.dirs_deleted),
            format!("Empty directories removed: {}", self.empty_dirs_removed),
            format!("  Total removed: {}", self.total_removed()),
            String::new(),
            format!("Failed attempts: {}", self.failed_attempts),
            format!("Abandoned entries: {}", self.abandoned),
            format!("Skipped entries: {}", self.skipped),
            format!("Kept directories: {}", self.kept_dirs),
        ];

        lines.join("\n")
    }
}
