//! Bottom-up sweep of a single directory tree

use crate::fs::{FileSystem, LocalFs};
use crate::staleness::is_stale;
use crate::{DirectoryPolicy, JanitorConfig, SweepMetrics};
use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

/// Kind of entry a deletion targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => f.write_str("file"),
            EntryKind::Directory => f.write_str("directory"),
        }
    }
}

/// Result of trying to delete one stale entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deletion {
    Deleted,
    Vanished,
    Abandoned,
    Cancelled,
}

/// Sweeper for one directory tree at a time
///
/// A sweep makes two bottom-up passes over the tree below `root`:
/// 1. Every file and directory whose modification time is older than the
///    threshold is deleted, with bounded retry. A stale directory is removed
///    together with its whole subtree.
/// 2. Every directory left with no entries is removed, regardless of age.
///
/// The root itself is never evaluated or removed, and symlinks are never
/// followed. Filesystem failures are logged and the entry skipped; a sweep
/// always runs to completion unless cancelled.
///
/// Stale-entry deletions run on tokio's blocking pool, since removing a
/// large subtree can take a while. The directory walk, metadata reads and
/// empty-directory removals stay on the calling task.
///
/// # Examples
///
/// ```no_run
/// use stalesweep_janitor::{JanitorConfig, TreeSweeper};
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() {
/// let config = JanitorConfig::for_roots(vec!["/tmp".into()]);
/// let sweeper = TreeSweeper::new(&config);
///
/// let metrics = sweeper.sweep(Path::new("/tmp"), &CancellationToken::new()).await;
/// println!("{}", metrics.summary());
/// # }
/// ```
pub struct TreeSweeper<F = LocalFs> {
    fs: Arc<F>,
    threshold: Duration,
    max_attempts: u32,
    backoff: Duration,
    directory_policy: DirectoryPolicy,
}

impl TreeSweeper<LocalFs> {
    /// Create a sweeper over the local filesystem
    pub fn new(config: &JanitorConfig) -> Self {
        Self::with_fs(config, LocalFs)
    }
}

impl<F: FileSystem + 'static> TreeSweeper<F> {
    /// Create a sweeper that performs its filesystem calls through `fs`
    pub fn with_fs(config: &JanitorConfig, fs: F) -> Self {
        Self {
            fs: Arc::new(fs),
            threshold: config.threshold(),
            max_attempts: config.max_delete_attempts.max(1),
            backoff: config.retry_backoff(),
            directory_policy: config.directory_policy,
        }
    }

    /// Sweep the tree below `root`
    ///
    /// Never fails: every entry-level error is logged and counted in the
    /// returned metrics. Cancellation is observed between entries and during
    /// retry backoff; an interrupted sweep skips the empty-directory pass.
    pub async fn sweep(&self, root: &Path, cancel: &CancellationToken) -> SweepMetrics {
        let mut metrics = SweepMetrics::new();

        match std::fs::metadata(root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                tracing::error!(root = %root.display(), "Root path is not a directory, skipping");
                metrics.record_skipped();
                return metrics;
            }
            Err(err) => {
                tracing::error!(root = %root.display(), error = %err, "Root path unavailable, skipping");
                metrics.record_skipped();
                return metrics;
            }
        }

        tracing::debug!(root = %root.display(), "Sweeping stale entries");
        if !self.remove_stale(root, cancel, &mut metrics).await {
            tracing::info!(root = %root.display(), "Sweep cancelled");
            return metrics;
        }

        tracing::debug!(root = %root.display(), "Reclaiming empty directories");
        self.reclaim_empty_dirs(root, cancel, &mut metrics);

        metrics
    }

    /// First pass: delete stale entries bottom-up
    ///
    /// Returns false if the pass was cancelled.
    async fn remove_stale(
        &self,
        root: &Path,
        cancel: &CancellationToken,
        metrics: &mut SweepMetrics,
    ) -> bool {
        for entry in bottom_up(root) {
            if cancel.is_cancelled() {
                return false;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::error!(
                        path = ?err.path(),
                        error = %err,
                        "Failed to read directory entry"
                    );
                    metrics.record_skipped();
                    continue;
                }
            };

            let path = entry.path();
            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            // Read the timestamp now; children deleted earlier in the walk
            // may have bumped a directory's mtime.
            let modified = match self.fs.modified(path) {
                Ok(modified) => modified,
                Err(err) => {
                    tracing::error!(
                        path = %path.display(),
                        error = %err,
                        "Failed to read modification time"
                    );
                    metrics.record_skipped();
                    continue;
                }
            };

            if !is_stale(modified, self.threshold, SystemTime::now()) {
                continue;
            }

            if kind == EntryKind::Directory
                && self.directory_policy == DirectoryPolicy::KeepFreshDescendants
            {
                match self.fs.is_empty_dir(path) {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::debug!(
                            path = %path.display(),
                            "Keeping stale directory with remaining entries"
                        );
                        metrics.record_kept_dir();
                        continue;
                    }
                    Err(err) => {
                        tracing::error!(
                            path = %path.display(),
                            error = %err,
                            "Failed to list directory"
                        );
                        metrics.record_skipped();
                        continue;
                    }
                }
            }

            if self.delete_with_retry(path, kind, cancel, metrics).await == Deletion::Cancelled {
                return false;
            }
        }

        true
    }

    /// Delete one stale entry, retrying with a fixed backoff
    async fn delete_with_retry(
        &self,
        path: &Path,
        kind: EntryKind,
        cancel: &CancellationToken,
        metrics: &mut SweepMetrics,
    ) -> Deletion {
        for attempt in 1..=self.max_attempts {
            match self.remove(path, kind).await {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "Deleted stale {}", kind);
                    match kind {
                        EntryKind::File => metrics.record_file_deleted(),
                        EntryKind::Directory => metrics.record_dir_deleted(),
                    }
                    return Deletion::Deleted;
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Stale {} already removed", kind);
                    return Deletion::Vanished;
                }
                Err(err) => {
                    metrics.record_failed_attempt();
                    tracing::error!(
                        path = %path.display(),
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "Failed to delete stale {}",
                        kind
                    );
                }
            }

            if attempt < self.max_attempts {
                tokio::select! {
                    _ = cancel.cancelled() => return Deletion::Cancelled,
                    _ = tokio::time::sleep(self.backoff) => {}
                }
            }
        }

        tracing::warn!(
            path = %path.display(),
            attempts = self.max_attempts,
            "Giving up on stale {}",
            kind
        );
        metrics.record_abandoned();
        Deletion::Abandoned
    }

    /// Remove one entry on the blocking pool
    async fn remove(&self, path: &Path, kind: EntryKind) -> io::Result<()> {
        let fs = Arc::clone(&self.fs);
        let path = path.to_path_buf();

        let result = tokio::task::spawn_blocking(move || match kind {
            EntryKind::File => fs.remove_file(&path),
            EntryKind::Directory => fs.remove_dir_all(&path),
        })
        .await;

        match result {
            Ok(removed) => removed,
            Err(err) => Err(io::Error::other(err)),
        }
    }

    /// Second pass: remove every directory with no entries, bottom-up
    ///
    /// Best effort, no retry.
    fn reclaim_empty_dirs(&self, root: &Path, cancel: &CancellationToken, metrics: &mut SweepMetrics) {
        for entry in bottom_up(root) {
            if cancel.is_cancelled() {
                return;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::error!(
                        path = ?err.path(),
                        error = %err,
                        "Failed to read directory entry"
                    );
                    metrics.record_skipped();
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            match self.fs.is_empty_dir(path) {
                Ok(true) => match self.fs.remove_dir(path) {
                    Ok(()) => {
                        tracing::info!(path = %path.display(), "Removed empty directory");
                        metrics.record_empty_dir_removed();
                    }
                    Err(err) => {
                        tracing::error!(
                            path = %path.display(),
                            error = %err,
                            "Failed to remove empty directory"
                        );
                    }
                },
                Ok(false) => {}
                Err(err) => {
                    tracing::error!(
                        path = %path.display(),
                        error = %err,
                        "Failed to list directory"
                    );
                    metrics.record_skipped();
                }
            }
        }
    }
}

/// Walk below `root` yielding every entry after all of its descendants
fn bottom_up(root: &Path) -> walkdir::IntoIter {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
        .into_iter()
}
