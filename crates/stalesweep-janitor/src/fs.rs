//! Filesystem operations used by the sweeper
//!
//! The sweeper walks trees with `walkdir` but routes every metadata read and
//! every removal through [`FileSystem`], so tests can inject failures.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Trait for the filesystem calls a sweep makes on individual entries
///
/// Implemented for the local filesystem by [`LocalFs`]
pub trait FileSystem: Send + Sync {
    /// Current modification time of the entry itself (symlinks not followed)
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Remove a file or symlink
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory and everything beneath it
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Whether a directory currently has no entries
    fn is_empty_dir(&self, path: &Path) -> io::Result<bool>;
}

/// The local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        fs::symlink_metadata(path)?.modified()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn is_empty_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(fs::read_dir(path)?.next().is_none())
    }
}
