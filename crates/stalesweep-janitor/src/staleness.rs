//! Staleness evaluation for filesystem entries

use std::time::{Duration, SystemTime};

/// Decide whether an entry last modified at `modified` is stale at `now`
///
/// Returns true iff more than `threshold` has elapsed since `modified`.
/// An entry exactly at the threshold is not stale, and a modification time
/// in the future (clock skew) never is.
pub fn is_stale(modified: SystemTime, threshold: Duration, now: SystemTime) -> bool {
    match now.duration_since(modified) {
        Ok(idle) => idle > threshold,
        Err(_) => false,
    }
}
