//! Whole-second windows.

use chrono::Duration;

/// `secs` as a [`Duration`], or `None` when it exceeds chrono's range.
#[must_use]
pub fn seconds(secs: u64) -> Option<Duration> {
    i64::try_from(secs).ok().and_then(Duration::try_seconds)
}
