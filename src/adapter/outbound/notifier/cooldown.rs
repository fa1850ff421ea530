//! Per-symbol alert cooldown.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::domain::window;
use crate::error::{ConfigError, Result};

/// Default quiet period after a symbol is alerted.
pub const DEFAULT_COOLDOWN_SECS: u64 = 900;

/// Remembers when each symbol was last alerted.
///
/// A symbol is on cooldown while `now - last_notified < window`.
#[derive(Debug)]
pub struct CooldownTracker {
    window: Duration,
    last_notified: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl CooldownTracker {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_notified: Mutex::new(HashMap::new()),
        }
    }

    /// Fails when `secs` does not fit a [`Duration`].
    #[allow(clippy::result_large_err)]
    pub fn from_secs(secs: u64) -> Result<Self> {
        let window = window::seconds(secs).ok_or_else(|| ConfigError::InvalidValue {
            field: "telegram.cooldown_secs",
            reason: format!("{secs} seconds is out of range"),
        })?;
        Ok(Self::new(window))
    }

    #[must_use]
    pub fn is_active(&self, symbol: &str, now: DateTime<Utc>) -> bool {
        self.last_notified
            .lock()
            .get(symbol)
            .is_some_and(|at| now - *at < self.window)
    }

    /// Record an alert for `symbol` at `now`.
    pub fn mark(&self, symbol: &str, now: DateTime<Utc>) {
        self.last_notified.lock().insert(symbol.to_string(), now);
    }

    /// Mark `symbol` unless it is already cooling down.
    ///
    /// Returns `true` when the caller should send the alert.
    pub fn try_mark(&self, symbol: &str, now: DateTime<Utc>) -> bool {
        let mut last = self.last_notified.lock();
        match last.get(symbol) {
            Some(at) if now - *at < self.window => false,
            _ => {
                last.insert(symbol.to_string(), now);
                true
            }
        }
    }

    /// Drop entries whose window has passed.
    pub fn prune(&self, now: DateTime<Utc>) {
        self.last_notified.lock().retain(|_, at| now - *at < self.window);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.last_notified.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_notified.lock().is_empty()
    }
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_COOLDOWN_SECS as i64))
    }
}
