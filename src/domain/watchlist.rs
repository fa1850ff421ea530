//! Time-bounded allowlist of recently qualifying symbols.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

/// A watched symbol and the instant it stops being watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchlistEntry {
    pub added_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl WatchlistEntry {
    /// Active strictly before `expires_at`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Symbols that qualified recently and get re-evaluated even when they no
/// longer move enough on the 24h change.
///
/// Owned by the scanner. Callers pass `now` explicitly so expiry is testable.
#[derive(Debug, Clone)]
pub struct Watchlist {
    ttl: Duration,
    entries: HashMap<String, WatchlistEntry>,
}

impl Watchlist {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert `symbol`, or push its expiry out to `now + ttl`.
    ///
    /// An expiry past the representable range saturates.
    pub fn refresh(&mut self, symbol: &str, now: DateTime<Utc>) {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries
            .entry(symbol.to_string())
            .and_modify(|entry| entry.expires_at = expires_at)
            .or_insert(WatchlistEntry {
                added_at: now,
                expires_at,
            });
    }

    /// Drop expired entries and return how many were removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_active(now));
        before - self.entries.len()
    }

    #[must_use]
    pub fn is_active(&self, symbol: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .get(symbol)
            .is_some_and(|entry| entry.is_active(now))
    }

    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&WatchlistEntry> {
        self.entries.get(symbol)
    }

    /// Read-only copy of the active symbols for the quick filter.
    #[must_use]
    pub fn snapshot(&self, now: DateTime<Utc>) -> HashSet<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_active(now))
            .map(|(symbol, _)| symbol.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::new(Duration::seconds(1800))
    }
}
