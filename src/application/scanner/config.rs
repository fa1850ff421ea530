//! Scanner settings.

use serde::Deserialize;

/// Funnel and scheduling settings. Loaded from the `[scanner]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Pause between the end of one cycle and the start of the next.
    pub scan_interval_secs: u64,
    /// Maximum concurrent deep analyses.
    pub max_workers: usize,
    /// Minimum 24h turnover in quote currency.
    pub min_volume_24h: f64,
    /// Minimum absolute 24h change in percent, unless watchlisted.
    pub min_change_24h_pct: f64,
    pub max_price: f64,
    pub max_notifications: usize,
    pub watchlist_ttl_secs: u64,
    /// How often the tradeable instrument list is re-fetched.
    pub symbol_refresh_secs: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 90,
            max_workers: 10,
            min_volume_24h: 2_000_000.0,
            min_change_24h_pct: 5.0,
            max_price: 100_000.0,
            max_notifications: 5,
            watchlist_ttl_secs: 1800,
            symbol_refresh_secs: 3600,
        }
    }
}
