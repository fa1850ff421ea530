//! Stage 2: in-memory quick filter over the ticker batch.

use std::collections::HashSet;

use crate::domain::Ticker;

use super::ScannerConfig;

/// Pure predicate over a ticker and a watchlist snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuickFilter {
    pub min_volume_24h: f64,
    pub min_change_24h_pct: f64,
    pub max_price: f64,
}

impl QuickFilter {
    #[must_use]
    pub const fn from_config(config: &ScannerConfig) -> Self {
        Self {
            min_volume_24h: config.min_volume_24h,
            min_change_24h_pct: config.min_change_24h_pct,
            max_price: config.max_price,
        }
    }

    /// Volume floor, then fresh mover or watchlisted, then price ceiling.
    #[must_use]
    pub fn passes(&self, ticker: &Ticker, watchlist: &HashSet<String>) -> bool {
        if !ticker.volume_24h.is_finite() || !ticker.last_price.is_finite() {
            return false;
        }
        let moving = ticker.change_24h_pct.is_finite()
            && ticker.change_24h_pct.abs() >= self.min_change_24h_pct;

        ticker.volume_24h >= self.min_volume_24h
            && (moving || watchlist.contains(&ticker.symbol))
            && ticker.last_price <= self.max_price
    }

    /// Surviving tickers in input order.
    #[must_use]
    pub fn apply<'a>(&self, tickers: &'a [Ticker], watchlist: &HashSet<String>) -> Vec<&'a Ticker> {
        tickers
            .iter()
            .filter(|t| self.passes(t, watchlist))
            .collect()
    }
}
