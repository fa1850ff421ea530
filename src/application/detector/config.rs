//! Detector thresholds.

use serde::Deserialize;

/// Thresholds for every detector. Loaded from the `[detector]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Number of prior 5m candles averaged for the volume baseline.
    pub volume_lookback: usize,
    pub volume_extreme_ratio: f64,
    pub volume_spike_ratio: f64,
    pub volume_elevated_ratio: f64,

    /// Minimum 5m change in percent.
    pub momentum_5m_pct: f64,
    /// Minimum 15m change in percent.
    pub momentum_15m_pct: f64,
    /// Minimum 1h change in percent.
    pub momentum_1h_pct: f64,

    /// Order book levels per side considered for pressure.
    pub book_depth: usize,
    pub book_extreme_ratio: f64,
    pub book_strong_ratio: f64,
    /// Minimum notional of a single bid level, in quote currency.
    pub large_order_notional: f64,

    /// Total candles inspected for a breakout (consolidation plus surge).
    pub breakout_window: usize,
    /// Most recent candles treated as the surge.
    pub breakout_recent: usize,
    /// Maximum consolidation range as percent of mean close.
    pub breakout_max_range_pct: f64,
    pub breakout_volume_ratio: f64,

    /// Open interest points between reference and latest value.
    pub oi_lookback: usize,
    pub oi_surge_pct: f64,

    /// Funding points between reference and latest value.
    pub funding_lookback: usize,
    /// Absolute funding change as a fraction (0.0005 is 0.05%).
    pub funding_spike_delta: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            volume_lookback: 12,
            volume_extreme_ratio: 5.0,
            volume_spike_ratio: 3.0,
            volume_elevated_ratio: 2.0,
            momentum_5m_pct: 2.0,
            momentum_15m_pct: 5.0,
            momentum_1h_pct: 8.0,
            book_depth: 50,
            book_extreme_ratio: 3.5,
            book_strong_ratio: 2.0,
            large_order_notional: 100_000.0,
            breakout_window: 20,
            breakout_recent: 3,
            breakout_max_range_pct: 2.0,
            breakout_volume_ratio: 2.0,
            oi_lookback: 12,
            oi_surge_pct: 15.0,
            funding_lookback: 1,
            funding_spike_delta: 0.0005,
        }
    }
}
