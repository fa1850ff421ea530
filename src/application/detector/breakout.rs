//! Consolidation breakout on the 5m series.

use crate::domain::{Candle, InstrumentSnapshot, Signal, SignalDetails, SignalType, Timeframe};

use super::{Detector, DetectorConfig};

/// Fires when the candles before the most recent few trade in a tight range
/// and the most recent few print a volume surge.
pub struct BreakoutDetector {
    config: DetectorConfig,
}

impl BreakoutDetector {
    #[must_use]
    pub const fn new(config: DetectorConfig) -> Self {
        Self { config }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Range of the consolidation as a percent of its mean close.
fn range_pct(candles: &[Candle]) -> Option<f64> {
    let high = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let low = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let mean_close = mean(candles.iter().map(|c| c.close))?;
    if !mean_close.is_finite() || mean_close <= 0.0 {
        return None;
    }
    let pct = (high - low) / mean_close * 100.0;
    pct.is_finite().then_some(pct)
}

impl Detector for BreakoutDetector {
    fn name(&self) -> &'static str {
        "breakout"
    }

    fn detect(&self, snapshot: &InstrumentSnapshot) -> Vec<Signal> {
        let window = self.config.breakout_window;
        let recent = self.config.breakout_recent;
        let candles = snapshot.candles(Timeframe::M5);
        if recent == 0 || window <= recent || candles.len() < window {
            return vec![];
        }

        let tail = &candles[candles.len() - window..];
        let (consolidation, surge) = tail.split_at(window - recent);

        let Some(range_pct) = range_pct(consolidation) else {
            return vec![];
        };
        if range_pct >= self.config.breakout_max_range_pct {
            return vec![];
        }

        let (Some(base_volume), Some(surge_volume)) = (
            mean(consolidation.iter().map(|c| c.volume)),
            mean(surge.iter().map(|c| c.volume)),
        ) else {
            return vec![];
        };
        if !base_volume.is_finite() || base_volume <= 0.0 || !surge_volume.is_finite() {
            return vec![];
        }

        let volume_ratio = surge_volume / base_volume;
        if volume_ratio < self.config.breakout_volume_ratio {
            return vec![];
        }

        vec![Signal::new(
            &snapshot.symbol,
            SignalType::BreakoutPattern,
            SignalType::BreakoutPattern.base_strength(),
            snapshot.captured_at,
            SignalDetails::Breakout {
                range_pct,
                volume_ratio,
            },
        )]
    }
}
