//! Multi-timeframe price momentum.

use serde::{Deserialize, Serialize};

use crate::domain::{InstrumentSnapshot, Signal, SignalDetails, SignalType, Timeframe};

use super::{scaled_strength, Detector, DetectorConfig};

/// Price change in percent over the three momentum horizons.
///
/// - 5m: five 1m bars back
/// - 15m: three 5m bars back
/// - 1h: four 15m bars back, falling back to one 1h bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Horizons {
    pub change_5m: Option<f64>,
    pub change_15m: Option<f64>,
    pub change_1h: Option<f64>,
}

impl Horizons {
    #[must_use]
    pub fn of(snapshot: &InstrumentSnapshot) -> Self {
        Self {
            change_5m: snapshot.price_change_pct(Timeframe::M1, 5),
            change_15m: snapshot.price_change_pct(Timeframe::M5, 3),
            change_1h: snapshot
                .price_change_pct(Timeframe::M15, 4)
                .or_else(|| snapshot.price_change_pct(Timeframe::H1, 1)),
        }
    }

    /// Short-term move outpacing longer ones, all upward.
    #[must_use]
    pub fn is_accelerating(&self) -> bool {
        match (self.change_5m, self.change_15m, self.change_1h) {
            (Some(m5), Some(m15), Some(h1)) => m5 > m15 && m15 > h1 && h1 > 0.0,
            _ => false,
        }
    }
}

pub struct MomentumDetector {
    config: DetectorConfig,
}

impl MomentumDetector {
    #[must_use]
    pub const fn new(config: DetectorConfig) -> Self {
        Self { config }
    }
}

impl Detector for MomentumDetector {
    fn name(&self) -> &'static str {
        "momentum"
    }

    fn detect(&self, snapshot: &InstrumentSnapshot) -> Vec<Signal> {
        let horizons = Horizons::of(snapshot);
        let mut signals = Vec::new();

        if horizons.is_accelerating() {
            signals.push(Signal::new(
                &snapshot.symbol,
                SignalType::MomentumAcceleration,
                SignalType::MomentumAcceleration.base_strength(),
                snapshot.captured_at,
                SignalDetails::Acceleration {
                    change_5m: horizons.change_5m.unwrap_or_default(),
                    change_15m: horizons.change_15m.unwrap_or_default(),
                    change_1h: horizons.change_1h.unwrap_or_default(),
                },
            ));
        }

        let strong = [
            (
                SignalType::Strong5mMomentum,
                Timeframe::M5,
                horizons.change_5m,
                self.config.momentum_5m_pct,
            ),
            (
                SignalType::Strong15mMomentum,
                Timeframe::M15,
                horizons.change_15m,
                self.config.momentum_15m_pct,
            ),
            (
                SignalType::Strong1hMomentum,
                Timeframe::H1,
                horizons.change_1h,
                self.config.momentum_1h_pct,
            ),
        ];

        for (signal_type, timeframe, change, threshold) in strong {
            let Some(change_pct) = change.filter(|c| c.is_finite()) else {
                continue;
            };
            if change_pct < threshold {
                continue;
            }
            signals.push(Signal::new(
                &snapshot.symbol,
                signal_type,
                scaled_strength(signal_type, change_pct, threshold),
                snapshot.captured_at,
                SignalDetails::Momentum {
                    timeframe,
                    change_pct,
                },
            ));
        }

        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Candle;
    use crate::testkit::domain::{flat_candles, snapshot};

    /// Flat series at `close` with the bar `periods` before the last set to
    /// `reference`.
    fn series(periods: usize, reference: f64, close: f64) -> Vec<Candle> {
        let mut candles = flat_candles(periods + 5, close, 10.0);
        let index = candles.len() - 1 - periods;
        candles[index].close = reference;
        candles
    }

    fn accelerating() -> InstrumentSnapshot {
        let mut snap = snapshot("MOMUSDT", 100.0);
        snap.candles_1m = series(5, 90.0, 100.0);
        snap.candles_5m = series(3, 95.0, 100.0);
        snap.candles_15m = series(4, 98.0, 100.0);
        snap
    }

    fn types(signals: &[Signal]) -> Vec<SignalType> {
        signals.iter().map(|s| s.signal_type).collect()
    }

    #[test]
    fn horizons_use_reference_bars() {
        let horizons = Horizons::of(&accelerating());
        let m5 = horizons.change_5m.unwrap();
        assert!((m5 - 11.111).abs() < 0.01);
        assert!((horizons.change_15m.unwrap() - 5.263).abs() < 0.01);
        assert!((horizons.change_1h.unwrap() - 2.041).abs() < 0.01);
    }

    #[test]
    fn fires_acceleration_and_strong_moves() {
        let signals = MomentumDetector::new(DetectorConfig::default()).detect(&accelerating());
        assert_eq!(
            types(&signals),
            vec![
                SignalType::MomentumAcceleration,
                SignalType::Strong5mMomentum,
                SignalType::Strong15mMomentum,
            ]
        );
        assert_eq!(signals[0].strength, 85.0);
        assert_eq!(signals[1].strength, 74.0);
        assert!(signals[2].strength > 60.0 && signals[2].strength <= 69.0);
    }

    #[test]
    fn no_acceleration_when_longer_horizon_is_faster() {
        let mut snap = accelerating();
        snap.candles_15m = series(4, 80.0, 100.0);
        let horizons = Horizons::of(&snap);
        assert!(!horizons.is_accelerating());

        let signals = MomentumDetector::new(DetectorConfig::default()).detect(&snap);
        assert!(!types(&signals).contains(&SignalType::MomentumAcceleration));
        assert!(types(&signals).contains(&SignalType::Strong1hMomentum));
    }

    #[test]
    fn no_acceleration_when_falling() {
        let mut snap = snapshot("DOWNUSDT", 100.0);
        snap.candles_1m = series(5, 101.0, 100.0);
        snap.candles_5m = series(3, 102.0, 100.0);
        snap.candles_15m = series(4, 103.0, 100.0);
        assert!(MomentumDetector::new(DetectorConfig::default())
            .detect(&snap)
            .is_empty());
    }

    #[test]
    fn one_hour_falls_back_to_hourly_bar() {
        let mut snap = snapshot("HOURUSDT", 100.0);
        snap.candles_1h = series(1, 90.0, 100.0);
        let horizons = Horizons::of(&snap);
        assert!((horizons.change_1h.unwrap() - 11.111).abs() < 0.01);

        let signals = MomentumDetector::new(DetectorConfig::default()).detect(&snap);
        assert_eq!(types(&signals), vec![SignalType::Strong1hMomentum]);
        assert!(signals[0].strength <= 59.0);
    }

    #[test]
    fn missing_series_do_not_fire() {
        let snap = snapshot("NONEUSDT", 100.0);
        assert_eq!(Horizons::of(&snap), Horizons::default());
        assert!(MomentumDetector::new(DetectorConfig::default())
            .detect(&snap)
            .is_empty());
    }
}
