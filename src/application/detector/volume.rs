//! Volume spike detection on the 5m series.

use crate::domain::{InstrumentSnapshot, Signal, SignalDetails, SignalType, Timeframe};

use super::{Detector, DetectorConfig};

/// Compares the latest 5m candle volume with the mean of the preceding
/// `volume_lookback` candles. Fires at most one volume signal, the most
/// severe tier reached.
pub struct VolumeDetector {
    config: DetectorConfig,
}

impl VolumeDetector {
    #[must_use]
    pub const fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    fn tier(&self, ratio: f64) -> Option<SignalType> {
        if ratio >= self.config.volume_extreme_ratio {
            Some(SignalType::ExtremeVolumeSpike)
        } else if ratio >= self.config.volume_spike_ratio {
            Some(SignalType::VolumeSpike)
        } else if ratio >= self.config.volume_elevated_ratio {
            Some(SignalType::ElevatedVolume)
        } else {
            None
        }
    }
}

impl Detector for VolumeDetector {
    fn name(&self) -> &'static str {
        "volume"
    }

    fn detect(&self, snapshot: &InstrumentSnapshot) -> Vec<Signal> {
        let candles = snapshot.candles(Timeframe::M5);
        let lookback = self.config.volume_lookback;
        if lookback == 0 || candles.len() < lookback + 1 {
            return vec![];
        }

        let (history, latest) = candles.split_at(candles.len() - 1);
        let current = latest[0].volume;
        let window = &history[history.len() - lookback..];
        let average = window.iter().map(|c| c.volume).sum::<f64>() / lookback as f64;

        if !average.is_finite() || average <= 0.0 || !current.is_finite() {
            return vec![];
        }

        let ratio = current / average;
        let Some(signal_type) = self.tier(ratio) else {
            return vec![];
        };

        vec![Signal::new(
            &snapshot.symbol,
            signal_type,
            signal_type.base_strength(),
            snapshot.captured_at,
            SignalDetails::Volume {
                ratio,
                current,
                average,
            },
        )]
    }
}
