//! Signal detectors.
//!
//! A detector is a pure function of one [`InstrumentSnapshot`] and its
//! thresholds. It returns zero or more signals and treats missing or
//! insufficient data as "does not fire".
//!
//! - [`VolumeDetector`] - 5m volume against its trailing average
//! - [`MomentumDetector`] - 5m/15m/1h price change and acceleration
//! - [`OrderBookDetector`] - bid/ask imbalance and large resting bids
//! - [`BreakoutDetector`] - tight consolidation followed by a volume surge
//! - [`DerivativesDetector`] - open interest and funding rate moves

mod book;
mod breakout;
mod config;
mod derivatives;
mod momentum;
mod volume;

pub use book::OrderBookDetector;
pub use breakout::BreakoutDetector;
pub use config::DetectorConfig;
pub use derivatives::DerivativesDetector;
pub use momentum::{Horizons, MomentumDetector};
pub use volume::VolumeDetector;

use crate::domain::{InstrumentSnapshot, Signal, SignalType};

/// Maximum bonus added on top of a base strength for magnitude.
const MAX_MAGNITUDE_BONUS: f64 = 25.0;

/// A pure snapshot-to-signals function.
pub trait Detector: Send + Sync {
    /// Unique detector name, used in logs.
    fn name(&self) -> &'static str;

    fn detect(&self, snapshot: &InstrumentSnapshot) -> Vec<Signal>;
}

/// Strength for a signal that scales with how far `value` exceeds
/// `threshold`.
///
/// The bonus grows linearly from 0 at the threshold to 25 points at twice
/// the threshold and is capped at the type's ceiling.
#[must_use]
pub fn scaled_strength(signal_type: SignalType, value: f64, threshold: f64) -> f64 {
    let base = signal_type.base_strength();
    let excess = if threshold > 0.0 {
        ((value - threshold) / threshold).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (base + MAX_MAGNITUDE_BONUS * excess).min(signal_type.strength_ceiling())
}

/// Registry of enabled detectors.
///
/// Detectors run in registration order; their signals are concatenated.
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in detector using `config`.
    #[must_use]
    pub fn with_defaults(config: &DetectorConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(VolumeDetector::new(config.clone())));
        registry.register(Box::new(MomentumDetector::new(config.clone())));
        registry.register(Box::new(OrderBookDetector::new(config.clone())));
        registry.register(Box::new(BreakoutDetector::new(config.clone())));
        registry.register(Box::new(DerivativesDetector::new(config.clone())));
        registry
    }

    pub fn register(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    #[must_use]
    pub fn detectors(&self) -> &[Box<dyn Detector>] {
        &self.detectors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Run every detector against the snapshot.
    #[must_use]
    pub fn detect_all(&self, snapshot: &InstrumentSnapshot) -> Vec<Signal> {
        self.detectors
            .iter()
            .flat_map(|d| d.detect(snapshot))
            .collect()
    }
}
