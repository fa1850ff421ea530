//! Open interest and funding rate moves.

use crate::domain::{InstrumentSnapshot, SeriesPoint, Signal, SignalDetails, SignalType};

use super::{scaled_strength, Detector, DetectorConfig};

pub struct DerivativesDetector {
    config: DetectorConfig,
}

/// Latest value and the value `lookback` points earlier.
fn endpoints(series: &[SeriesPoint], lookback: usize) -> Option<(f64, f64)> {
    if lookback == 0 || series.len() <= lookback {
        return None;
    }
    let latest = series[series.len() - 1].value;
    let reference = series[series.len() - 1 - lookback].value;
    (latest.is_finite() && reference.is_finite()).then_some((reference, latest))
}

impl DerivativesDetector {
    #[must_use]
    pub const fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    fn open_interest(&self, snapshot: &InstrumentSnapshot) -> Option<Signal> {
        let (reference, current) = endpoints(&snapshot.open_interest, self.config.oi_lookback)?;
        if reference <= 0.0 {
            return None;
        }
        let change_pct = (current - reference) / reference * 100.0;
        if change_pct < self.config.oi_surge_pct {
            return None;
        }
        Some(Signal::new(
            &snapshot.symbol,
            SignalType::OpenInterestSurge,
            scaled_strength(
                SignalType::OpenInterestSurge,
                change_pct,
                self.config.oi_surge_pct,
            ),
            snapshot.captured_at,
            SignalDetails::OpenInterest {
                change_pct,
                current,
            },
        ))
    }

    /// Live rate against the settled rate `funding_lookback` points back.
    /// Without a live rate, the two settled endpoints are compared instead.
    fn funding(&self, snapshot: &InstrumentSnapshot) -> Option<Signal> {
        let lookback = self.config.funding_lookback;
        let (reference, current) = match snapshot.funding_rate.filter(|r| r.is_finite()) {
            Some(live) => {
                let settled = &snapshot.funding_rates;
                if lookback == 0 || settled.len() < lookback {
                    return None;
                }
                let reference = settled[settled.len() - lookback].value;
                (reference.is_finite().then_some(reference)?, live)
            }
            None => endpoints(&snapshot.funding_rates, lookback)?,
        };
        let delta = current - reference;
        if delta.abs() < self.config.funding_spike_delta {
            return None;
        }
        Some(Signal::new(
            &snapshot.symbol,
            SignalType::FundingRateSpike,
            scaled_strength(
                SignalType::FundingRateSpike,
                delta.abs(),
                self.config.funding_spike_delta,
            ),
            snapshot.captured_at,
            SignalDetails::Funding { delta, current },
        ))
    }
}

impl Detector for DerivativesDetector {
    fn name(&self) -> &'static str {
        "derivatives"
    }

    fn detect(&self, snapshot: &InstrumentSnapshot) -> Vec<Signal> {
        self.open_interest(snapshot)
            .into_iter()
            .chain(self.funding(snapshot))
            .collect()
    }
}
