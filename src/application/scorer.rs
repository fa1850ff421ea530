//! Composite scoring of one symbol's signals.
//!
//! The weighted sum is divided by the number of signals, not by the sum of
//! weights. Extra weak signals therefore pull the mean down while the
//! confluence bonus rewards them.

use chrono::Utc;

use crate::domain::{Confidence, ScoredResult, Signal, SignalWeights};

use super::detector::Horizons;

/// Bonus points per signal beyond the first.
const CONFLUENCE_STEP: f64 = 5.0;
/// Maximum confluence bonus.
const CONFLUENCE_CAP: f64 = 20.0;

/// Market context copied into the result for display.
#[derive(Debug, Clone, Default)]
pub struct DisplayFields {
    pub last_price: f64,
    pub volume_24h: f64,
    pub change_24h: f64,
    pub horizons: Horizons,
    pub funding_rate: Option<f64>,
}

/// Combines signals into a score and confidence label.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: SignalWeights,
}

impl Scorer {
    #[must_use]
    pub const fn new(weights: SignalWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub const fn weights(&self) -> &SignalWeights {
        &self.weights
    }

    /// Weighted mean plus confluence bonus, floored at zero.
    ///
    /// Returns 0 for an empty slice; callers are expected not to score
    /// symbols without signals.
    #[must_use]
    pub fn score(&self, signals: &[Signal]) -> f64 {
        if signals.is_empty() {
            return 0.0;
        }
        let count = signals.len() as f64;
        let weighted: f64 = signals
            .iter()
            .map(|s| s.strength * self.weights.weight(s.signal_type))
            .sum();
        let bonus = (CONFLUENCE_STEP * (count - 1.0)).min(CONFLUENCE_CAP);
        (weighted / count + bonus).max(0.0)
    }

    /// Build the full result for `symbol`. Always returns a result; the
    /// scanner decides what qualifies.
    #[must_use]
    pub fn build(&self, symbol: &str, mut signals: Vec<Signal>, display: DisplayFields) -> ScoredResult {
        let score = self.score(&signals);
        signals.sort_by(|a, b| b.strength.total_cmp(&a.strength));

        ScoredResult {
            symbol: symbol.to_string(),
            score,
            confidence: Confidence::from_score(score),
            signals,
            last_price: display.last_price,
            volume_24h: display.volume_24h,
            change_24h: display.change_24h,
            change_5m: display.horizons.change_5m,
            change_15m: display.horizons.change_15m,
            change_1h: display.horizons.change_1h,
            funding_rate: display.funding_rate,
            scored_at: Utc::now(),
        }
    }
}
