//! Composite score, confidence label and per-type weights.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::signal::{Signal, SignalType};

/// Confidence label derived from the final score.
///
/// Variant order is the ranking order: `VeryHigh` compares greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Confidence {
    /// Map a final score to its label. Thresholds are inclusive lower bounds.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Self::VeryHigh
        } else if score >= 75.0 {
            Self::High
        } else if score >= 65.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::VeryHigh => "VERY_HIGH",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-signal-type weight overrides. Types without an override weigh 1.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalWeights {
    overrides: HashMap<SignalType, f64>,
}

impl SignalWeights {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, signal_type: SignalType, weight: f64) -> Self {
        self.overrides.insert(signal_type, weight);
        self
    }

    #[must_use]
    pub fn weight(&self, signal_type: SignalType) -> f64 {
        self.overrides.get(&signal_type).copied().unwrap_or(1.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl FromIterator<(SignalType, f64)> for SignalWeights {
    fn from_iter<I: IntoIterator<Item = (SignalType, f64)>>(iter: I) -> Self {
        Self {
            overrides: iter.into_iter().collect(),
        }
    }
}

/// Scored outcome of one deep analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub symbol: String,
    /// Final score; may exceed 100 because of the confluence bonus.
    pub score: f64,
    pub confidence: Confidence,
    /// Contributing signals, strongest first.
    pub signals: Vec<Signal>,
    pub last_price: f64,
    pub volume_24h: f64,
    pub change_24h: f64,
    pub change_5m: Option<f64>,
    pub change_15m: Option<f64>,
    pub change_1h: Option<f64>,
    pub funding_rate: Option<f64>,
    pub scored_at: DateTime<Utc>,
}

impl ScoredResult {
    /// Score capped at 100 for presentation.
    #[must_use]
    pub fn display_score(&self) -> f64 {
        self.score.min(100.0)
    }

    #[must_use]
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    #[must_use]
    pub fn has_signal(&self, signal_type: SignalType) -> bool {
        self.signals.iter().any(|s| s.signal_type == signal_type)
    }

    /// Ranking order: higher score first, then higher confidence, then more
    /// signals. Equal results compare `Equal` so a stable sort keeps input
    /// order.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.confidence.cmp(&self.confidence))
            .then_with(|| other.signal_count().cmp(&self.signal_count()))
    }
}
