//! Scoring configuration.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::{SignalType, SignalWeights};
use crate::error::{ConfigError, Result};

const fn default_min_score() -> f64 {
    65.0
}

/// Alert threshold and per-signal weights.
///
/// ```toml
/// [scoring]
/// min_score = 70
///
/// [scoring.weights]
/// FUNDING_RATE_SPIKE = 0.5
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Results below this final score are dropped.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// Weight overrides keyed by signal type name. Unlisted types weigh 1.0.
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

impl ScoringConfig {
    /// Resolve the weight table, rejecting unknown names and invalid values.
    #[allow(clippy::result_large_err)]
    pub fn signal_weights(&self) -> Result<SignalWeights> {
        self.weights
            .iter()
            .map(|(name, weight)| -> Result<(SignalType, f64)> {
                let signal_type = SignalType::from_name(name).ok_or_else(|| {
                    ConfigError::InvalidValue {
                        field: "scoring.weights",
                        reason: format!("unknown signal type `{name}`"),
                    }
                })?;
                if !weight.is_finite() || *weight < 0.0 {
                    return Err(ConfigError::InvalidValue {
                        field: "scoring.weights",
                        reason: format!("weight for {name} must be a finite number >= 0"),
                    }
                    .into());
                }
                Ok((signal_type, *weight))
            })
            .collect()
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            weights: BTreeMap::new(),
        }
    }
}
