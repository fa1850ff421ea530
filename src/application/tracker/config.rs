//! Outcome tracking settings.

use serde::Deserialize;

/// Loaded from the `[tracker]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Track alerts after they are sent. Needs the journal.
    pub enabled: bool,
    /// How often pending checkpoints are checked.
    pub poll_interval_secs: u64,
    /// A checkpoint that cannot be sampled within this long after it falls
    /// due is marked missed.
    pub max_sample_delay_secs: u64,
    /// 1h change in percent at or above which an alert counts as a success.
    pub success_threshold_pct: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: 30,
            max_sample_delay_secs: 120,
            success_threshold_pct: 3.0,
        }
    }
}
