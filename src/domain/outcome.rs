//! Post-alert price tracking.
//!
//! After an alert the price is sampled at fixed checkpoints. Each sample is
//! the percent change from the entry price; the 1h sample decides whether the
//! alert counts as a success.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Offsets from the alert at which the price is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Checkpoint {
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "24h")]
    H24,
}

impl Checkpoint {
    pub const ALL: [Self; 6] = [Self::M5, Self::M15, Self::M30, Self::H1, Self::H4, Self::H24];

    /// The checkpoint that decides success.
    pub const DECISIVE: Self = Self::H1;

    #[must_use]
    pub const fn minutes(self) -> i64 {
        match self {
            Self::M5 => 5,
            Self::M15 => 15,
            Self::M30 => 30,
            Self::H1 => 60,
            Self::H4 => 240,
            Self::H24 => 1440,
        }
    }

    #[must_use]
    pub fn offset(self) -> Duration {
        Duration::minutes(self.minutes())
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::M30 => "30m",
            Self::H1 => "1h",
            Self::H4 => "4h",
            Self::H24 => "24h",
        }
    }
}

/// One price observation after the alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub checkpoint: Checkpoint,
    pub price: f64,
    /// Percent change from the entry price.
    pub change_pct: f64,
    pub sampled_at: DateTime<Utc>,
}

/// What the price did after one alert.
///
/// Every checkpoint ends up either sampled or missed; a checkpoint is missed
/// when no price could be taken close enough to its offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalOutcome {
    /// Id of the journal record of the alert.
    pub alert_id: Uuid,
    pub symbol: String,
    pub entry_price: f64,
    pub alerted_at: DateTime<Utc>,
    #[serde(default)]
    pub samples: Vec<PriceSample>,
    #[serde(default)]
    pub missed: Vec<Checkpoint>,
    /// Highest change seen at any checkpoint.
    pub max_gain: Option<f64>,
    /// Lowest change seen at any checkpoint.
    pub max_loss: Option<f64>,
    /// Set once the decisive checkpoint is sampled.
    pub success: Option<bool>,
}

impl SignalOutcome {
    #[must_use]
    pub fn new(
        alert_id: Uuid,
        symbol: impl Into<String>,
        entry_price: f64,
        alerted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            alert_id,
            symbol: symbol.into(),
            entry_price,
            alerted_at,
            samples: Vec::new(),
            missed: Vec::new(),
            max_gain: None,
            max_loss: None,
            success: None,
        }
    }

    #[must_use]
    pub fn sample(&self, checkpoint: Checkpoint) -> Option<&PriceSample> {
        self.samples.iter().find(|s| s.checkpoint == checkpoint)
    }

    #[must_use]
    pub fn change_at(&self, checkpoint: Checkpoint) -> Option<f64> {
        self.sample(checkpoint).map(|s| s.change_pct)
    }

    #[must_use]
    pub fn is_settled(&self, checkpoint: Checkpoint) -> bool {
        self.sample(checkpoint).is_some() || self.missed.contains(&checkpoint)
    }

    /// Unsettled checkpoints whose offset has passed at `now`.
    #[must_use]
    pub fn due(&self, now: DateTime<Utc>) -> Vec<Checkpoint> {
        Checkpoint::ALL
            .into_iter()
            .filter(|cp| !self.is_settled(*cp) && now >= self.alerted_at + cp.offset())
            .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        Checkpoint::ALL.into_iter().all(|cp| self.is_settled(cp))
    }

    /// Record the price at `checkpoint`.
    ///
    /// `success_threshold_pct` only matters for the decisive checkpoint.
    /// Already-settled checkpoints and unusable prices are ignored.
    pub fn record(
        &mut self,
        checkpoint: Checkpoint,
        price: f64,
        sampled_at: DateTime<Utc>,
        success_threshold_pct: f64,
    ) {
        if self.is_settled(checkpoint) || !price.is_finite() || self.entry_price <= 0.0 {
            return;
        }
        let change_pct = (price - self.entry_price) / self.entry_price * 100.0;
        self.samples.push(PriceSample {
            checkpoint,
            price,
            change_pct,
            sampled_at,
        });
        self.samples.sort_by_key(|s| s.checkpoint);

        self.max_gain = Some(self.max_gain.map_or(change_pct, |g| g.max(change_pct)));
        self.max_loss = Some(self.max_loss.map_or(change_pct, |l| l.min(change_pct)));
        if checkpoint == Checkpoint::DECISIVE {
            self.success = Some(change_pct >= success_threshold_pct);
        }
    }

    pub fn miss(&mut self, checkpoint: Checkpoint) {
        if !self.is_settled(checkpoint) {
            self.missed.push(checkpoint);
            self.missed.sort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn outcome() -> SignalOutcome {
        SignalOutcome::new(Uuid::nil(), "PEPEUSDT", 2.0, t0())
    }

    #[test]
    fn checkpoints_fall_due_in_order() {
        let outcome = outcome();
        assert!(outcome.due(t0() + Duration::minutes(4)).is_empty());
        assert_eq!(outcome.due(t0() + Duration::minutes(5)), vec![Checkpoint::M5]);
        assert_eq!(
            outcome.due(t0() + Duration::minutes(61)),
            vec![Checkpoint::M5, Checkpoint::M15, Checkpoint::M30, Checkpoint::H1]
        );
    }

    #[test]
    fn samples_track_extremes() {
        let mut outcome = outcome();
        outcome.record(Checkpoint::M5, 2.2, t0(), 3.0);
        outcome.record(Checkpoint::M15, 1.8, t0(), 3.0);
        outcome.record(Checkpoint::M30, 2.1, t0(), 3.0);

        assert!((outcome.change_at(Checkpoint::M5).unwrap() - 10.0).abs() < 1e-9);
        assert!((outcome.max_gain.unwrap() - 10.0).abs() < 1e-9);
        assert!((outcome.max_loss.unwrap() + 10.0).abs() < 1e-9);
        assert_eq!(outcome.success, None);
        assert_eq!(outcome.due(t0() + Duration::minutes(30)), Vec::<Checkpoint>::new());
    }

    #[test]
    fn one_hour_change_decides_success() {
        let mut hit = outcome();
        hit.record(Checkpoint::H1, 2.1, t0(), 3.0);
        assert_eq!(hit.success, Some(true));

        let mut flop = outcome();
        flop.record(Checkpoint::H1, 2.04, t0(), 3.0);
        assert_eq!(flop.success, Some(false));
    }

    #[test]
    fn settled_checkpoints_are_not_overwritten() {
        let mut outcome = outcome();
        outcome.record(Checkpoint::M5, 3.0, t0(), 3.0);
        outcome.record(Checkpoint::M5, 1.0, t0(), 3.0);
        outcome.miss(Checkpoint::M5);

        assert_eq!(outcome.samples.len(), 1);
        assert!(outcome.missed.is_empty());
        assert!((outcome.change_at(Checkpoint::M5).unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn complete_once_every_checkpoint_is_settled() {
        let mut outcome = outcome();
        for cp in Checkpoint::ALL {
            assert!(!outcome.is_complete());
            if cp == Checkpoint::H4 {
                outcome.miss(cp);
            } else {
                outcome.record(cp, 2.0, t0(), 3.0);
            }
        }
        assert!(outcome.is_complete());
        assert_eq!(outcome.missed, vec![Checkpoint::H4]);
    }

    #[test]
    fn unusable_prices_are_ignored() {
        let mut outcome = outcome();
        outcome.record(Checkpoint::M5, f64::NAN, t0(), 3.0);
        assert!(outcome.samples.is_empty());

        let mut zero_entry = SignalOutcome::new(Uuid::nil(), "X", 0.0, t0());
        zero_entry.record(Checkpoint::M5, 1.0, t0(), 3.0);
        assert!(zero_entry.max_gain.is_none());
    }
}
