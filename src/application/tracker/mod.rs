//! Follows notified alerts and journals what the price did afterwards.
//!
//! Pending outcomes live in memory. A background task wakes every
//! `poll_interval_secs`; when any checkpoint is due it fetches one ticker
//! batch, samples every due checkpoint from it, and appends the updated
//! outcomes to the journal. Outcomes leave the pending set once every
//! checkpoint is settled.

mod config;

pub use config::TrackerConfig;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{window, Checkpoint, ScoredResult, SignalOutcome};
use crate::error::{ConfigError, Result};
use crate::port::{MarketDataClient, SignalJournal};

pub struct OutcomeTracker {
    client: Arc<dyn MarketDataClient>,
    journal: Arc<dyn SignalJournal>,
    success_threshold_pct: f64,
    max_sample_delay: Duration,
    poll_interval: StdDuration,
    pending: Mutex<Vec<SignalOutcome>>,
}

impl OutcomeTracker {
    /// Fails when `max_sample_delay_secs` does not fit a [`Duration`].
    #[allow(clippy::result_large_err)]
    pub fn new(
        config: &TrackerConfig,
        client: Arc<dyn MarketDataClient>,
        journal: Arc<dyn SignalJournal>,
    ) -> Result<Self> {
        let max_sample_delay = window::seconds(config.max_sample_delay_secs).ok_or_else(|| {
            ConfigError::InvalidValue {
                field: "max_sample_delay_secs",
                reason: format!("{} seconds is out of range", config.max_sample_delay_secs),
            }
        })?;
        Ok(Self {
            client,
            journal,
            success_threshold_pct: config.success_threshold_pct,
            max_sample_delay,
            poll_interval: StdDuration::from_secs(config.poll_interval_secs),
            pending: Mutex::new(Vec::new()),
        })
    }

    /// Override the wake-up period of [`spawn`](Self::spawn).
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: StdDuration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// How long after the alert an outcome can still receive samples.
    #[must_use]
    pub fn horizon(&self) -> Duration {
        Checkpoint::H24.offset() + self.max_sample_delay
    }

    /// Start following the alert journaled as `alert_id`.
    pub fn track(&self, alert_id: Uuid, result: &ScoredResult, alerted_at: DateTime<Utc>) {
        if !(result.last_price.is_finite() && result.last_price > 0.0) {
            debug!(symbol = %result.symbol, "No usable entry price, not tracking");
            return;
        }
        self.pending.lock().push(SignalOutcome::new(
            alert_id,
            result.symbol.clone(),
            result.last_price,
            alerted_at,
        ));
    }

    /// Pick up outcomes that were still open when the process last stopped.
    pub fn resume(&self, outcomes: Vec<SignalOutcome>) {
        if outcomes.is_empty() {
            return;
        }
        info!(pending = outcomes.len(), "Resuming outcome tracking");
        self.pending.lock().extend(outcomes);
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Sample every checkpoint due at `now`. Returns how many outcomes were
    /// updated.
    pub async fn tick(&self, now: DateTime<Utc>) -> usize {
        let any_due = self.pending.lock().iter().any(|o| !o.due(now).is_empty());
        if !any_due {
            return 0;
        }

        // Without prices nothing is sampled; late checkpoints may still be
        // marked missed below.
        let prices: HashMap<String, f64> = match self.client.get_ticker_batch().await {
            Ok(tickers) => tickers.into_iter().map(|t| (t.symbol, t.last_price)).collect(),
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "Outcome price fetch failed");
                HashMap::new()
            }
        };

        let updated = {
            let mut pending = self.pending.lock();
            let mut updated = Vec::new();
            for outcome in pending.iter_mut() {
                if self.settle(outcome, prices.get(&outcome.symbol).copied(), now) {
                    updated.push(outcome.clone());
                }
            }
            pending.retain(|o| !o.is_complete());
            updated
        };

        for outcome in &updated {
            if let Err(e) = self.journal.record_outcome(outcome) {
                warn!(symbol = %outcome.symbol, error = %e, "Failed to journal outcome");
            }
            if outcome.is_complete() {
                info!(
                    symbol = %outcome.symbol,
                    success = ?outcome.success,
                    max_gain = ?outcome.max_gain,
                    max_loss = ?outcome.max_loss,
                    "Outcome tracking finished"
                );
            }
        }
        updated.len()
    }

    /// Settle the checkpoints of `outcome` that are due. Returns whether
    /// anything changed.
    fn settle(&self, outcome: &mut SignalOutcome, price: Option<f64>, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for checkpoint in outcome.due(now) {
            let late = now - (outcome.alerted_at + checkpoint.offset()) > self.max_sample_delay;
            match price.filter(|p| p.is_finite() && *p > 0.0) {
                Some(price) if !late => {
                    outcome.record(checkpoint, price, now, self.success_threshold_pct);
                    changed = true;
                }
                _ if late => {
                    debug!(symbol = %outcome.symbol, checkpoint = checkpoint.label(), "Checkpoint missed");
                    outcome.miss(checkpoint);
                    changed = true;
                }
                _ => {}
            }
        }
        changed
    }

    /// Run [`tick`](Self::tick) every poll interval until the task is aborted.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                self.tick(Utc::now()).await;
            }
        })
    }
}
