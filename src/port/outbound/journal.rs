//! Append-only record of emitted alerts and what happened after them.

use uuid::Uuid;

use crate::domain::{ScoredResult, SignalOutcome};
use crate::error::Result;

/// Sink for alerts that were handed to the notifiers.
pub trait SignalJournal: Send + Sync {
    /// Append an alert and return the id it was filed under.
    fn record(&self, result: &ScoredResult) -> Result<Uuid>;

    /// Append the latest state of an alert's outcome. Later entries for the
    /// same `alert_id` supersede earlier ones.
    fn record_outcome(&self, outcome: &SignalOutcome) -> Result<()>;
}

/// Journal that drops everything.
pub struct NullJournal;

impl SignalJournal for NullJournal {
    fn record(&self, _result: &ScoredResult) -> Result<Uuid> {
        Ok(Uuid::new_v4())
    }

    fn record_outcome(&self, _outcome: &SignalOutcome) -> Result<()> {
        Ok(())
    }
}
