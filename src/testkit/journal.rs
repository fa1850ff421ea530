//! Journal that keeps everything in memory.

use parking_lot::Mutex;
use uuid::Uuid;

use crate::domain::{ScoredResult, SignalOutcome};
use crate::error::Result;
use crate::port::SignalJournal;

/// Records alerts and outcome updates in append order.
#[derive(Default)]
pub struct MemoryJournal {
    alerts: Mutex<Vec<(Uuid, ScoredResult)>>,
    outcomes: Mutex<Vec<SignalOutcome>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<(Uuid, ScoredResult)> {
        self.alerts.lock().clone()
    }

    /// Every outcome update, oldest first.
    pub fn outcomes(&self) -> Vec<SignalOutcome> {
        self.outcomes.lock().clone()
    }
}

impl SignalJournal for MemoryJournal {
    fn record(&self, result: &ScoredResult) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.alerts.lock().push((id, result.clone()));
        Ok(id)
    }

    fn record_outcome(&self, outcome: &SignalOutcome) -> Result<()> {
        self.outcomes.lock().push(outcome.clone());
        Ok(())
    }
}
