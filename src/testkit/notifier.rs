//! Notifier that records every batch it receives.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::ScoredResult;
use crate::port::Notifier;

/// Thread-safe alert collector for notification assertions in tests.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    batches: Arc<Mutex<Vec<Vec<ScoredResult>>>>,
    startup: Arc<Mutex<Vec<String>>>,
    cooldown: HashSet<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `symbol` as on cooldown.
    #[must_use]
    pub fn with_cooldown(mut self, symbol: &str) -> Self {
        self.cooldown.insert(symbol.to_string());
        self
    }

    pub fn batches(&self) -> Vec<Vec<ScoredResult>> {
        self.batches.lock().clone()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().len()
    }

    /// Every notified symbol, in delivery order.
    pub fn symbols(&self) -> Vec<String> {
        self.batches
            .lock()
            .iter()
            .flatten()
            .map(|r| r.symbol.clone())
            .collect()
    }

    pub fn startup_messages(&self) -> Vec<String> {
        self.startup.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, alerts: &[ScoredResult]) {
        self.batches.lock().push(alerts.to_vec());
    }

    fn is_on_cooldown(&self, symbol: &str) -> bool {
        self.cooldown.contains(symbol)
    }

    fn notify_startup(&self, message: &str) {
        self.startup.lock().push(message.to_string());
    }
}
