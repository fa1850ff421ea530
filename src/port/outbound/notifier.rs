//! Notifier port for ranked alerts.
//!
//! Delivery is best effort. The scanner hands over the selected alerts once
//! per cycle and never retries.

use tracing::info;

use crate::domain::ScoredResult;

/// Trait for alert sinks.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - `notify` must return quickly; spawn a task for slow I/O
/// - Cooldown bookkeeping belongs to the implementation; the scanner only
///   queries it through [`Notifier::is_on_cooldown`]
pub trait Notifier: Send + Sync {
    /// Deliver ranked alerts, best first.
    fn notify(&self, alerts: &[ScoredResult]);

    /// Whether an alert for `symbol` would currently be suppressed.
    fn is_on_cooldown(&self, _symbol: &str) -> bool {
        false
    }

    /// Called once when the scan loop starts.
    fn notify_startup(&self, _message: &str) {}
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts alerts to all registered notifiers. A symbol is on cooldown if
/// any member reports it.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, alerts: &[ScoredResult]) {
        for notifier in &self.notifiers {
            notifier.notify(alerts);
        }
    }

    fn is_on_cooldown(&self, symbol: &str) -> bool {
        self.notifiers.iter().any(|n| n.is_on_cooldown(symbol))
    }

    fn notify_startup(&self, message: &str) {
        for notifier in &self.notifiers {
            notifier.notify_startup(message);
        }
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _alerts: &[ScoredResult]) {}
}

/// A logging notifier that logs alerts via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, alerts: &[ScoredResult]) {
        for (rank, alert) in alerts.iter().enumerate() {
            let top = alert
                .signals
                .first()
                .map_or("", |s| s.signal_type.as_str());
            info!(
                rank = rank + 1,
                symbol = %alert.symbol,
                score = format!("{:.1}", alert.score),
                confidence = %alert.confidence,
                signals = alert.signal_count(),
                top_signal = top,
                price = alert.last_price,
                "Pump alert"
            );
        }
    }

    fn notify_startup(&self, message: &str) {
        info!(message, "Scanner started");
    }
}
