//! Drives scan cycles and forwards alerts.
//!
//! Cycles never overlap: the loop sleeps for the configured interval after a
//! cycle completes. On shutdown an in-flight cycle is dropped; its spawned
//! analyses are detached and nothing partial reaches the watchlist or the
//! notifiers.
//!
//! With a tracker attached, every journaled alert is handed to it and its
//! background task runs for as long as `run_until` does.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::port::{Notifier, SignalJournal};

use super::scanner::{select_for_notification, CycleReport, Scanner};
use super::tracker::OutcomeTracker;

pub struct ScanLoop {
    scanner: Scanner,
    notifier: Arc<dyn Notifier>,
    journal: Arc<dyn SignalJournal>,
    tracker: Option<Arc<OutcomeTracker>>,
    interval: Duration,
}

impl ScanLoop {
    #[must_use]
    pub fn new(scanner: Scanner, notifier: Arc<dyn Notifier>, journal: Arc<dyn SignalJournal>) -> Self {
        let interval = Duration::from_secs(scanner.config().scan_interval_secs);
        Self {
            scanner,
            notifier,
            journal,
            tracker: None,
            interval,
        }
    }

    #[must_use]
    pub fn with_tracker(mut self, tracker: Arc<OutcomeTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Override the pause between cycles.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub const fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Run a single cycle: scan, select, notify, journal, track.
    ///
    /// A stage-1 failure is logged and yields an empty report.
    pub async fn run_once(&mut self) -> CycleReport {
        let started_at = Utc::now();
        let mut report = match self.scanner.scan().await {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "Scan cycle skipped");
                return CycleReport::empty(started_at, self.scanner.watchlist().len());
            }
        };

        let limit = self.scanner.config().max_notifications;
        let notifier = Arc::clone(&self.notifier);
        report.notified =
            select_for_notification(&report.qualified, limit, |symbol| notifier.is_on_cooldown(symbol));

        if report.notified.is_empty() {
            return report;
        }

        self.notifier.notify(&report.notified);
        let alerted_at = Utc::now();
        for result in &report.notified {
            match self.journal.record(result) {
                Ok(alert_id) => {
                    if let Some(tracker) = &self.tracker {
                        tracker.track(alert_id, result, alerted_at);
                    }
                }
                Err(e) => warn!(symbol = %result.symbol, error = %e, "Failed to journal alert"),
            }
        }
        report
    }

    /// Run cycles until `shutdown` resolves.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let config = self.scanner.config();
        let startup = format!(
            "Scanner started: every {}s, {} workers, min score {}",
            self.interval.as_secs(),
            config.max_workers,
            self.scanner.min_score()
        );
        self.notifier.notify_startup(&startup);
        info!(
            interval_secs = self.interval.as_secs(),
            max_workers = config.max_workers,
            min_score = self.scanner.min_score(),
            "Scan loop started"
        );
        let tracking = self.tracker.as_ref().map(|t| Arc::clone(t).spawn());

        loop {
            tokio::select! {
                _ = self.run_once() => {}
                () = &mut shutdown => {
                    info!("Shutdown requested during cycle");
                    break;
                }
            }

            tokio::select! {
                () = tokio::time::sleep(self.interval) => {}
                () = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        if let Some(handle) = tracking {
            handle.abort();
        }
    }
}
