//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::adapter::outbound::bybit::BybitClient;
use crate::adapter::outbound::journal::{pending_outcomes, read_all, JsonlJournal};
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{TelegramConfig, TelegramNotifier};
use crate::application::{DeepAnalyzer, DetectorRegistry, OutcomeTracker, ScanLoop, Scanner, Scorer};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::journal::NullJournal;
use crate::port::{LogNotifier, MarketDataClient, NotifierRegistry, SignalJournal};

/// Build notifier registry from configuration.
///
/// Always includes the log notifier. Adds Telegram when enabled and the
/// credentials are present in the environment.
#[cfg(feature = "telegram")]
#[allow(clippy::result_large_err)]
pub fn build_notifier_registry(config: &Config) -> Result<NotifierRegistry> {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));

    if config.telegram.enabled {
        if let Some(tg_config) = TelegramConfig::from_env() {
            let tg_config = tg_config.with_cooldown_secs(config.telegram.cooldown_secs);
            registry.register(Box::new(TelegramNotifier::new(tg_config)?));
            info!(
                cooldown_secs = config.telegram.cooldown_secs,
                "Telegram notifier enabled"
            );
        } else {
            warn!("Telegram enabled but TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set");
        }
    }

    Ok(registry)
}

/// Build notifier registry from configuration (non-telegram variant).
#[cfg(not(feature = "telegram"))]
#[allow(clippy::result_large_err)]
pub fn build_notifier_registry(config: &Config) -> Result<NotifierRegistry> {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    if config.telegram.enabled {
        warn!("Telegram enabled but the binary was built without the `telegram` feature");
    }
    Ok(registry)
}

/// Open the configured journal, or a no-op journal when disabled.
#[allow(clippy::result_large_err)]
pub fn build_journal(config: &Config) -> Result<Arc<dyn SignalJournal>> {
    if !config.journal.enabled {
        return Ok(Arc::new(NullJournal));
    }
    let journal = JsonlJournal::open(&config.journal.path)?;
    info!(path = %journal.path().display(), "Signal journal enabled");
    Ok(Arc::new(journal))
}

/// Wire scanner, analyzer and detectors around an existing client.
#[allow(clippy::result_large_err)]
pub fn build_scanner(config: &Config, client: Arc<dyn MarketDataClient>) -> Result<Scanner> {
    let detectors = Arc::new(DetectorRegistry::with_defaults(&config.detector));
    let scorer = Arc::new(Scorer::new(config.scoring.signal_weights()?));
    let analyzer = DeepAnalyzer::new(Arc::clone(&client), detectors, scorer);
    Scanner::new(
        config.scanner.clone(),
        config.scoring.min_score,
        client,
        analyzer,
    )
}

/// Outcome tracker writing to `journal`, or `None` when tracking is off.
///
/// Tracking needs the journal: outcomes reference journaled alert ids, and
/// alerts still open from a previous run are resumed from the file.
#[allow(clippy::result_large_err)]
pub fn build_tracker(
    config: &Config,
    client: Arc<dyn MarketDataClient>,
    journal: Arc<dyn SignalJournal>,
) -> Result<Option<Arc<OutcomeTracker>>> {
    if !config.tracker.enabled {
        return Ok(None);
    }
    if !config.journal.enabled {
        warn!("Outcome tracking needs the journal; tracking disabled");
        return Ok(None);
    }

    let tracker = OutcomeTracker::new(&config.tracker, client, journal)?;
    match read_all(&config.journal.path) {
        Ok(entries) => tracker.resume(pending_outcomes(&entries, Utc::now(), tracker.horizon())),
        Err(e) => warn!(error = %e, "Could not read journal to resume outcome tracking"),
    }
    info!(
        poll_interval_secs = config.tracker.poll_interval_secs,
        success_threshold_pct = config.tracker.success_threshold_pct,
        "Outcome tracking enabled"
    );
    Ok(Some(Arc::new(tracker)))
}

/// Build the full scan loop against the live exchange.
#[allow(clippy::result_large_err)]
pub fn build_scan_loop(config: &Config) -> Result<ScanLoop> {
    let client: Arc<dyn MarketDataClient> = Arc::new(BybitClient::from_config(&config.exchange)?);
    let scanner = build_scanner(config, Arc::clone(&client))?;
    let notifier = Arc::new(build_notifier_registry(config)?);
    let journal = build_journal(config)?;
    let tracker = build_tracker(config, client, Arc::clone(&journal))?;

    info!(
        max_workers = config.scanner.max_workers,
        min_score = config.scoring.min_score,
        notifiers = notifier.len(),
        "Scanner assembled"
    );
    let scan_loop = ScanLoop::new(scanner, notifier, journal);
    Ok(match tracker {
        Some(tracker) => scan_loop.with_tracker(tracker),
        None => scan_loop,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::client::ScriptedClient;

    #[test]
    fn registry_always_has_log_notifier() {
        let registry = build_notifier_registry(&Config::default()).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn disabled_journal_is_null() {
        let mut config = Config::default();
        config.journal.enabled = false;
        config.journal.path = "/nonexistent/dir/signals.jsonl".into();
        assert!(build_journal(&config).is_ok());
    }

    #[test]
    fn journal_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.journal.path = dir.path().join("data/signals.jsonl");
        build_journal(&config).unwrap();
        assert!(config.journal.path.exists());
    }

    #[test]
    fn scanner_uses_scoring_section() {
        let config = Config::parse_toml("[scoring]\nmin_score = 72\n").unwrap();
        let scanner = build_scanner(&config, Arc::new(ScriptedClient::new())).unwrap();
        assert_eq!(scanner.min_score(), 72.0);
        assert_eq!(scanner.config().max_workers, 10);
    }

    #[test]
    fn tracker_requires_enabled_journal() {
        let client: Arc<dyn MarketDataClient> = Arc::new(ScriptedClient::new());
        let mut config = Config::default();
        config.journal.enabled = false;
        let tracker = build_tracker(&config, Arc::clone(&client), Arc::new(NullJournal)).unwrap();
        assert!(tracker.is_none());

        let mut config = Config::default();
        config.tracker.enabled = false;
        assert!(build_tracker(&config, client, Arc::new(NullJournal)).unwrap().is_none());
    }

    #[test]
    fn tracker_resumes_open_alerts_from_journal() {
        use crate::testkit::domain::scored;

        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.journal.path = dir.path().join("signals.jsonl");
        let journal = build_journal(&config).unwrap();
        journal.record(&scored("PEPEUSDT", 80.0, 1)).unwrap();
        journal.record(&scored("WIFUSDT", 70.0, 1)).unwrap();

        let tracker = build_tracker(&config, Arc::new(ScriptedClient::new()), journal)
            .unwrap()
            .unwrap();
        assert_eq!(tracker.pending_len(), 2);
    }

    #[test]
    fn scan_loop_builds_against_default_exchange() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.journal.path = dir.path().join("signals.jsonl");
        assert!(build_scan_loop(&config).is_ok());
    }
}
