//! Three-stage scan funnel.
//!
//! 1. Fetch the ticker batch for the whole universe.
//! 2. Quick filter in memory against the watchlist snapshot.
//! 3. Deep-analyse survivors concurrently, then rank.
//!
//! The watchlist is mutated only here: expired entries are purged once the
//! ticker batch is in, and qualifiers are refreshed after every analysis of
//! the cycle has finished.

mod config;
mod filter;
mod rank;

pub use config::ScannerConfig;
pub use filter::QuickFilter;
pub use rank::{rank, select_for_notification};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use chrono::{DateTime, Duration, Utc};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::{window, ScoredResult, Watchlist};
use crate::error::{ConfigError, Result};
use crate::port::MarketDataClient;

use super::analyzer::{Analysis, DeepAnalyzer};

/// Summary of one scan cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub scan_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Tickers returned by stage 1.
    pub tickers: usize,
    /// Symbols that survived stage 2.
    pub candidates: usize,
    /// Deep analyses that ran to completion.
    pub analyzed: usize,
    /// Deep analyses that could not fetch data or panicked.
    pub failed: usize,
    /// Every result with `score >= min_score`, best first.
    pub qualified: Vec<ScoredResult>,
    /// The subset handed to the notifiers. Filled in by the scan loop.
    pub notified: Vec<ScoredResult>,
    pub watchlist_size: usize,
    #[serde(with = "duration_ms")]
    pub duration: StdDuration,
}

impl CycleReport {
    /// Report for a cycle that produced nothing, e.g. after a stage-1 failure.
    ///
    /// The watchlist is untouched by such a cycle, so its size is carried
    /// through.
    #[must_use]
    pub fn empty(started_at: DateTime<Utc>, watchlist_size: usize) -> Self {
        Self {
            scan_id: Uuid::new_v4(),
            started_at,
            tickers: 0,
            candidates: 0,
            analyzed: 0,
            failed: 0,
            qualified: Vec::new(),
            notified: Vec::new(),
            watchlist_size,
            duration: StdDuration::ZERO,
        }
    }
}

#[allow(clippy::result_large_err)]
fn window_for(field: &'static str, secs: u64) -> Result<Duration> {
    window::seconds(secs).ok_or_else(|| {
        ConfigError::InvalidValue {
            field,
            reason: format!("{secs} seconds is out of range"),
        }
        .into()
    })
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u128(value.as_millis())
    }
}

/// Owns the watchlist and the cached instrument universe.
pub struct Scanner {
    config: ScannerConfig,
    min_score: f64,
    client: Arc<dyn MarketDataClient>,
    analyzer: DeepAnalyzer,
    watchlist: Watchlist,
    universe: HashSet<String>,
    universe_refresh_after: Duration,
    universe_refreshed_at: Option<DateTime<Utc>>,
}

impl Scanner {
    /// Fails when a configured window does not fit a [`Duration`].
    #[allow(clippy::result_large_err)]
    pub fn new(
        config: ScannerConfig,
        min_score: f64,
        client: Arc<dyn MarketDataClient>,
        analyzer: DeepAnalyzer,
    ) -> Result<Self> {
        let ttl = window_for("watchlist_ttl_secs", config.watchlist_ttl_secs)?;
        let refresh_after = window_for("symbol_refresh_secs", config.symbol_refresh_secs)?;
        Ok(Self {
            config,
            min_score,
            client,
            analyzer,
            watchlist: Watchlist::new(ttl),
            universe: HashSet::new(),
            universe_refresh_after: refresh_after,
            universe_refreshed_at: None,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ScannerConfig {
        &self.config
    }

    #[must_use]
    pub const fn min_score(&self) -> f64 {
        self.min_score
    }

    #[must_use]
    pub const fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    #[must_use]
    pub fn universe_size(&self) -> usize {
        self.universe.len()
    }

    /// Run one cycle at the current time.
    pub async fn scan(&mut self) -> Result<CycleReport> {
        self.scan_at(Utc::now()).await
    }

    /// Run one cycle as of `now`.
    ///
    /// Returns `Err` only when the stage-1 ticker fetch fails; the watchlist
    /// is left untouched in that case.
    pub async fn scan_at(&mut self, now: DateTime<Utc>) -> Result<CycleReport> {
        let timer = Instant::now();
        self.refresh_universe(now).await;

        let tickers = self.client.get_ticker_batch().await?;
        let tickers: Vec<_> = if self.universe.is_empty() {
            tickers
        } else {
            tickers
                .into_iter()
                .filter(|t| self.universe.contains(&t.symbol))
                .collect()
        };

        let purged = self.watchlist.purge_expired(now);
        if purged > 0 {
            debug!(purged, "Expired watchlist entries removed");
        }
        let watching = self.watchlist.snapshot(now);

        let candidates: Vec<String> = QuickFilter::from_config(&self.config)
            .apply(&tickers, &watching)
            .into_iter()
            .map(|t| t.symbol.clone())
            .collect();
        debug!(
            tickers = tickers.len(),
            candidates = candidates.len(),
            watching = watching.len(),
            "Quick filter complete"
        );

        let candidate_count = candidates.len();
        let (results, analyzed, failed) = self.analyze_all(candidates).await;
        let qualified = rank(results, self.min_score);

        for result in &qualified {
            self.watchlist.refresh(&result.symbol, now);
        }

        let report = CycleReport {
            scan_id: Uuid::new_v4(),
            started_at: now,
            tickers: tickers.len(),
            candidates: candidate_count,
            analyzed,
            failed,
            qualified,
            notified: Vec::new(),
            watchlist_size: self.watchlist.len(),
            duration: timer.elapsed(),
        };
        info!(
            scan_id = %report.scan_id,
            tickers = report.tickers,
            candidates = report.candidates,
            analyzed = report.analyzed,
            failed = report.failed,
            qualified = report.qualified.len(),
            watchlist = report.watchlist_size,
            elapsed_ms = report.duration.as_millis() as u64,
            "Scan cycle complete"
        );
        Ok(report)
    }

    async fn refresh_universe(&mut self, now: DateTime<Utc>) {
        let due = self
            .universe_refreshed_at
            .map_or(true, |at| now - at >= self.universe_refresh_after);
        if !due {
            return;
        }

        match self.client.list_instruments().await {
            Ok(symbols) => {
                info!(instruments = symbols.len(), "Instrument universe refreshed");
                self.universe = symbols.into_iter().collect();
                self.universe_refreshed_at = Some(now);
            }
            Err(e) => {
                warn!(error = %e, cached = self.universe.len(), "Instrument list refresh failed");
            }
        }
    }

    /// Stage 3. Bounded by `max_workers`; returns once every task has
    /// finished. Results come back in candidate order.
    async fn analyze_all(&self, candidates: Vec<String>) -> (Vec<ScoredResult>, usize, usize) {
        let workers = self.config.max_workers.max(1);
        let mut outcomes: Vec<(usize, String, Option<Analysis>)> =
            stream::iter(candidates.into_iter().enumerate())
                .map(|(index, symbol)| {
                    let analyzer = self.analyzer.clone();
                    async move {
                        let task_symbol = symbol.clone();
                        let handle =
                            tokio::spawn(async move { analyzer.analyze(&task_symbol).await });
                        match handle.await {
                            Ok(analysis) => (index, symbol, Some(analysis)),
                            Err(e) => {
                                error!(symbol = %symbol, error = %e, "Deep analysis task failed");
                                (index, symbol, None)
                            }
                        }
                    }
                })
                .buffer_unordered(workers)
                .collect()
                .await;
        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut results = Vec::new();
        let mut analyzed = 0;
        let mut failed = 0;
        for (_, _, outcome) in outcomes {
            match outcome {
                Some(Analysis::Scored(result)) => {
                    analyzed += 1;
                    results.push(result);
                }
                Some(Analysis::Quiet) => analyzed += 1,
                Some(Analysis::Unavailable) | None => failed += 1,
            }
        }
        (results, analyzed, failed)
    }
}
