//! Deep analysis of a single symbol.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{ScoredResult, Timeframe};
use crate::port::MarketDataClient;

use super::detector::{DetectorRegistry, Horizons};
use super::scorer::{DisplayFields, Scorer};

/// Outcome of analysing one symbol.
#[derive(Debug, Clone)]
pub enum Analysis {
    /// At least one signal fired.
    Scored(ScoredResult),
    /// Data was available but nothing fired.
    Quiet,
    /// The snapshot could not be fetched.
    Unavailable,
}

impl Analysis {
    #[must_use]
    pub fn into_result(self) -> Option<ScoredResult> {
        match self {
            Self::Scored(result) => Some(result),
            Self::Quiet | Self::Unavailable => None,
        }
    }
}

/// Fetches a multi-timeframe snapshot, runs the detectors and scores the
/// signals. Cheap to clone; every stage-3 task holds its own handle.
#[derive(Clone)]
pub struct DeepAnalyzer {
    client: Arc<dyn MarketDataClient>,
    detectors: Arc<DetectorRegistry>,
    scorer: Arc<Scorer>,
}

impl DeepAnalyzer {
    #[must_use]
    pub fn new(
        client: Arc<dyn MarketDataClient>,
        detectors: Arc<DetectorRegistry>,
        scorer: Arc<Scorer>,
    ) -> Self {
        Self {
            client,
            detectors,
            scorer,
        }
    }

    pub async fn analyze(&self, symbol: &str) -> Analysis {
        let snapshot = match self.client.get_snapshot(symbol, &Timeframe::ALL).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(symbol, error = %e, transient = e.is_transient(), "Snapshot unavailable");
                return Analysis::Unavailable;
            }
        };

        let signals = self.detectors.detect_all(&snapshot);
        if signals.is_empty() {
            debug!(symbol, "No signals");
            return Analysis::Quiet;
        }

        let display = DisplayFields {
            last_price: snapshot.last_price,
            volume_24h: snapshot.volume_24h,
            change_24h: snapshot.change_24h_pct,
            horizons: Horizons::of(&snapshot),
            funding_rate: snapshot
                .funding_rate
                .or_else(|| snapshot.funding_rates.last().map(|p| p.value)),
        };
        let result = self.scorer.build(symbol, signals, display);
        debug!(
            symbol,
            score = result.score,
            signals = result.signal_count(),
            "Scored"
        );
        Analysis::Scored(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::detector::DetectorConfig;
    use crate::testkit::client::ScriptedClient;
    use crate::testkit::domain::{pumping_snapshot, snapshot};

    fn analyzer(client: ScriptedClient) -> DeepAnalyzer {
        DeepAnalyzer::new(
            Arc::new(client),
            Arc::new(DetectorRegistry::with_defaults(&DetectorConfig::default())),
            Arc::new(Scorer::default()),
        )
    }

    #[tokio::test]
    async fn quiet_snapshot_produces_no_result() {
        let client = ScriptedClient::new().with_snapshot(snapshot("QUIETUSDT", 1.0));
        let analysis = analyzer(client).analyze("QUIETUSDT").await;
        assert!(matches!(analysis, Analysis::Quiet));
        assert!(analysis.into_result().is_none());
    }

    #[tokio::test]
    async fn pumping_snapshot_is_scored() {
        let client = ScriptedClient::new().with_snapshot(pumping_snapshot("PUMPUSDT", 1.0));
        let Analysis::Scored(result) = analyzer(client).analyze("PUMPUSDT").await else {
            panic!("expected a scored result");
        };
        assert_eq!(result.symbol, "PUMPUSDT");
        assert!(result.signal_count() >= 2);
        assert!(result.score > 0.0);
        assert!(result.change_5m.is_some());
    }

    #[tokio::test]
    async fn fetch_failure_is_unavailable() {
        let client = ScriptedClient::new().failing_snapshot("DEADUSDT");
        let analysis = analyzer(client).analyze("DEADUSDT").await;
        assert!(matches!(analysis, Analysis::Unavailable));
    }

    #[tokio::test]
    async fn unknown_symbol_is_unavailable() {
        let analysis = analyzer(ScriptedClient::new()).analyze("GHOSTUSDT").await;
        assert!(matches!(analysis, Analysis::Unavailable));
    }
}
