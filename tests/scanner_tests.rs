//! End-to-end tests for the three-stage scan funnel.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pumpwatch::application::Scanner;
use pumpwatch::domain::Ticker;
use pumpwatch::infrastructure::bootstrap::build_scanner;
use pumpwatch::infrastructure::Config;
use pumpwatch::testkit::client::ScriptedClient;
use pumpwatch::testkit::domain::{pumping_snapshot, snapshot, ticker, volume_spike_snapshot};

const CANDIDATES: usize = 25;
const UNIVERSE: usize = 200;

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
}

fn candidate(i: usize) -> String {
    format!("HOT{i:02}USDT")
}

/// 25 liquid movers followed by 175 thin ones the quick filter drops.
fn market() -> Vec<Ticker> {
    let mut tickers: Vec<Ticker> = (0..CANDIDATES)
        .map(|i| ticker(&candidate(i), 1.0, 5_000_000.0, 10.0))
        .collect();
    tickers.extend(
        (CANDIDATES..UNIVERSE).map(|i| ticker(&format!("THIN{i:03}USDT"), 1.0, 100_000.0, 10.0)),
    );
    tickers
}

/// Five pumps, five 6x spikes, five 4x spikes, five 2.5x spikes, five quiet.
fn scripted_market() -> ScriptedClient {
    let mut client = ScriptedClient::new()
        .with_tickers(market())
        .with_delay(Duration::from_millis(20));
    for i in 0..CANDIDATES {
        let symbol = candidate(i);
        let snap = match i / 5 {
            0 => pumping_snapshot(&symbol, 1.0),
            1 => volume_spike_snapshot(&symbol, 1.0, 6.0),
            2 => volume_spike_snapshot(&symbol, 1.0, 4.0),
            3 => volume_spike_snapshot(&symbol, 1.0, 2.5),
            _ => snapshot(&symbol, 1.0),
        };
        client = client.with_snapshot(snap);
    }
    client
}

fn scanner(client: Arc<ScriptedClient>) -> Scanner {
    build_scanner(&Config::default(), client).expect("default config builds")
}

#[tokio::test]
async fn funnel_filters_bounds_and_ranks() {
    let client = Arc::new(scripted_market());
    let mut scanner = scanner(client.clone());

    let report = scanner.scan_at(t0()).await.expect("scan succeeds");

    assert_eq!(report.tickers, UNIVERSE);
    assert_eq!(report.candidates, CANDIDATES);
    assert_eq!(report.analyzed, CANDIDATES);
    assert_eq!(report.failed, 0);
    assert_eq!(client.snapshot_calls(), CANDIDATES);

    let in_flight = client.max_in_flight();
    assert!(in_flight <= 10, "concurrency bound exceeded: {in_flight}");
    assert!(in_flight > 1, "analyses ran sequentially");

    // Pumps, 6x and 4x spikes qualify; 2.5x scores 50 and quiet scores nothing.
    assert_eq!(report.qualified.len(), 15);
    assert!(report.qualified.iter().all(|r| r.score >= 65.0));
    assert!(report
        .qualified
        .windows(2)
        .all(|pair| pair[0].score >= pair[1].score));
    for i in 0..5 {
        let symbol = candidate(i);
        assert!(report.qualified.iter().any(|r| r.symbol == symbol));
    }
    for i in 15..CANDIDATES {
        let symbol = candidate(i);
        assert!(report.qualified.iter().all(|r| r.symbol != symbol));
    }

    assert_eq!(scanner.watchlist().len(), 15);
    assert_eq!(report.watchlist_size, 15);
}

#[tokio::test]
async fn panicking_analysis_is_counted_as_failed() {
    let client = Arc::new(
        ScriptedClient::new()
            .with_ticker(ticker("PUMPUSDT", 1.0, 5_000_000.0, 12.0))
            .with_ticker(ticker("BOOMUSDT", 1.0, 5_000_000.0, 12.0))
            .with_snapshot(pumping_snapshot("PUMPUSDT", 1.0))
            .panicking_snapshot("BOOMUSDT"),
    );
    let mut scanner = scanner(client);

    let report = scanner.scan_at(t0()).await.expect("scan succeeds");
    assert_eq!(report.candidates, 2);
    assert_eq!(report.analyzed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.qualified.len(), 1);
    assert_eq!(report.qualified[0].symbol, "PUMPUSDT");
}

#[tokio::test]
async fn lower_min_score_admits_weaker_spikes() {
    let client = Arc::new(scripted_market());
    let mut config = Config::default();
    config.scoring.min_score = 50.0;
    let mut scanner = build_scanner(&config, client).expect("config builds");

    let report = scanner.scan_at(t0()).await.expect("scan succeeds");
    assert_eq!(report.qualified.len(), 20);
}

#[tokio::test]
async fn weights_change_ranking_scores() {
    let client = Arc::new(
        ScriptedClient::new()
            .with_ticker(ticker("SPIKEUSDT", 1.0, 5_000_000.0, 12.0))
            .with_snapshot(volume_spike_snapshot("SPIKEUSDT", 1.0, 4.0)),
    );
    let config = Config::parse_toml("[scoring.weights]\nVOLUME_SPIKE = 0.5\n").expect("valid config");
    let mut scanner = build_scanner(&config, client).expect("config builds");

    let report = scanner.scan_at(t0()).await.expect("scan succeeds");
    assert!(report.qualified.is_empty(), "half-weighted 75 should fall below 65");
}
