//! Builders for domain primitives used across tests.

use chrono::Utc;

use crate::domain::{
    Candle, Confidence, InstrumentSnapshot, ScoredResult, Signal, SignalDetails, SignalType,
    Ticker,
};

/// Ticker with the given price, 24h turnover and 24h change percent.
pub fn ticker(symbol: &str, price: f64, volume_24h: f64, change_24h_pct: f64) -> Ticker {
    Ticker::new(symbol, price, volume_24h, change_24h_pct)
}

/// `n` identical 5-minute-spaced candles at `close` with `volume`.
pub fn flat_candles(n: usize, close: f64, volume: f64) -> Vec<Candle> {
    (0..n)
        .map(|i| Candle::new(i as i64 * 300_000, close, close, close, close, volume))
        .collect()
}

/// Snapshot with a price and no series.
pub fn snapshot(symbol: &str, price: f64) -> InstrumentSnapshot {
    InstrumentSnapshot::from_ticker(&ticker(symbol, price, 5_000_000.0, 10.0))
}

/// Snapshot whose only signal is a volume tier at `ratio` times average.
///
/// Ratio 5 or more scores 95, 3 or more 75, 2 or more 50.
pub fn volume_spike_snapshot(symbol: &str, price: f64, ratio: f64) -> InstrumentSnapshot {
    let mut snap = snapshot(symbol, price);
    let mut candles = flat_candles(13, price, 100.0);
    if let Some(last) = candles.last_mut() {
        last.volume = 100.0 * ratio;
    }
    snap.candles_5m = candles;
    snap
}

/// Snapshot that fires volume, momentum and breakout signals and scores
/// well above any sensible `min_score`.
pub fn pumping_snapshot(symbol: &str, price: f64) -> InstrumentSnapshot {
    let mut snap = snapshot(symbol, price);

    let mut one_minute = flat_candles(10, price, 10.0);
    let idx = one_minute.len() - 1 - 5;
    one_minute[idx].close = price * 0.90;

    let mut five_minute = flat_candles(24, price, 100.0);
    let idx = five_minute.len() - 1 - 3;
    five_minute[idx].close = price * 0.95;
    if let Some(last) = five_minute.last_mut() {
        last.volume = 600.0;
    }

    let mut fifteen_minute = flat_candles(10, price, 100.0);
    let idx = fifteen_minute.len() - 1 - 4;
    fifteen_minute[idx].close = price * 0.98;

    snap.candles_1m = one_minute;
    snap.candles_5m = five_minute;
    snap.candles_15m = fifteen_minute;
    snap
}

pub fn signal(symbol: &str, signal_type: SignalType, strength: f64) -> Signal {
    Signal::new(
        symbol,
        signal_type,
        strength,
        Utc::now(),
        SignalDetails::Volume {
            ratio: 1.0,
            current: 0.0,
            average: 0.0,
        },
    )
}

/// Result with `signal_count` volume signals at `score` strength.
pub fn scored(symbol: &str, score: f64, signal_count: usize) -> ScoredResult {
    ScoredResult {
        symbol: symbol.to_string(),
        score,
        confidence: Confidence::from_score(score),
        signals: (0..signal_count)
            .map(|_| signal(symbol, SignalType::VolumeSpike, score.min(100.0)))
            .collect(),
        last_price: 1.0,
        volume_24h: 5_000_000.0,
        change_24h: 10.0,
        change_5m: Some(2.0),
        change_15m: Some(4.0),
        change_1h: Some(6.0),
        funding_rate: None,
        scored_at: Utc::now(),
    }
}
