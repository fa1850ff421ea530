//! Market data types shared by the exchange client and the detectors.
//!
//! Every series is ordered oldest to newest. Prices and sizes are plain
//! `f64`: the scanner only ever computes ratios and percentages from them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candle timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
}

impl Timeframe {
    /// All timeframes, shortest first.
    pub const ALL: [Self; 4] = [Self::M1, Self::M5, Self::M15, Self::H1];

    /// Kline interval parameter understood by the exchange.
    #[must_use]
    pub const fn interval(self) -> &'static str {
        match self {
            Self::M1 => "1",
            Self::M5 => "5",
            Self::M15 => "15",
            Self::H1 => "60",
        }
    }

    #[must_use]
    pub const fn minutes(self) -> u32 {
        match self {
            Self::M1 => 1,
            Self::M5 => 5,
            Self::M15 => 15,
            Self::H1 => 60,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::H1 => "1h",
        };
        f.write_str(label)
    }
}

/// One OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time in milliseconds since the epoch.
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    #[must_use]
    pub const fn new(open_time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// A single price level in the order book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: f64,
    pub size: f64,
}

impl BookLevel {
    #[must_use]
    pub const fn new(price: f64, size: f64) -> Self {
        Self { price, size }
    }

    /// Quote-currency value resting at this level.
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.price * self.size
    }
}

/// Top-of-book snapshot. Both sides are ordered best level first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
}

impl OrderBook {
    #[must_use]
    pub fn new(bids: Vec<BookLevel>, asks: Vec<BookLevel>) -> Self {
        Self { bids, asks }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Total bid notional over the best `depth` levels.
    #[must_use]
    pub fn bid_notional(&self, depth: usize) -> f64 {
        self.bids.iter().take(depth).map(BookLevel::notional).sum()
    }

    /// Total ask notional over the best `depth` levels.
    #[must_use]
    pub fn ask_notional(&self, depth: usize) -> f64 {
        self.asks.iter().take(depth).map(BookLevel::notional).sum()
    }

    /// The bid level with the largest notional within `depth`.
    #[must_use]
    pub fn largest_bid(&self, depth: usize) -> Option<BookLevel> {
        self.bids
            .iter()
            .take(depth)
            .copied()
            .max_by(|a, b| a.notional().total_cmp(&b.notional()))
    }
}

/// A timestamped scalar, used for open interest and funding history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: i64,
    pub value: f64,
}

impl SeriesPoint {
    #[must_use]
    pub const fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// 24h summary for one instrument, as returned by the batch ticker call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    pub last_price: f64,
    /// 24h turnover in quote currency.
    pub volume_24h: f64,
    /// 24h change in percent (5.0 means +5%).
    pub change_24h_pct: f64,
    pub funding_rate: Option<f64>,
    pub open_interest_value: Option<f64>,
}

impl Ticker {
    #[must_use]
    pub fn new(symbol: impl Into<String>, last_price: f64, volume_24h: f64, change_24h_pct: f64) -> Self {
        Self {
            symbol: symbol.into(),
            last_price,
            volume_24h,
            change_24h_pct,
            funding_rate: None,
            open_interest_value: None,
        }
    }
}

/// Everything the detectors see for one instrument in one cycle.
///
/// Missing sub-resources are represented as empty collections so detectors
/// that depend on them simply do not fire.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSnapshot {
    pub symbol: String,
    pub last_price: f64,
    pub volume_24h: f64,
    pub change_24h_pct: f64,
    pub candles_1m: Vec<Candle>,
    pub candles_5m: Vec<Candle>,
    pub candles_15m: Vec<Candle>,
    pub candles_1h: Vec<Candle>,
    pub order_book: OrderBook,
    pub open_interest: Vec<SeriesPoint>,
    /// Live predicted rate from the ticker; not yet settled.
    pub funding_rate: Option<f64>,
    /// Settled rates, oldest first.
    pub funding_rates: Vec<SeriesPoint>,
    pub captured_at: DateTime<Utc>,
}

impl InstrumentSnapshot {
    /// An empty snapshot carrying only the ticker fields.
    #[must_use]
    pub fn from_ticker(ticker: &Ticker) -> Self {
        Self {
            symbol: ticker.symbol.clone(),
            last_price: ticker.last_price,
            volume_24h: ticker.volume_24h,
            change_24h_pct: ticker.change_24h_pct,
            candles_1m: Vec::new(),
            candles_5m: Vec::new(),
            candles_15m: Vec::new(),
            candles_1h: Vec::new(),
            order_book: OrderBook::default(),
            open_interest: Vec::new(),
            funding_rate: ticker.funding_rate,
            funding_rates: Vec::new(),
            captured_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn candles(&self, timeframe: Timeframe) -> &[Candle] {
        match timeframe {
            Timeframe::M1 => &self.candles_1m,
            Timeframe::M5 => &self.candles_5m,
            Timeframe::M15 => &self.candles_15m,
            Timeframe::H1 => &self.candles_1h,
        }
    }

    pub fn set_candles(&mut self, timeframe: Timeframe, candles: Vec<Candle>) {
        match timeframe {
            Timeframe::M1 => self.candles_1m = candles,
            Timeframe::M5 => self.candles_5m = candles,
            Timeframe::M15 => self.candles_15m = candles,
            Timeframe::H1 => self.candles_1h = candles,
        }
    }

    /// Percent change from the close `periods` bars before the latest bar to
    /// the last traded price.
    ///
    /// Returns `None` when the series is too short or the reference close is
    /// not a positive finite number.
    #[must_use]
    pub fn price_change_pct(&self, timeframe: Timeframe, periods: usize) -> Option<f64> {
        let candles = self.candles(timeframe);
        if periods == 0 || candles.len() <= periods {
            return None;
        }
        let reference = candles[candles.len() - 1 - periods].close;
        if !reference.is_finite() || reference <= 0.0 || !self.last_price.is_finite() {
            return None;
        }
        Some((self.last_price - reference) / reference * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(n: usize, close: f64) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle::new(i as i64 * 60_000, close, close, close, close, 10.0))
            .collect()
    }

    #[test]
    fn timeframe_maps_to_exchange_intervals() {
        let intervals: Vec<_> = Timeframe::ALL.iter().map(|t| t.interval()).collect();
        assert_eq!(intervals, vec!["1", "5", "15", "60"]);
        assert_eq!(Timeframe::H1.to_string(), "1h");
    }

    #[test]
    fn book_notional_respects_depth() {
        let book = OrderBook::new(
            vec![BookLevel::new(10.0, 2.0), BookLevel::new(9.0, 100.0)],
            vec![BookLevel::new(11.0, 1.0)],
        );
        assert_eq!(book.bid_notional(1), 20.0);
        assert_eq!(book.bid_notional(10), 920.0);
        assert_eq!(book.ask_notional(10), 11.0);
        assert_eq!(book.largest_bid(10), Some(BookLevel::new(9.0, 100.0)));
        assert_eq!(book.largest_bid(1), Some(BookLevel::new(10.0, 2.0)));
    }

    #[test]
    fn price_change_uses_reference_close() {
        let mut snapshot = InstrumentSnapshot::from_ticker(&Ticker::new("ABCUSDT", 110.0, 0.0, 0.0));
        let mut candles = flat(6, 100.0);
        candles[0].close = 50.0;
        snapshot.set_candles(Timeframe::M1, candles);

        assert_eq!(snapshot.price_change_pct(Timeframe::M1, 5), Some(120.0));
        assert_eq!(snapshot.price_change_pct(Timeframe::M1, 1), Some(10.0));
    }

    #[test]
    fn price_change_is_none_when_series_too_short() {
        let mut snapshot = InstrumentSnapshot::from_ticker(&Ticker::new("ABCUSDT", 110.0, 0.0, 0.0));
        snapshot.set_candles(Timeframe::M5, flat(3, 100.0));

        assert_eq!(snapshot.price_change_pct(Timeframe::M5, 3), None);
        assert_eq!(snapshot.price_change_pct(Timeframe::M5, 0), None);
        assert_eq!(snapshot.price_change_pct(Timeframe::H1, 1), None);
    }

    #[test]
    fn snapshot_keeps_live_funding_rate() {
        let ticker = Ticker {
            funding_rate: Some(0.0003),
            ..Ticker::new("ABCUSDT", 1.0, 0.0, 0.0)
        };
        let snapshot = InstrumentSnapshot::from_ticker(&ticker);
        assert_eq!(snapshot.funding_rate, Some(0.0003));
        assert!(snapshot.funding_rates.is_empty());
    }

    #[test]
    fn price_change_rejects_zero_reference() {
        let mut snapshot = InstrumentSnapshot::from_ticker(&Ticker::new("ABCUSDT", 1.0, 0.0, 0.0));
        snapshot.set_candles(Timeframe::M1, flat(3, 0.0));
        assert_eq!(snapshot.price_change_pct(Timeframe::M1, 2), None);
    }
}
