//! In-memory [`MarketDataClient`] with scripted data and failures.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{InstrumentSnapshot, Ticker, Timeframe};
use crate::error::{Error, Result};
use crate::port::MarketDataClient;

/// Scripted market data client.
///
/// Tracks how many snapshot fetches are in flight so tests can assert the
/// stage-3 concurrency bound.
#[derive(Default)]
pub struct ScriptedClient {
    instruments: Mutex<Vec<String>>,
    tickers: Mutex<Vec<Ticker>>,
    snapshots: Mutex<HashMap<String, InstrumentSnapshot>>,
    failing: Mutex<HashSet<String>>,
    panicking: Mutex<HashSet<String>>,
    ticker_failures: AtomicUsize,
    instrument_failures: AtomicUsize,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    snapshot_calls: AtomicUsize,
    ticker_calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_instruments(self, symbols: Vec<String>) -> Self {
        *self.instruments.lock() = symbols;
        self
    }

    #[must_use]
    pub fn with_ticker(self, ticker: Ticker) -> Self {
        self.tickers.lock().push(ticker);
        self
    }

    #[must_use]
    pub fn with_tickers(self, tickers: Vec<Ticker>) -> Self {
        self.tickers.lock().extend(tickers);
        self
    }

    #[must_use]
    pub fn with_snapshot(self, snapshot: InstrumentSnapshot) -> Self {
        self.set_snapshot(snapshot);
        self
    }

    /// Snapshot fetches for `symbol` fail with a transient error.
    #[must_use]
    pub fn failing_snapshot(self, symbol: &str) -> Self {
        self.failing.lock().insert(symbol.to_string());
        self
    }

    /// Snapshot fetches for `symbol` panic inside the task.
    #[must_use]
    pub fn panicking_snapshot(self, symbol: &str) -> Self {
        self.panicking.lock().insert(symbol.to_string());
        self
    }

    /// Every snapshot fetch sleeps for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_tickers(&self, tickers: Vec<Ticker>) {
        *self.tickers.lock() = tickers;
    }

    pub fn set_snapshot(&self, snapshot: InstrumentSnapshot) {
        self.snapshots
            .lock()
            .insert(snapshot.symbol.clone(), snapshot);
    }

    /// The next `n` ticker batch calls fail.
    pub fn fail_ticker_batches(&self, n: usize) {
        self.ticker_failures.store(n, Ordering::SeqCst);
    }

    /// The next `n` instrument list calls fail.
    pub fn fail_instrument_lists(&self, n: usize) {
        self.instrument_failures.store(n, Ordering::SeqCst);
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn snapshot_calls(&self) -> usize {
        self.snapshot_calls.load(Ordering::SeqCst)
    }

    pub fn ticker_batch_calls(&self) -> usize {
        self.ticker_calls.load(Ordering::SeqCst)
    }
}

/// Decrement a counter when one scripted failure is consumed.
fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[async_trait]
impl MarketDataClient for ScriptedClient {
    async fn list_instruments(&self) -> Result<Vec<String>> {
        if take_failure(&self.instrument_failures) {
            return Err(Error::Connection("scripted instrument failure".into()));
        }
        Ok(self.instruments.lock().clone())
    }

    async fn get_ticker_batch(&self) -> Result<Vec<Ticker>> {
        self.ticker_calls.fetch_add(1, Ordering::SeqCst);
        if take_failure(&self.ticker_failures) {
            return Err(Error::Connection("scripted ticker failure".into()));
        }
        Ok(self.tickers.lock().clone())
    }

    async fn get_snapshot(&self, symbol: &str, _timeframes: &[Timeframe]) -> Result<InstrumentSnapshot> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panicking.lock().contains(symbol) {
            panic!("scripted panic for {symbol}");
        }
        if self.failing.lock().contains(symbol) {
            return Err(Error::Transient(format!("scripted timeout for {symbol}")));
        }
        self.snapshots
            .lock()
            .get(symbol)
            .cloned()
            .ok_or_else(|| Error::Parse(format!("no scripted snapshot for {symbol}")))
    }
}
