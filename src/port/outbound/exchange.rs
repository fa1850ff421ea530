//! Market data port.
//!
//! The scanner only ever reads public market data, so this is the whole
//! surface it needs from an exchange.

use async_trait::async_trait;

use crate::domain::{InstrumentSnapshot, Ticker, Timeframe};
use crate::error::Result;

/// Read-only access to an exchange's public market data.
///
/// Implementations own their retry and rate-limit policy. Timeouts and rate
/// limits surface as errors for which [`crate::error::Error::is_transient`]
/// returns true.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Symbols currently tradeable in the scanned category.
    async fn list_instruments(&self) -> Result<Vec<String>>;

    /// 24h summaries for every instrument in one call.
    async fn get_ticker_batch(&self) -> Result<Vec<Ticker>>;

    /// Multi-timeframe snapshot for one symbol.
    ///
    /// Sub-resources that cannot be fetched are left empty; an error means
    /// nothing usable was retrieved.
    async fn get_snapshot(&self, symbol: &str, timeframes: &[Timeframe]) -> Result<InstrumentSnapshot>;
}
