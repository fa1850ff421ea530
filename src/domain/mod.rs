//! Exchange-agnostic domain types.

mod market;
mod outcome;
mod score;
mod signal;
mod watchlist;
pub mod window;

pub use market::{BookLevel, Candle, InstrumentSnapshot, OrderBook, SeriesPoint, Ticker, Timeframe};
pub use outcome::{Checkpoint, PriceSample, SignalOutcome};
pub use score::{Confidence, ScoredResult, SignalWeights};
pub use signal::{Signal, SignalDetails, SignalType};
pub use watchlist::{Watchlist, WatchlistEntry};
