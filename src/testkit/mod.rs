//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for tickers, candles, snapshots and results.
//! - [`client`] - `ScriptedClient`, an in-memory market data client.
//! - [`notifier`] - `RecordingNotifier`, which captures alert batches.
//! - [`journal`] - `MemoryJournal`, which keeps alerts and outcomes in memory.

pub mod client;
pub mod domain;
pub mod journal;
pub mod notifier;
