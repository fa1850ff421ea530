//! Pumpwatch - pump detection for perpetual futures.
//!
//! Scans every USDT perpetual on the exchange once per cycle through a
//! three-stage funnel:
//!
//! 1. **Fetch** - one batch ticker call for the whole universe
//! 2. **Quick filter** - 24h volume, 24h change and price thresholds, with
//!    recently alerted symbols kept in via the watchlist
//! 3. **Deep analysis** - bounded concurrent multi-timeframe snapshots run
//!    through the detectors and the scorer
//!
//! Results at or above the minimum score are ranked and handed to the
//! notifiers.
//!
//! # Modules
//!
//! - [`domain`] - Market data, signals, scores and the watchlist
//! - [`port`] - Traits for market data, notifications and the journal
//! - [`application`] - Detectors, scorer, scanner and scan loop
//! - [`adapter`] - Bybit REST client, Telegram, JSONL journal and the CLI
//! - [`infrastructure`] - Configuration and wiring
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Telegram alert delivery
//! - `testkit` - In-memory client, notifier and builders for tests
//!
//! # Example
//!
//! ```no_run
//! use pumpwatch::infrastructure::{build_scan_loop, Config};
//!
//! # async fn demo() -> pumpwatch::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let mut scan_loop = build_scan_loop(&config)?;
//! let report = scan_loop.run_once().await;
//! println!("{} qualified", report.qualified.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
