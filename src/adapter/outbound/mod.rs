//! Outbound adapters: exchange data, notifications and the signal journal.

pub mod bybit;
pub mod journal;
pub mod notifier;
