//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for various notification backends.

pub mod cooldown;
pub mod number;

#[cfg(feature = "telegram")]
pub mod telegram;

pub use cooldown::CooldownTracker;
