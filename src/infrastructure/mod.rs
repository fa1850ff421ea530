//! Infrastructure: configuration loading and runtime wiring.

pub mod bootstrap;
pub mod config;

pub use bootstrap::{build_notifier_registry, build_scan_loop};
pub use config::settings::Config;
