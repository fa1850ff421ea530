//! Telegram alert delivery.
//!
//! Provides the [`TelegramNotifier`] which formats ranked alerts as
//! `MarkdownV2` and sends them from a background worker.

mod format;

pub mod notifier;

pub use format::{escape_markdown, format_alert, format_startup};
pub use notifier::{TelegramConfig, TelegramNotifier};
