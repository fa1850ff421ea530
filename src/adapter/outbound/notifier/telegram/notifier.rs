//! Telegram notifier.
//!
//! Requires the `telegram` feature to be enabled.

use std::sync::Arc;

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::adapter::outbound::notifier::cooldown::{CooldownTracker, DEFAULT_COOLDOWN_SECS};
use crate::domain::ScoredResult;
use crate::error::Result;
use crate::port::outbound::notifier::Notifier;

use super::format::{format_alert, format_startup};

/// Configuration for the Telegram notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    /// Target chat ID for alerts.
    pub chat_id: i64,
    /// Seconds a symbol stays quiet after an alert.
    pub cooldown_secs: u64,
}

impl TelegramConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`. Returns `None` if
    /// either is missing or invalid.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID")
            .ok()
            .and_then(|s| s.trim().parse().ok())?;

        Some(Self {
            bot_token,
            chat_id,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
        })
    }

    #[must_use]
    pub const fn with_cooldown_secs(mut self, secs: u64) -> Self {
        self.cooldown_secs = secs;
        self
    }
}

/// Sends alerts to a Telegram chat.
///
/// `notify` only formats and queues; a background worker owns the bot and
/// performs the HTTP calls. Send failures are logged and dropped.
pub struct TelegramNotifier {
    sender: mpsc::UnboundedSender<String>,
    cooldown: Arc<CooldownTracker>,
}

impl TelegramNotifier {
    /// Create a new Telegram notifier and spawn the background worker.
    ///
    /// Must be called from within a Tokio runtime. Fails before spawning
    /// anything when the cooldown is out of range.
    #[allow(clippy::result_large_err)]
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let cooldown = Arc::new(CooldownTracker::from_secs(config.cooldown_secs)?);
        let (sender, receiver) = mpsc::unbounded_channel();

        tokio::spawn(telegram_worker(config, receiver));

        Ok(Self { sender, cooldown })
    }

    fn enqueue(&self, text: String) {
        if self.sender.send(text).is_err() {
            warn!("Telegram notifier channel closed");
        }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, alerts: &[ScoredResult]) {
        let now = Utc::now();
        self.cooldown.prune(now);

        for (i, result) in alerts.iter().enumerate() {
            if !self.cooldown.try_mark(&result.symbol, now) {
                debug!(symbol = %result.symbol, "Alert suppressed by cooldown");
                continue;
            }
            self.enqueue(format_alert(i + 1, result));
        }
    }

    fn is_on_cooldown(&self, symbol: &str) -> bool {
        self.cooldown.is_active(symbol, Utc::now())
    }

    fn notify_startup(&self, message: &str) {
        self.enqueue(format_startup(message));
    }
}

/// Background worker that sends Telegram messages.
async fn telegram_worker(config: TelegramConfig, mut receiver: mpsc::UnboundedReceiver<String>) {
    let bot = Bot::new(&config.bot_token);
    let chat_id = ChatId(config.chat_id);

    info!(chat_id = config.chat_id, "Telegram notifier started");

    while let Some(text) = receiver.recv().await {
        if let Err(e) = bot
            .send_message(chat_id, &text)
            .parse_mode(ParseMode::MarkdownV2)
            .await
        {
            error!(error = %e, "Failed to send Telegram message");
        }
    }

    warn!("Telegram notifier worker shutting down");
}
