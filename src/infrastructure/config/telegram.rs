//! Telegram notification configuration.

use serde::Deserialize;

use crate::adapter::outbound::notifier::cooldown::DEFAULT_COOLDOWN_SECS;

/// Telegram notification configuration.
///
/// Credentials never live in the file; they come from `TELEGRAM_BOT_TOKEN`
/// and `TELEGRAM_CHAT_ID`.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    /// Enable telegram notifications.
    #[serde(default)]
    pub enabled: bool,
    /// Seconds a symbol stays quiet after an alert (default: 900).
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

const fn default_cooldown_secs() -> u64 {
    DEFAULT_COOLDOWN_SECS
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cooldown_secs: default_cooldown_secs(),
        }
    }
}
