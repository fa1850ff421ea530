//! Handler for `check config`.

use std::path::Path;

use serde::Serialize;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// What `check config` found, also emitted as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigCheckReport {
    pub path: String,
    pub exchange: String,
    pub scan_interval_secs: u64,
    pub max_workers: usize,
    pub min_score: f64,
    pub weight_overrides: usize,
    pub telegram_enabled: bool,
    pub telegram_token_present: bool,
    pub telegram_chat_present: bool,
    pub journal: Option<String>,
}

impl ConfigCheckReport {
    fn from_config(path: &Path, config: &Config) -> Self {
        Self {
            path: path.display().to_string(),
            exchange: config.exchange.base_url.clone(),
            scan_interval_secs: config.scanner.scan_interval_secs,
            max_workers: config.scanner.max_workers,
            min_score: config.scoring.min_score,
            weight_overrides: config.scoring.weights.len(),
            telegram_enabled: config.telegram.enabled,
            telegram_token_present: env_present("TELEGRAM_BOT_TOKEN"),
            telegram_chat_present: env_present("TELEGRAM_CHAT_ID"),
            journal: config
                .journal
                .enabled
                .then(|| config.journal.path.display().to_string()),
        }
    }

    #[must_use]
    pub const fn telegram_ready(&self) -> bool {
        self.telegram_token_present && self.telegram_chat_present
    }
}

fn env_present(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| !v.trim().is_empty())
}

/// Validate configuration file without starting the scanner.
#[allow(clippy::result_large_err)]
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;
    let report = ConfigCheckReport::from_config(path, &config);

    if output::is_json() {
        output::json_payload("config_check", &report);
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Config", &report.path);
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("Exchange", &report.exchange);
    output::field("Interval", format!("{}s", report.scan_interval_secs));
    output::field("Workers", report.max_workers);
    output::field("Min score", report.min_score);
    output::field("Weights", format!("{} override(s)", report.weight_overrides));
    match &report.journal {
        Some(path) => output::field("Journal", path),
        None => output::field("Journal", "disabled"),
    }

    if report.telegram_enabled {
        if report.telegram_ready() {
            output::success("Telegram integration configured");
        } else {
            output::warning("Telegram enabled but environment variables are missing");
            if !report.telegram_token_present {
                output::field("Missing", "TELEGRAM_BOT_TOKEN");
            }
            if !report.telegram_chat_present {
                output::field("Missing", "TELEGRAM_CHAT_ID");
            }
        }
    } else {
        output::field("Telegram", "disabled");
    }

    output::success("Configuration check complete");
    Ok(())
}
