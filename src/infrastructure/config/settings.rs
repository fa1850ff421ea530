//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; `PUMPWATCH_LOG_LEVEL` overrides
//! the configured log level.
//!
//! # Example
//!
//! ```no_run
//! use pumpwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::journal::JournalConfig;
use super::logging::LoggingConfig;
use super::scoring::ScoringConfig;
use super::telegram::TelegramAppConfig;
use crate::adapter::outbound::bybit::BybitConfig;
use crate::application::{DetectorConfig, ScannerConfig, TrackerConfig};
use crate::error::{ConfigError, Result};

/// Environment variable overriding `[logging] level`.
pub const LOG_LEVEL_ENV: &str = "PUMPWATCH_LOG_LEVEL";

/// Upper bound for every second-granularity window (one week).
pub const MAX_WINDOW_SECS: u64 = 7 * 24 * 3600;

/// Main application configuration.
///
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Funnel thresholds, concurrency and scheduling.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Detector thresholds.
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Alert threshold and signal weights.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Exchange REST settings.
    #[serde(default)]
    pub exchange: BybitConfig,

    /// Telegram notification configuration.
    #[serde(default)]
    pub telegram: TelegramAppConfig,

    #[serde(default)]
    pub journal: JournalConfig,

    /// Post-alert price tracking.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse and validate configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse_toml(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(level) = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .filter(|l| !l.trim().is_empty())
        {
            self.logging.level = level;
        }
    }

    /// Validate configuration values.
    ///
    /// Checks that values are within acceptable ranges. Call again after
    /// applying CLI overrides.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        self.validate_scanner()?;
        self.validate_detector()?;
        self.validate_scoring()?;
        self.validate_exchange()?;
        self.validate_tracker()?;
        window("telegram.cooldown_secs", self.telegram.cooldown_secs)?;

        if !LoggingConfig::FORMATS.contains(&self.logging.format.as_str()) {
            return Err(invalid("logging.format", "must be `pretty` or `json`"));
        }
        if self.journal.enabled && self.journal.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "journal.path",
            }
            .into());
        }

        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn validate_scanner(&self) -> Result<()> {
        let s = &self.scanner;
        if s.max_workers == 0 {
            return Err(invalid("max_workers", "must be greater than 0"));
        }
        if s.max_notifications == 0 {
            return Err(invalid("max_notifications", "must be greater than 0"));
        }
        window("scan_interval_secs", s.scan_interval_secs)?;
        window("watchlist_ttl_secs", s.watchlist_ttl_secs)?;
        window("symbol_refresh_secs", s.symbol_refresh_secs)?;
        non_negative("min_volume_24h", s.min_volume_24h)?;
        non_negative("min_change_24h_pct", s.min_change_24h_pct)?;
        positive("max_price", s.max_price)
    }

    #[allow(clippy::result_large_err)]
    fn validate_detector(&self) -> Result<()> {
        let d = &self.detector;
        for (field, value) in [
            ("volume_lookback", d.volume_lookback),
            ("book_depth", d.book_depth),
            ("breakout_window", d.breakout_window),
            ("breakout_recent", d.breakout_recent),
            ("oi_lookback", d.oi_lookback),
            ("funding_lookback", d.funding_lookback),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be greater than 0"));
            }
        }
        if d.breakout_recent >= d.breakout_window {
            return Err(invalid(
                "breakout_recent",
                "must be smaller than breakout_window",
            ));
        }
        for (field, value) in [
            ("volume_extreme_ratio", d.volume_extreme_ratio),
            ("volume_spike_ratio", d.volume_spike_ratio),
            ("volume_elevated_ratio", d.volume_elevated_ratio),
            ("momentum_5m_pct", d.momentum_5m_pct),
            ("momentum_15m_pct", d.momentum_15m_pct),
            ("momentum_1h_pct", d.momentum_1h_pct),
            ("book_extreme_ratio", d.book_extreme_ratio),
            ("book_strong_ratio", d.book_strong_ratio),
            ("large_order_notional", d.large_order_notional),
            ("breakout_max_range_pct", d.breakout_max_range_pct),
            ("breakout_volume_ratio", d.breakout_volume_ratio),
            ("oi_surge_pct", d.oi_surge_pct),
            ("funding_spike_delta", d.funding_spike_delta),
        ] {
            positive(field, value)?;
        }
        if !(d.volume_elevated_ratio < d.volume_spike_ratio
            && d.volume_spike_ratio < d.volume_extreme_ratio)
        {
            return Err(invalid(
                "volume_spike_ratio",
                "must lie strictly between volume_elevated_ratio and volume_extreme_ratio",
            ));
        }
        if d.book_strong_ratio >= d.book_extreme_ratio {
            return Err(invalid(
                "book_strong_ratio",
                "must be smaller than book_extreme_ratio",
            ));
        }
        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn validate_scoring(&self) -> Result<()> {
        let min_score = self.scoring.min_score;
        if !(0.0..=200.0).contains(&min_score) {
            return Err(invalid("min_score", "must be between 0 and 200"));
        }
        self.scoring.signal_weights().map(|_| ())
    }

    #[allow(clippy::result_large_err)]
    fn validate_exchange(&self) -> Result<()> {
        let e = &self.exchange;
        if e.base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "exchange.base_url",
            }
            .into());
        }
        if let Err(err) = Url::parse(&e.base_url) {
            return Err(invalid("exchange.base_url", &err.to_string()));
        }
        if e.kline_limit == 0 {
            return Err(invalid("kline_limit", "must be greater than 0"));
        }
        if e.http.timeout_ms == 0 {
            return Err(invalid("timeout_ms", "must be greater than 0"));
        }
        if e.http.retry_max_attempts == 0 {
            return Err(invalid("retry_max_attempts", "must be at least 1"));
        }
        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn validate_tracker(&self) -> Result<()> {
        let t = &self.tracker;
        window("poll_interval_secs", t.poll_interval_secs)?;
        window("max_sample_delay_secs", t.max_sample_delay_secs)?;
        if t.max_sample_delay_secs < t.poll_interval_secs {
            return Err(invalid(
                "max_sample_delay_secs",
                "must be at least poll_interval_secs",
            ));
        }
        positive("success_threshold_pct", t.success_threshold_pct)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

/// Seconds in `1..=MAX_WINDOW_SECS`.
#[allow(clippy::result_large_err)]
fn window(field: &'static str, secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(invalid(field, "must be greater than 0"));
    }
    if secs > MAX_WINDOW_SECS {
        return Err(invalid(field, "must be at most 604800 (one week)"));
    }
    Ok(())
}

#[allow(clippy::result_large_err)]
fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be 0 or greater"))
    }
}

#[allow(clippy::result_large_err)]
fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be greater than 0"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn invalid_field(result: Result<Config>) -> &'static str {
        match result {
            Err(Error::Config(ConfigError::InvalidValue { field, .. })) => field,
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.scanner.max_workers, 10);
        assert_eq!(config.scanner.scan_interval_secs, 90);
        assert_eq!(config.scoring.min_score, 65.0);
        assert_eq!(config.exchange.category, "linear");
        assert!(!config.telegram.enabled);
        assert!(config.journal.enabled);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let toml = r#"
            [scanner]
            max_workers = 4

            [detector]
            oi_surge_pct = 20.0

            [exchange.http]
            retry_max_attempts = 5
        "#;
        let config = Config::parse_toml(toml).unwrap();
        assert_eq!(config.scanner.max_workers, 4);
        assert_eq!(config.scanner.min_change_24h_pct, 5.0);
        assert_eq!(config.detector.oi_surge_pct, 20.0);
        assert_eq!(config.exchange.http.retry_max_attempts, 5);
        assert_eq!(config.exchange.http.timeout_ms, 10_000);
    }

    #[test]
    fn zero_workers_rejected() {
        let result = Config::parse_toml("[scanner]\nmax_workers = 0\n");
        assert_eq!(invalid_field(result), "max_workers");
    }

    #[test]
    fn zero_interval_rejected() {
        let result = Config::parse_toml("[scanner]\nscan_interval_secs = 0\n");
        assert_eq!(invalid_field(result), "scan_interval_secs");
    }

    #[test]
    fn windows_are_bounded_to_a_week() {
        for (section, key, field) in [
            ("scanner", "watchlist_ttl_secs", "watchlist_ttl_secs"),
            ("scanner", "symbol_refresh_secs", "symbol_refresh_secs"),
            ("scanner", "scan_interval_secs", "scan_interval_secs"),
            ("telegram", "cooldown_secs", "telegram.cooldown_secs"),
        ] {
            // toml integers are i64; the largest one is far past a week.
            let toml = format!("[{section}]\n{key} = {}\n", i64::MAX);
            assert_eq!(invalid_field(Config::parse_toml(&toml)), field);
        }

        let week = format!("[scanner]\nwatchlist_ttl_secs = {MAX_WINDOW_SECS}\n");
        assert!(Config::parse_toml(&week).is_ok());
    }

    #[test]
    fn tracker_defaults_and_validation() {
        let config = Config::parse_toml("").unwrap();
        assert!(config.tracker.enabled);
        assert_eq!(config.tracker.poll_interval_secs, 30);
        assert_eq!(config.tracker.success_threshold_pct, 3.0);

        let result = Config::parse_toml("[tracker]\npoll_interval_secs = 600\n");
        assert_eq!(invalid_field(result), "max_sample_delay_secs");
        let result = Config::parse_toml("[tracker]\nsuccess_threshold_pct = 0.0\n");
        assert_eq!(invalid_field(result), "success_threshold_pct");
    }

    #[test]
    fn zero_cooldown_rejected() {
        let result = Config::parse_toml("[telegram]\ncooldown_secs = 0\n");
        assert_eq!(invalid_field(result), "telegram.cooldown_secs");
    }

    #[test]
    fn negative_threshold_rejected() {
        let result = Config::parse_toml("[scanner]\nmin_change_24h_pct = -1.0\n");
        assert_eq!(invalid_field(result), "min_change_24h_pct");
    }

    #[test]
    fn min_score_out_of_range_rejected() {
        let result = Config::parse_toml("[scoring]\nmin_score = 250\n");
        assert_eq!(invalid_field(result), "min_score");
    }

    #[test]
    fn negative_weight_rejected() {
        let result = Config::parse_toml("[scoring.weights]\nVOLUME_SPIKE = -2.0\n");
        assert_eq!(invalid_field(result), "scoring.weights");
    }

    #[test]
    fn breakout_split_must_leave_consolidation() {
        let result = Config::parse_toml("[detector]\nbreakout_window = 3\nbreakout_recent = 3\n");
        assert_eq!(invalid_field(result), "breakout_recent");
    }

    #[test]
    fn volume_tiers_must_be_ordered() {
        let result = Config::parse_toml("[detector]\nvolume_spike_ratio = 6.0\n");
        assert_eq!(invalid_field(result), "volume_spike_ratio");
    }

    #[test]
    fn unknown_log_format_rejected() {
        let result = Config::parse_toml("[logging]\nformat = \"xml\"\n");
        assert_eq!(invalid_field(result), "logging.format");
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let result = Config::parse_toml("[scanner\nmax_workers = 1");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn missing_file_is_read_error() {
        let result = Config::load("/nonexistent/pumpwatch.toml");
        assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
    }
}
