use std::fs;
use std::path::PathBuf;

use pumpwatch::domain::SignalType;
use pumpwatch::error::{ConfigError, Error};
use pumpwatch::infrastructure::config::settings::Config;
use tempfile::TempDir;

fn write_temp_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    (dir, path)
}

#[test]
fn config_rejects_zero_workers() {
    let (_dir, path) = write_temp_config("[scanner]\nmax_workers = 0\n");

    match Config::load(&path) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "max_workers",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid max_workers error, got {err}"),
        Ok(_) => panic!("Expected invalid max_workers error, got Ok"),
    }
}

#[test]
fn config_rejects_unknown_signal_weight() {
    let (_dir, path) = write_temp_config("[scoring.weights]\nMOON_SHOT = 2.0\n");

    match Config::load(&path) {
        Err(Error::Config(ConfigError::InvalidValue { field, reason })) => {
            assert_eq!(field, "scoring.weights");
            assert!(reason.contains("MOON_SHOT"), "reason: {reason}");
        }
        Err(err) => panic!("Expected invalid weight error, got {err}"),
        Ok(_) => panic!("Expected invalid weight error, got Ok"),
    }
}

#[test]
fn config_reports_toml_syntax_errors() {
    let (_dir, path) = write_temp_config("[scanner\nmax_workers = 4\n");
    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn missing_file_is_a_read_error_but_load_or_default_recovers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
    let config = Config::load_or_default(&path).expect("defaults");
    assert_eq!(config.scanner.max_workers, 10);
    assert_eq!(config.scoring.min_score, 65.0);
}

#[test]
fn full_config_round_trips_into_settings() {
    let toml = r#"
[scanner]
scan_interval_secs = 60
max_workers = 4
min_volume_24h = 1000000.0
min_change_24h_pct = 3.0
max_notifications = 3
watchlist_ttl_secs = 900

[detector]
volume_spike_ratio = 2.5

[scoring]
min_score = 70.0

[scoring.weights]
VOLUME_SPIKE = 1.5
FUNDING_RATE_SPIKE = 0.5

[exchange]
base_url = "https://api-testnet.bybit.com"

[exchange.http]
timeout_ms = 5000
retry_max_attempts = 2

[telegram]
enabled = true
cooldown_secs = 600

[journal]
enabled = false

[logging]
level = "debug"
format = "json"
"#;
    let (_dir, path) = write_temp_config(toml);
    let config = Config::load(&path).expect("valid config");

    assert_eq!(config.scanner.scan_interval_secs, 60);
    assert_eq!(config.scanner.max_workers, 4);
    assert_eq!(config.scanner.max_notifications, 3);
    assert_eq!(config.detector.volume_spike_ratio, 2.5);
    assert_eq!(config.scoring.min_score, 70.0);
    assert_eq!(config.exchange.base_url, "https://api-testnet.bybit.com");
    assert_eq!(config.exchange.http.timeout_ms, 5000);
    assert_eq!(config.exchange.http.retry_max_attempts, 2);
    assert!(config.telegram.enabled);
    assert_eq!(config.telegram.cooldown_secs, 600);
    assert!(!config.journal.enabled);
    assert_eq!(config.logging.format, "json");

    let weights = config.scoring.signal_weights().expect("weights");
    assert_eq!(weights.weight(SignalType::VolumeSpike), 1.5);
    assert_eq!(weights.weight(SignalType::FundingRateSpike), 0.5);
    assert_eq!(weights.weight(SignalType::BreakoutPattern), 1.0);
}
