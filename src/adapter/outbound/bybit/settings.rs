//! Bybit exchange configuration.

use serde::Deserialize;

/// Bybit public REST settings. Loaded from the `[exchange]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BybitConfig {
    /// REST API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Product category; the scanner targets USDT perpetuals.
    #[serde(default = "default_category")]
    pub category: String,
    /// Candles requested per timeframe.
    #[serde(default = "default_kline_limit")]
    pub kline_limit: usize,
    /// Order book levels requested per side.
    #[serde(default = "default_orderbook_limit")]
    pub orderbook_limit: usize,
    /// Open interest points requested (5 minute interval).
    #[serde(default = "default_open_interest_limit")]
    pub open_interest_limit: usize,
    /// Funding history points requested.
    #[serde(default = "default_funding_limit")]
    pub funding_limit: usize,
    #[serde(default)]
    pub http: BybitHttpConfig,
}

fn default_base_url() -> String {
    "https://api.bybit.com".into()
}

fn default_category() -> String {
    "linear".into()
}

const fn default_kline_limit() -> usize {
    100
}

const fn default_orderbook_limit() -> usize {
    50
}

const fn default_open_interest_limit() -> usize {
    50
}

const fn default_funding_limit() -> usize {
    20
}

impl Default for BybitConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            category: default_category(),
            kline_limit: default_kline_limit(),
            orderbook_limit: default_orderbook_limit(),
            open_interest_limit: default_open_interest_limit(),
            funding_limit: default_funding_limit(),
            http: BybitHttpConfig::default(),
        }
    }
}

/// Bybit HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BybitHttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for transient failures.
    #[serde(default = "default_http_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds, multiplied by the attempt.
    #[serde(default = "default_http_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    10_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    3_000
}

const fn default_http_retry_max_attempts() -> u32 {
    3
}

const fn default_http_retry_backoff_ms() -> u64 {
    500
}

impl Default for BybitHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
            retry_max_attempts: default_http_retry_max_attempts(),
            retry_backoff_ms: default_http_retry_backoff_ms(),
        }
    }
}
