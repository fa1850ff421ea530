use reqwest::StatusCode;
use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Exchange rejected the request with a non-zero return code.
    #[error("exchange error {code}: {message}")]
    Exchange { code: i64, message: String },

    /// Timeout or rate limit; the unit of work is skipped for this cycle.
    #[error("transient failure: {0}")]
    Transient(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Bybit return code for "too many visits".
const RATE_LIMIT_CODE: i64 = 10006;

impl Error {
    /// Whether the failure is expected to clear on a later cycle.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transient(_) => true,
            Self::Exchange { code, .. } => *code == RATE_LIMIT_CODE,
            Self::Http(err) => {
                err.is_timeout() || err.is_connect() || err.status().is_some_and(is_transient_status)
            }
            _ => false,
        }
    }
}

/// Rate limiting and gateway hiccups; everything else is final.
#[must_use]
pub fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

pub type Result<T> = std::result::Result<T, Error>;
