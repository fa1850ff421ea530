//! Bybit v5 REST client for public market data.
//!
//! All calls go to `/v5/market/*` with `category=linear`. Responses are
//! wrapped in `{retCode, retMsg, result}`; a non-zero `retCode` becomes
//! [`Error::Exchange`].

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::future::join_all;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use super::dto::{
    parse_kline_row, Envelope, FundingDto, InstrumentDto, ListResult, OpenInterestDto,
    OrderBookDto, TickerDto,
};
use super::settings::BybitConfig;
use crate::domain::{Candle, InstrumentSnapshot, OrderBook, SeriesPoint, Ticker, Timeframe};
use crate::error::{Error, Result};
use crate::port::MarketDataClient;

/// Page size for the instruments endpoint.
const INSTRUMENT_PAGE_LIMIT: usize = 1000;
/// Guard against a cursor that never ends.
const MAX_INSTRUMENT_PAGES: usize = 10;
/// Quote currency the scanner trades against.
const QUOTE_SUFFIX: &str = "USDT";

/// Link to the exchange's trading page for `symbol`.
#[must_use]
pub fn trade_url(symbol: &str) -> String {
    format!("https://www.bybit.com/trade/usdt/{symbol}")
}

/// HTTP client for the Bybit public market endpoints.
pub struct BybitClient {
    http: HttpClient,
    base_url: Url,
    config: BybitConfig,
}

impl BybitClient {
    /// Build a client from configuration.
    ///
    /// Fails when `base_url` is not a valid URL or the TLS backend cannot
    /// be initialised.
    pub fn from_config(config: &BybitConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url,
            config: config.clone(),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .append_pair("category", &self.config.category)
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    async fn get_once<T>(&self, url: &Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.http.get(url.clone()).send().await?.error_for_status()?;
        let envelope: Envelope<T> = response.json().await?;
        if envelope.ret_code != 0 {
            return Err(Error::Exchange {
                code: envelope.ret_code,
                message: envelope.ret_msg,
            });
        }
        envelope
            .result
            .ok_or_else(|| Error::Parse(format!("empty result from {}", url.path())))
    }

    async fn get_with_retry<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path, params)?;
        let max_attempts = self.config.http.retry_max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.get_once(&url).await {
                Ok(parsed) => return Ok(parsed),
                Err(err) if attempt < max_attempts && err.is_transient() => {
                    self.backoff(attempt, max_attempts, &err).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn backoff(&self, attempt: u32, max_attempts: u32, err: &Error) {
        warn!(
            attempt,
            max_attempts,
            error = %err,
            "Bybit request failed, retrying"
        );
        let delay = self.config.http.retry_backoff_ms.saturating_mul(u64::from(attempt));
        if delay > 0 {
            sleep(Duration::from_millis(delay)).await;
        }
    }

    /// Tickers for `symbol`, or for the whole category when `None`.
    async fn fetch_tickers(&self, symbol: Option<&str>) -> Result<Vec<Ticker>> {
        let params: Vec<(&str, String)> = symbol
            .map(|s| vec![("symbol", s.to_string())])
            .unwrap_or_default();
        let result: ListResult<TickerDto> = self.get_with_retry("/v5/market/tickers", &params).await?;
        Ok(result
            .list
            .into_iter()
            .filter(|t| t.symbol.ends_with(QUOTE_SUFFIX))
            .filter_map(TickerDto::into_ticker)
            .collect())
    }

    pub async fn get_ticker(&self, symbol: &str) -> Result<Ticker> {
        self.fetch_tickers(Some(symbol))
            .await?
            .into_iter()
            .find(|t| t.symbol == symbol)
            .ok_or_else(|| Error::Parse(format!("no ticker for {symbol}")))
    }

    /// Candles for one timeframe, oldest first.
    pub async fn get_klines(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        let params = [
            ("symbol", symbol.to_string()),
            ("interval", timeframe.interval().to_string()),
            ("limit", self.config.kline_limit.to_string()),
        ];
        let result: ListResult<Vec<String>> = self.get_with_retry("/v5/market/kline", &params).await?;
        let mut candles: Vec<Candle> = result
            .list
            .iter()
            .filter_map(|row| parse_kline_row(row))
            .collect();
        candles.reverse();
        Ok(candles)
    }

    pub async fn get_order_book(&self, symbol: &str) -> Result<OrderBook> {
        let params = [
            ("symbol", symbol.to_string()),
            ("limit", self.config.orderbook_limit.to_string()),
        ];
        let result: OrderBookDto = self.get_with_retry("/v5/market/orderbook", &params).await?;
        Ok(result.into_order_book())
    }

    /// Open interest at 5 minute intervals, oldest first.
    pub async fn get_open_interest(&self, symbol: &str) -> Result<Vec<SeriesPoint>> {
        let params = [
            ("symbol", symbol.to_string()),
            ("intervalTime", "5min".to_string()),
            ("limit", self.config.open_interest_limit.to_string()),
        ];
        let result: ListResult<OpenInterestDto> =
            self.get_with_retry("/v5/market/open-interest", &params).await?;
        let mut points: Vec<_> = result.list.iter().filter_map(OpenInterestDto::to_point).collect();
        points.sort_by_key(|p| p.timestamp);
        Ok(points)
    }

    /// Settled funding rates, oldest first.
    pub async fn get_funding_history(&self, symbol: &str) -> Result<Vec<SeriesPoint>> {
        let params = [
            ("symbol", symbol.to_string()),
            ("limit", self.config.funding_limit.to_string()),
        ];
        let result: ListResult<FundingDto> =
            self.get_with_retry("/v5/market/funding/history", &params).await?;
        let mut points: Vec<_> = result.list.iter().filter_map(FundingDto::to_point).collect();
        points.sort_by_key(|p| p.timestamp);
        Ok(points)
    }

    /// Tickers sorted by absolute 24h change, largest first.
    pub async fn get_top_movers(&self, limit: usize) -> Result<Vec<Ticker>> {
        let mut tickers = self.fetch_tickers(None).await?;
        tickers.sort_by(|a, b| b.change_24h_pct.abs().total_cmp(&a.change_24h_pct.abs()));
        tickers.truncate(limit);
        Ok(tickers)
    }
}

/// Log a failed optional sub-resource and fall back to its default.
fn or_empty<T: Default>(symbol: &str, resource: &'static str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(
                symbol,
                resource,
                transient = e.is_transient(),
                error = %e,
                "Sub-resource fetch failed"
            );
            T::default()
        }
    }
}

#[async_trait]
impl MarketDataClient for BybitClient {
    async fn list_instruments(&self) -> Result<Vec<String>> {
        let mut symbols = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_INSTRUMENT_PAGES {
            let mut params = vec![("limit", INSTRUMENT_PAGE_LIMIT.to_string())];
            if let Some(c) = cursor.take() {
                params.push(("cursor", c));
            }
            let page: ListResult<InstrumentDto> =
                self.get_with_retry("/v5/market/instruments-info", &params).await?;
            symbols.extend(
                page.list
                    .into_iter()
                    .filter(InstrumentDto::is_tradeable_usdt_perpetual)
                    .map(|i| i.symbol),
            );
            match page.next_page_cursor.filter(|c| !c.is_empty()) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        info!(count = symbols.len(), "Fetched tradeable instruments");
        Ok(symbols)
    }

    async fn get_ticker_batch(&self) -> Result<Vec<Ticker>> {
        let tickers = self.fetch_tickers(None).await?;
        debug!(count = tickers.len(), "Fetched ticker batch");
        Ok(tickers)
    }

    async fn get_snapshot(&self, symbol: &str, timeframes: &[Timeframe]) -> Result<InstrumentSnapshot> {
        let klines = join_all(timeframes.iter().map(|tf| async move {
            (*tf, self.get_klines(symbol, *tf).await)
        }));
        let (ticker, klines, book, open_interest, funding) = tokio::join!(
            self.get_ticker(symbol),
            klines,
            self.get_order_book(symbol),
            self.get_open_interest(symbol),
            self.get_funding_history(symbol),
        );

        // Without a last price nothing downstream is meaningful.
        let mut snapshot = InstrumentSnapshot::from_ticker(&ticker?);
        for (timeframe, candles) in klines {
            snapshot.set_candles(timeframe, or_empty(symbol, "kline", candles));
        }
        snapshot.order_book = or_empty(symbol, "orderbook", book);
        snapshot.open_interest = or_empty(symbol, "open_interest", open_interest);
        snapshot.funding_rates = or_empty(symbol, "funding", funding);
        snapshot.captured_at = Utc::now();
        Ok(snapshot)
    }
}
