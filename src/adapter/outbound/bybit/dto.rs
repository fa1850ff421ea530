//! Bybit v5 response shapes and their conversion into domain types.
//!
//! Bybit encodes every number as a string. Unparseable fields turn the row
//! into `None` rather than an error so one bad row never fails a batch.

use serde::Deserialize;

use crate::domain::{BookLevel, Candle, OrderBook, SeriesPoint, Ticker};

/// Common response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "retCode")]
    pub ret_code: i64,
    #[serde(rename = "retMsg", default)]
    pub ret_msg: String,
    pub result: Option<T>,
}

/// `result` shape for list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListResult<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(rename = "nextPageCursor", default)]
    pub next_page_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InstrumentDto {
    pub symbol: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "quoteCoin", default)]
    pub quote_coin: String,
    #[serde(rename = "contractType", default)]
    pub contract_type: String,
}

impl InstrumentDto {
    pub fn is_tradeable_usdt_perpetual(&self) -> bool {
        self.status == "Trading" && self.quote_coin == "USDT" && self.contract_type == "LinearPerpetual"
    }
}

#[derive(Debug, Deserialize)]
pub struct TickerDto {
    pub symbol: String,
    #[serde(rename = "lastPrice", default)]
    pub last_price: String,
    #[serde(rename = "turnover24h", default)]
    pub turnover_24h: String,
    #[serde(rename = "price24hPcnt", default)]
    pub price_24h_pcnt: String,
    #[serde(rename = "fundingRate", default)]
    pub funding_rate: String,
    #[serde(rename = "openInterestValue", default)]
    pub open_interest_value: String,
}

impl TickerDto {
    /// Convert, scaling the 24h change from a fraction to percent.
    pub fn into_ticker(self) -> Option<Ticker> {
        let last_price = parse_num(&self.last_price)?;
        let volume_24h = parse_num(&self.turnover_24h).unwrap_or(0.0);
        let change_24h_pct = parse_num(&self.price_24h_pcnt).unwrap_or(0.0) * 100.0;
        Some(Ticker {
            funding_rate: parse_num(&self.funding_rate),
            open_interest_value: parse_num(&self.open_interest_value),
            ..Ticker::new(self.symbol, last_price, volume_24h, change_24h_pct)
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderBookDto {
    #[serde(rename = "b", default)]
    pub bids: Vec<Vec<String>>,
    #[serde(rename = "a", default)]
    pub asks: Vec<Vec<String>>,
}

impl OrderBookDto {
    pub fn into_order_book(self) -> OrderBook {
        OrderBook::new(
            self.bids.iter().filter_map(|row| parse_level(row)).collect(),
            self.asks.iter().filter_map(|row| parse_level(row)).collect(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenInterestDto {
    #[serde(rename = "openInterest")]
    pub open_interest: String,
    pub timestamp: String,
}

impl OpenInterestDto {
    pub fn to_point(&self) -> Option<SeriesPoint> {
        Some(SeriesPoint::new(
            self.timestamp.parse().ok()?,
            parse_num(&self.open_interest)?,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct FundingDto {
    #[serde(rename = "fundingRate")]
    pub funding_rate: String,
    #[serde(rename = "fundingRateTimestamp")]
    pub funding_rate_timestamp: String,
}

impl FundingDto {
    pub fn to_point(&self) -> Option<SeriesPoint> {
        Some(SeriesPoint::new(
            self.funding_rate_timestamp.parse().ok()?,
            parse_num(&self.funding_rate)?,
        ))
    }
}

/// Parse a numeric string; empty or non-finite values are `None`.
pub fn parse_num(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `[startTime, open, high, low, close, volume, turnover]`
pub fn parse_kline_row(row: &[String]) -> Option<Candle> {
    if row.len() < 6 {
        return None;
    }
    Some(Candle::new(
        row[0].parse().ok()?,
        parse_num(&row[1])?,
        parse_num(&row[2])?,
        parse_num(&row[3])?,
        parse_num(&row[4])?,
        parse_num(&row[5])?,
    ))
}

/// `[price, size]`
pub fn parse_level(row: &[String]) -> Option<BookLevel> {
    match row {
        [price, size, ..] => Some(BookLevel::new(parse_num(price)?, parse_num(size)?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_envelope_parses_and_scales_change() {
        let json = r#"{
            "retCode": 0,
            "retMsg": "OK",
            "result": {
                "category": "linear",
                "list": [{
                    "symbol": "PEPEUSDT",
                    "lastPrice": "0.0000123",
                    "turnover24h": "25000000.5",
                    "price24hPcnt": "0.0734",
                    "fundingRate": "0.0001",
                    "openInterestValue": "1200000"
                }]
            }
        }"#;
        let envelope: Envelope<ListResult<TickerDto>> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.ret_code, 0);
        let ticker = envelope
            .result
            .unwrap()
            .list
            .into_iter()
            .next()
            .unwrap()
            .into_ticker()
            .unwrap();
        assert_eq!(ticker.symbol, "PEPEUSDT");
        assert_eq!(ticker.volume_24h, 25_000_000.5);
        assert!((ticker.change_24h_pct - 7.34).abs() < 1e-9);
        assert_eq!(ticker.funding_rate, Some(0.0001));
    }

    #[test]
    fn ticker_without_price_is_skipped() {
        let dto = TickerDto {
            symbol: "NEWUSDT".into(),
            last_price: String::new(),
            turnover_24h: "1".into(),
            price_24h_pcnt: "0".into(),
            funding_rate: String::new(),
            open_interest_value: String::new(),
        };
        assert!(dto.into_ticker().is_none());
    }

    #[test]
    fn error_envelope_has_no_result() {
        let json = r#"{"retCode": 10006, "retMsg": "Too many visits!", "result": null}"#;
        let envelope: Envelope<ListResult<TickerDto>> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.ret_code, 10006);
        assert!(envelope.result.is_none());
    }

    #[test]
    fn kline_rows_parse() {
        let row: Vec<String> = ["1700000000000", "1.0", "1.2", "0.9", "1.1", "5000", "5500"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let candle = parse_kline_row(&row).unwrap();
        assert_eq!(candle.open_time, 1_700_000_000_000);
        assert_eq!(candle.close, 1.1);
        assert_eq!(candle.volume, 5000.0);

        assert!(parse_kline_row(&row[..4]).is_none());
    }

    #[test]
    fn order_book_skips_bad_levels() {
        let json = r#"{"s": "BTCUSDT", "b": [["100.5", "2"], ["bad", "1"]], "a": [["101", "3"]], "ts": 1}"#;
        let dto: OrderBookDto = serde_json::from_str(json).unwrap();
        let book = dto.into_order_book();
        assert_eq!(book.bids, vec![BookLevel::new(100.5, 2.0)]);
        assert_eq!(book.asks, vec![BookLevel::new(101.0, 3.0)]);
    }

    #[test]
    fn instrument_filter_requires_trading_usdt_perpetual() {
        let json = r#"[
            {"symbol": "BTCUSDT", "status": "Trading", "quoteCoin": "USDT", "contractType": "LinearPerpetual"},
            {"symbol": "BTC-27DEC", "status": "Trading", "quoteCoin": "USDT", "contractType": "LinearFutures"},
            {"symbol": "OLDUSDT", "status": "Closed", "quoteCoin": "USDT", "contractType": "LinearPerpetual"},
            {"symbol": "BTCPERP", "status": "Trading", "quoteCoin": "USDC", "contractType": "LinearPerpetual"}
        ]"#;
        let dtos: Vec<InstrumentDto> = serde_json::from_str(json).unwrap();
        let kept: Vec<_> = dtos
            .iter()
            .filter(|d| d.is_tradeable_usdt_perpetual())
            .map(|d| d.symbol.as_str())
            .collect();
        assert_eq!(kept, vec!["BTCUSDT"]);
    }

    #[test]
    fn series_points_parse() {
        let oi = OpenInterestDto {
            open_interest: "12345.6".into(),
            timestamp: "1700000000000".into(),
        };
        assert_eq!(oi.to_point(), Some(SeriesPoint::new(1_700_000_000_000, 12_345.6)));

        let funding = FundingDto {
            funding_rate: "-0.00025".into(),
            funding_rate_timestamp: "nope".into(),
        };
        assert_eq!(funding.to_point(), None);
    }

    #[test]
    fn parse_num_rejects_non_finite() {
        assert_eq!(parse_num("NaN"), None);
        assert_eq!(parse_num("inf"), None);
        assert_eq!(parse_num(" 2.5 "), Some(2.5));
    }
}
