//! Handler for `movers`: the largest 24h movers on the exchange.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::bybit::BybitClient;
use crate::adapter::outbound::notifier::number::{compact_usd, format_price};
use crate::domain::Ticker;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// List the top `limit` symbols by absolute 24h change.
pub async fn execute(config_path: &Path, limit: usize) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let client = BybitClient::from_config(&config.exchange)?;
    let movers = client.get_top_movers(limit).await?;

    if output::is_json() {
        output::json_payload("movers", &movers);
        return Ok(());
    }

    output::section(&format!("Top {} movers (24h)", movers.len()));
    if movers.is_empty() {
        output::note("exchange returned no tickers");
        return Ok(());
    }
    output::row(output::muted(format!(
        "{:<4} {:<18} {:>14} {:>10} {:>12}",
        "#", "Symbol", "Price", "24h", "Volume"
    )));
    for (i, ticker) in movers.iter().enumerate() {
        output::row(format_row(i + 1, ticker));
    }
    Ok(())
}

fn format_row(rank: usize, ticker: &Ticker) -> String {
    // Pad before coloring so ANSI codes do not break alignment.
    let change = format!("{:>10}", format!("{:+.2}%", ticker.change_24h_pct));
    let change = if ticker.change_24h_pct >= 0.0 {
        output::highlight(change)
    } else {
        output::muted(change)
    };
    format!(
        "{:<4} {:<18} {:>14} {} {:>12}",
        rank,
        ticker.symbol,
        format_price(ticker.last_price),
        change,
        compact_usd(ticker.volume_24h)
    )
}
