//! Bybit v5 public market data adapter.

mod client;
mod dto;
mod settings;

pub use client::{trade_url, BybitClient};
pub use settings::{BybitConfig, BybitHttpConfig};
