//! Number formatting shared by alert and terminal output.

/// Price with precision suited to its magnitude.
pub fn format_price(price: f64) -> String {
    let abs = price.abs();
    if abs >= 1000.0 {
        format!("{price:.2}")
    } else if abs >= 1.0 {
        format!("{price:.4}")
    } else if abs >= 0.01 {
        format!("{price:.6}")
    } else {
        format!("{price:.8}")
    }
}

/// Dollar amount as `$12.3M` / `$450.0K`.
pub fn compact_usd(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("${:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("${:.1}K", value / 1e3)
    } else {
        format!("${value:.0}")
    }
}
