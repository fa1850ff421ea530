//! Message formatting for Telegram notifications.

use crate::adapter::outbound::bybit::trade_url;
use crate::adapter::outbound::notifier::number::{compact_usd, format_price};
use crate::domain::ScoredResult;

/// Signals listed per alert.
const MAX_SIGNALS_SHOWN: usize = 5;

/// Format one ranked alert as a `MarkdownV2` message.
pub fn format_alert(rank: usize, result: &ScoredResult) -> String {
    let mut msg = format!(
        "🚨 *\\#{} {}*\n\
        \n\
        🎯 Score: `{:.0}` \\({}\\)\n\
        💵 Price: `{}`\n\
        📦 Volume 24h: `{}`\n\
        📈 Change: 5m `{}` · 15m `{}` · 1h `{}` · 24h `{}`\n",
        rank,
        escape_markdown(&result.symbol),
        result.display_score(),
        escape_markdown(result.confidence.as_str()),
        format_price(result.last_price),
        compact_usd(result.volume_24h),
        format_change(result.change_5m),
        format_change(result.change_15m),
        format_change(result.change_1h),
        format_change(Some(result.change_24h)),
    );

    if let Some(rate) = result.funding_rate {
        msg.push_str(&format!("💸 Funding: `{:.4}%`\n", rate * 100.0));
    }

    msg.push_str(&format!("\n*Signals* \\({}\\)\n", result.signal_count()));
    for signal in result.signals.iter().take(MAX_SIGNALS_SHOWN) {
        msg.push_str(&format!(
            "{} {} `{:.0}`\n   _{}_\n",
            signal.signal_type.emoji(),
            escape_markdown(signal.signal_type.label()),
            signal.strength,
            escape_markdown(&truncate(&signal.details.to_string(), 60)),
        ));
    }
    if result.signals.len() > MAX_SIGNALS_SHOWN {
        msg.push_str(&format!(
            "\\.\\.\\.and {} more\n",
            result.signals.len() - MAX_SIGNALS_SHOWN
        ));
    }

    msg.push_str(&format!(
        "\n[Trade on Bybit]({})",
        escape_link(&trade_url(&result.symbol))
    ));
    msg
}

/// Format the scanner startup notice.
pub fn format_startup(message: &str) -> String {
    format!("🟢 *Pumpwatch online*\n\n{}", escape_markdown(message))
}

fn format_change(change: Option<f64>) -> String {
    change.map_or_else(|| "n/a".to_string(), |c| format!("{c:+.2}%"))
}

/// Truncate a string with ellipsis (Unicode-safe).
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    const SPECIAL: [char; 18] = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Inside `(...)` of an inline link only `)` and `\` need escaping.
fn escape_link(url: &str) -> String {
    url.replace('\\', "\\\\").replace(')', "\\)")
}
