//! Handler for `report`: summarize the signal journal.

use std::path::{Path, PathBuf};

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::journal::{
    read_all, Highlight, HitRate, JournalSummary, OutcomeSummary, MIN_BREAKDOWN_SAMPLE,
};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Journal location: explicit `--path`, else `[journal] path` from config.
#[allow(clippy::result_large_err)]
pub fn resolve_path(config_path: &Path, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    Ok(Config::load_or_default(config_path)?.journal.path)
}

#[allow(clippy::result_large_err)]
pub fn execute(config_path: &Path, explicit: Option<&Path>, top: usize) -> Result<()> {
    let path = resolve_path(config_path, explicit)?;
    let entries = read_all(&path)?;
    let summary = JournalSummary::from_entries(&entries);

    if output::is_json() {
        output::json_payload("journal_summary", &summary);
        return Ok(());
    }

    output::section("Signal Journal");
    output::field("File", path.display());
    output::field("Alerts", summary.alerts);
    if summary.alerts == 0 {
        output::note("no alerts recorded yet");
        return Ok(());
    }
    output::field("Avg score", format!("{:.1}", summary.average_score));
    if let (Some(first), Some(last)) = (summary.first_at, summary.last_at) {
        output::field(
            "Period",
            format!("{} → {}", first.format("%Y-%m-%d %H:%M"), last.format("%Y-%m-%d %H:%M")),
        );
    }

    output::section("Top symbols");
    for (symbol, count) in summary.top_symbols(top) {
        output::row(format!("{:<18} {}", symbol, output::highlight(count)));
    }

    output::section("Signal frequency");
    let mut signals: Vec<_> = summary.by_signal.iter().collect();
    signals.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (signal_type, count) in signals {
        output::row(format!("{:<24} {}", signal_type, output::highlight(count)));
    }

    print_outcomes(&summary.outcomes);
    Ok(())
}

fn hit_rate(hit: HitRate) -> String {
    format!(
        "{} {}",
        output::highlight(format!("{:.1}%", hit.rate_pct())),
        output::muted(format!("({}/{})", hit.successful, hit.completed))
    )
}

fn highlight_row(rank: usize, h: &Highlight) -> String {
    format!(
        "{rank}. {:<14} {} {:>5.1} {:<9} entry {:<12} {}",
        h.symbol,
        output::signed_pct(h.change_pct),
        h.score,
        h.confidence.as_str(),
        h.entry_price,
        output::muted(h.alerted_at.format("%Y-%m-%d %H:%M"))
    )
}

fn print_outcomes(outcomes: &OutcomeSummary) {
    output::section("Outcomes");
    output::field("Tracked", outcomes.tracked);
    if outcomes.overall.completed == 0 {
        output::note("no alert has reached its 1h checkpoint yet");
        return;
    }
    output::field("Success rate", hit_rate(outcomes.overall));
    for (label, value) in [
        ("Avg 1h change", outcomes.avg_change_1h),
        ("Avg 4h change", outcomes.avg_change_4h),
        ("Avg max gain", outcomes.avg_max_gain),
        ("Avg max loss", outcomes.avg_max_loss),
    ] {
        if let Some(value) = value {
            output::field(label, output::signed_pct(value));
        }
    }

    output::section("By confidence");
    for (confidence, hit) in &outcomes.by_confidence {
        output::row(format!("{confidence:<10} {}", hit_rate(*hit)));
    }

    let signals = outcomes.reliable_signals(MIN_BREAKDOWN_SAMPLE);
    if !signals.is_empty() {
        output::section("By signal type");
        for (signal_type, hit) in signals {
            output::row(format!("{signal_type:<24} {}", hit_rate(hit)));
        }
    }

    let hours: Vec<_> = outcomes
        .by_hour
        .iter()
        .filter(|(_, hit)| hit.completed >= MIN_BREAKDOWN_SAMPLE)
        .collect();
    if !hours.is_empty() {
        output::section("By hour (UTC)");
        for (hour, hit) in hours {
            output::row(format!("{hour:02}:00  {}", hit_rate(*hit)));
        }
    }

    output::section("Best alerts");
    for (rank, h) in outcomes.best.iter().enumerate() {
        output::row(highlight_row(rank + 1, h));
    }
    output::section("Worst alerts");
    for (rank, h) in outcomes.worst.iter().enumerate() {
        output::row(highlight_row(rank + 1, h));
    }
}
