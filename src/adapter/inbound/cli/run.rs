//! Handler for the `run` command.

use tracing::{info, warn};

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::{banner, output};
use crate::adapter::outbound::notifier::number::format_price;
use crate::application::CycleReport;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_scan_loop;
use crate::infrastructure::config::settings::Config;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    if !args.config.exists() {
        output::warning(&format!(
            "{} not found, using built-in defaults",
            args.config.display()
        ));
    }
    let mut config = Config::load_or_default(&args.config)?;
    apply_overrides(&mut config, args, output::is_json());
    config.validate()?;
    config.init_logging();

    let styled_output = config.logging.format != "json";
    if !args.no_banner && styled_output && !output::is_quiet() {
        banner::print_banner();
    }
    print_startup_config(&config, args.once);

    let mut scan_loop = build_scan_loop(&config)?;
    info!("pumpwatch starting");

    if args.once {
        let report = scan_loop.run_once().await;
        print_cycle(&report);
        return Ok(());
    }

    scan_loop.run_until(shutdown_signal()).await;
    info!("pumpwatch stopped");
    Ok(())
}

/// Fold CLI flags into the loaded configuration.
pub fn apply_overrides(config: &mut Config, args: &RunArgs, force_json_logs: bool) {
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs || force_json_logs {
        config.logging.format = "json".into();
    }
    if let Some(workers) = args.max_workers {
        config.scanner.max_workers = workers;
    }
    if let Some(min_score) = args.min_score {
        config.scoring.min_score = min_score;
    }
    if args.telegram {
        config.telegram.enabled = true;
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}

fn print_startup_config(config: &Config, once: bool) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Exchange", &config.exchange.base_url);
    if once {
        output::field("Mode", "single cycle");
    } else {
        output::field("Interval", format!("{}s", config.scanner.scan_interval_secs));
    }
    output::field("Workers", config.scanner.max_workers);
    output::field("Min score", config.scoring.min_score);
    output::field(
        "Telegram",
        if config.telegram.enabled { "enabled" } else { "disabled" },
    );
}

fn print_cycle(report: &CycleReport) {
    if output::is_json() {
        output::json_payload("cycle", report);
        return;
    }

    output::section("Cycle");
    output::field("Tickers", report.tickers);
    output::field("Candidates", report.candidates);
    output::field("Analyzed", report.analyzed);
    output::field("Failed", report.failed);
    output::field("Duration", format!("{} ms", report.duration.as_millis()));

    if report.qualified.is_empty() {
        output::note("no symbol reached the minimum score");
        return;
    }
    output::section("Ranked");
    for (i, result) in report.qualified.iter().enumerate() {
        output::row(format!(
            "{:<3} {:<18} {:>5.1} {:<10} {:>14} {}",
            i + 1,
            result.symbol,
            result.score,
            result.confidence.as_str(),
            format_price(result.last_price),
            output::signed_pct(result.change_24h)
        ));
    }
}
