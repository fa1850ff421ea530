//! Command-line interface definitions.
//!
//! Defines the CLI structure for the pumpwatch scanner using `clap`: running
//! the scan loop, validating configuration, listing top movers and
//! summarizing the signal journal.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use super::paths;

/// Perpetual futures pump-detection scanner
#[derive(Parser, Debug)]
#[command(name = "pumpwatch")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the pumpwatch CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scanner (foreground)
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// List the largest 24h movers on the exchange
    Movers(MoversArgs),

    /// Summarize the signal journal
    Report(ReportArgs),
}

impl Commands {
    /// Configuration file the command reads, if any.
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Self::Run(args) => Some(&args.config),
            Self::Check(CheckCommand::Config(args)) => Some(&args.config),
            Self::Movers(args) => Some(&args.config),
            Self::Report(args) => Some(&args.config),
        }
    }
}

/// Subcommands for `pumpwatch check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file syntax and semantics.
    Config(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
///
/// All optional fields override the corresponding configuration file values.
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,

    /// Run a single scan cycle and exit.
    #[arg(long)]
    pub once: bool,

    /// Override the number of concurrent deep analyses.
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Override the minimum final score for an alert.
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Skip the startup banner.
    #[arg(long)]
    pub no_banner: bool,

    /// Enable Telegram alerts.
    #[arg(long)]
    pub telegram: bool,
}

/// Arguments for the `movers` subcommand.
#[derive(Parser, Debug)]
pub struct MoversArgs {
    /// Path to the configuration file (exchange settings only).
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Number of symbols to list.
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}

/// Arguments for the `report` subcommand.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Path to the configuration file (journal location).
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// Journal file; overrides `[journal] path`.
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Number of symbols to list.
    #[arg(long, default_value = "10")]
    pub top: usize,
}
