use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use pumpwatch::adapter::inbound::cli::command::{CheckCommand, Cli, Commands};
use pumpwatch::adapter::inbound::cli::output::{self, OutputConfig};
use pumpwatch::adapter::inbound::cli::{check, diagnostic, movers, report, run};
use pumpwatch::error::Error;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet), cli.color);
    let config_path = cli.command.config_path().map(Path::to_path_buf);

    match dispatch(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(config_path.as_deref(), &err);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run(args) => run::execute(&args).await?,
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args.config)?,
        Commands::Movers(args) => movers::execute(&args.config, args.limit)
            .await
            .context("failed to fetch movers")?,
        Commands::Report(args) => report::execute(&args.config, args.path.as_deref(), args.top)
            .context("failed to read signal journal")?,
    }
    Ok(())
}

/// Config errors get a source-annotated miette report; everything else is
/// printed as a plain error chain.
fn report_error(config_path: Option<&Path>, err: &anyhow::Error) {
    if let (Some(path), Some(Error::Config(config_err))) = (config_path, err.downcast_ref::<Error>()) {
        if !output::is_json() {
            if let Some(diagnostic) = diagnostic::config_diagnostic(path, config_err) {
                eprintln!("{:?}", miette::Report::new(diagnostic));
                return;
            }
        }
    }
    output::error(&format!("{err:#}"));
}
