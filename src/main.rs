//! Haetae - incremental task runner
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use haetae::cli::{Cli, Commands};
use haetae::config::{ConfigLocation, ConfigResolver};
use haetae::error::HaetaeResult;
use haetae::tracker::Tracker;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> HaetaeResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("haetae=warn"),
        1 => EnvFilter::new("haetae=info"),
        _ => EnvFilter::new("haetae=debug"),
    };

    // Logs go to stderr; stdout carries JSON for `env` and `records`
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Init command doesn't need config loading
    if let Commands::Init(args) = cli.command {
        return haetae::cli::commands::init(args).await;
    }

    let location = ConfigLocation::from_process(cli.config)?;
    let config = ConfigResolver::default().resolve(&location).await?;
    debug!("Using config {}", config.config_file.display());

    let store = cli.store.map(|path| location.cwd.join(path));
    let store = store.as_deref();
    let tracker = Tracker::new(config);

    // Dispatch to command
    match cli.command {
        Commands::Init(_) => unreachable!("Init handled above"),
        Commands::Run(args) => haetae::cli::commands::run(args, &tracker, store).await,
        Commands::Env(args) => haetae::cli::commands::env(args, &tracker).await,
        Commands::Records(args) => haetae::cli::commands::records(args, &tracker, store).await,
        Commands::Info => haetae::cli::commands::info(&tracker, store).await,
    }
}
