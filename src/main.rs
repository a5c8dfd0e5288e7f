//! apichain - run chained API test scenarios
//!
//! Calls each API of a scenario in dependency order, feeding values from
//! earlier responses into later requests, and records every response.

use clap::Parser;
use apichain::{cli, commands, common::logging};
use commands::Commands;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apichain", about = "Chained API scenario runner")]
#[command(version, long_about = None)]
struct Cli {
    /// Project directory holding apichain.toml and the scenario files
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Show debug logs and response bodies
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Also write logs to the apichain log file
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Hold the guard so the log file is flushed on exit
    let _log_guard = if cli.log_file {
        logging::init_with_file(cli.verbose).map(|(guard, path)| {
            tracing::debug!("Logging to {}", path.display());
            guard
        })
    } else {
        logging::init_cli(cli.verbose);
        None
    };

    match cli::dispatch(&cli.project, cli.verbose, cli.command).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
