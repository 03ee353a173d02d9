// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! rk - roomkeeper CLI

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, resolve, run, times};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rk",
    version,
    about = "rk keeps rooms at the values their schedules prescribe"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a configuration
    Check(check::CheckArgs),
    /// Print the times at which schedules are re-evaluated
    Times(times::TimesArgs),
    /// Resolve schedules without touching any device
    Resolve(resolve::ResolveArgs),
    /// Keep every configured room scheduled until interrupted
    Run(run::RunArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check(args) => check::handle(args),
        Commands::Times(args) => times::handle(args),
        Commands::Resolve(args) => resolve::handle(args),
        Commands::Run(args) => run::handle(args).await,
    }
}
