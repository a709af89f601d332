//! Pareidolia - mock neural audio service
//!
//! Command-line entry point for the HTTP server and offline processing.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pareidolia::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Pareidolia v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve(args) => commands::serve(args).await?,
        Commands::Process(args) => {
            tokio::task::spawn_blocking(move || commands::process(args)).await??
        }
    }

    Ok(())
}
