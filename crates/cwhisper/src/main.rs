//! cwhisper - A CLI for the code-assistant service

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod banner;
mod cli;
mod commands;
mod output;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose > 0 {
        match cli.verbose {
            1 => "cwhisper=debug,cwhisper_client=debug,cwhisper_core=debug",
            _ => "cwhisper=trace,cwhisper_client=trace,cwhisper_core=trace",
        }
    } else if cli.quiet {
        "error"
    } else {
        "cwhisper=info,cwhisper_client=warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(EnvFilter::new(filter))
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    cli.run().await
}
