//! iowarp-build CLI - builds the iowarp native stack
//!
//! Entry point for the iowarp-build command-line application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use iowarp_build::cli::output::display_error;
use iowarp_build::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs share stderr with errors; stdout is kept for results and JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(cli.log_level().into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    cli.output_config().apply_global();

    if let Err(e) = cli.run() {
        display_error(&e);
        std::process::exit(1);
    }
    Ok(())
}
