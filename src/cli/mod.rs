//! Command-line interface module
//!
//! Argument parsing and user-facing output. Building, cleaning and tool
//! checks are implemented in [`crate::core`].

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing::Level;

use commands::Commands;
use output::OutputConfig;

/// iowarp-build - build the iowarp native stack
///
/// Clones, configures, builds and installs each component in order into a
/// shared prefix.
#[derive(Parser, Debug)]
#[command(name = "iowarp-build")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// More log output (-v for progress, -vv for every tool call)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Settings file (defaults to ./iowarp-build.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Output mode selected by the global flags
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::new(self.quiet, self.json, self.verbose)
    }

    /// Default log level; `RUST_LOG` directives are applied on top
    pub fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }

    /// Execute the selected subcommand, or print help without one
    pub fn run(self) -> Result<()> {
        let Some(command) = self.command else {
            Self::command().print_help()?;
            return Ok(());
        };
        command.run(self.config.as_deref())
    }
}
