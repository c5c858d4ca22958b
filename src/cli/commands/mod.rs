//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod clean;
pub mod doctor;
pub mod list;

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::config::defaults::{ENV_JOBS, ENV_PREFIX, ENV_WORK_DIR, SETTINGS_FILE};
use crate::core::settings::Settings;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clone, configure, build and install every component in order
    Build {
        /// Number of parallel compile jobs (defaults to all CPUs)
        #[arg(short, long, env = ENV_JOBS, value_parser = parse_jobs)]
        jobs: Option<usize>,

        /// Install prefix shared by all components
        #[arg(long, env = ENV_PREFIX, value_name = "DIR")]
        prefix: Option<PathBuf>,

        /// Scratch directory for sources and build trees
        #[arg(long, env = ENV_WORK_DIR, value_name = "DIR")]
        work_dir: Option<PathBuf>,

        /// Library output directory passed to CMake on Windows hosts
        #[arg(long, value_name = "DIR")]
        library_output_dir: Option<PathBuf>,
    },

    /// Show the components that would be built, in order
    List,

    /// Check that CMake and git are available
    Doctor,

    /// Remove sources and build trees from the work directory
    Clean {
        /// Scratch directory to clean
        #[arg(long, env = ENV_WORK_DIR, value_name = "DIR")]
        work_dir: Option<PathBuf>,

        /// Keep cloned sources, remove only build trees and logs
        #[arg(long)]
        keep_sources: bool,
    },
}

impl Commands {
    /// Execute the command
    pub fn run(self, config: Option<&Path>) -> Result<()> {
        let current_dir = std::env::current_dir()?;
        let settings = load_settings(config, &current_dir)?;

        match self {
            Self::Build {
                jobs,
                prefix,
                work_dir,
                library_output_dir,
            } => {
                let args = build::BuildArgs {
                    jobs,
                    prefix,
                    work_dir,
                    library_output_dir,
                };
                build::execute(&current_dir, &settings, &args)
            }
            Self::List => list::execute(&settings),
            Self::Doctor => doctor::execute(&settings),
            Self::Clean {
                work_dir,
                keep_sources,
            } => clean::execute(&current_dir, &settings, work_dir.as_deref(), keep_sources),
        }
    }
}

/// Load an explicit settings file, or `./iowarp-build.toml` if present
pub fn load_settings(config: Option<&Path>, current_dir: &Path) -> Result<Settings> {
    match config {
        Some(path) => Settings::load_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => {
            let path = current_dir.join(SETTINGS_FILE);
            Settings::load_or_default(&path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))
        }
    }
}

fn parse_jobs(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(jobs) => Ok(jobs),
        Err(e) => Err(e.to_string()),
    }
}
