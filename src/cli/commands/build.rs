//! Build command implementation
//!
//! Implements `iowarp-build build`: resolves the build context from flags,
//! environment and settings, then runs the pipeline with real processes.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::output::{counted, create_build_bar, is_json, print_info, print_success};
use crate::core::context::BuildContext;
use crate::core::pipeline::{Pipeline, Stage};
use crate::core::registry::Registry;
use crate::core::settings::Settings;
use crate::error::BuildError;
use crate::infra::dirs;
use crate::infra::process::SystemRunner;
use crate::infra::toolchain::Toolchain;

/// Build options from the command line
#[derive(Debug, Default)]
pub struct BuildArgs {
    /// Number of parallel jobs
    pub jobs: Option<usize>,
    /// Install prefix
    pub prefix: Option<PathBuf>,
    /// Work root
    pub work_dir: Option<PathBuf>,
    /// Library output directory (Windows)
    pub library_output_dir: Option<PathBuf>,
}

/// Resolve the build context
///
/// Priority: command line (including environment) > settings file > host
/// defaults. Relative paths are taken relative to `current_dir`.
pub fn resolve_context(current_dir: &Path, settings: &Settings, args: &BuildArgs) -> BuildContext {
    let work_root = args
        .work_dir
        .clone()
        .or_else(|| settings.build.work_dir.clone())
        .unwrap_or_else(|| dirs::default_work_root(current_dir));
    let prefix = args
        .prefix
        .clone()
        .or_else(|| settings.build.prefix.clone())
        .unwrap_or_else(dirs::runtime_install_prefix);
    let library_output_dir = args
        .library_output_dir
        .clone()
        .or_else(|| settings.build.library_output_dir.clone())
        .map(|dir| dirs::absolutize(&dir, current_dir));

    BuildContext::new(
        dirs::absolutize(&work_root, current_dir),
        dirs::absolutize(&prefix, current_dir),
    )
    .with_parallelism(args.jobs.or(settings.build.jobs))
    .with_library_output_dir(library_output_dir)
}

/// One-line summary printed before the pipeline starts
fn build_summary(ctx: &BuildContext, components: usize) -> String {
    format!(
        "Building {} into {} (jobs: {})",
        counted(components, "component"),
        ctx.install_prefix().display(),
        ctx.parallelism()
    )
}

fn success_report(registry: &Registry, ctx: &BuildContext) -> serde_json::Value {
    let components: Vec<&str> = registry.components().iter().map(|spec| spec.name()).collect();
    serde_json::json!({
        "status": "success",
        "components": components,
        "install_prefix": ctx.install_prefix(),
        "parallelism": ctx.parallelism(),
    })
}

fn failure_report(error: &BuildError, ctx: &BuildContext) -> serde_json::Value {
    serde_json::json!({
        "status": "error",
        "error": error.to_string(),
        "component": error.component(),
        "stage": error.stage().map(Stage::as_str),
        "exit_status": error.exit_status(),
        "logs_dir": error.component().map(|_| ctx.logs_dir()),
    })
}

/// Execute the build command
pub fn execute(current_dir: &Path, settings: &Settings, args: &BuildArgs) -> Result<()> {
    let registry = settings.registry();
    let ctx = resolve_context(current_dir, settings, args);
    let toolchain = Toolchain::discover(settings.tools.cmake.as_deref(), settings.tools.git.as_deref());

    if !is_json() {
        print_info(&build_summary(&ctx, registry.len()));
    }

    let bar = create_build_bar(registry.len() as u64);
    let progress = bar.clone();
    let mut pipeline = Pipeline::new(SystemRunner::new(), toolchain).on_stage(move |event| {
        progress.set_position(event.index as u64);
        progress.set_message(format!("{}: {}", event.component.name(), event.stage));
    });

    let result = pipeline.run(&registry, &ctx);

    match result {
        Ok(()) => {
            bar.set_position(registry.len() as u64);
            bar.finish_and_clear();
            if is_json() {
                println!("{}", serde_json::to_string_pretty(&success_report(&registry, &ctx))?);
            } else {
                print_success(&format!(
                    "Installed {} into {}",
                    counted(registry.len(), "component"),
                    ctx.install_prefix().display()
                ));
            }
            Ok(())
        }
        Err(e) => {
            bar.abandon();
            if is_json() {
                println!("{}", serde_json::to_string_pretty(&failure_report(&e, &ctx))?);
            }
            if e.component().is_some() {
                tracing::info!("Stage logs are in {}", ctx.logs_dir().display());
            }
            Err(e).context("Build failed")
        }
    }
}
