//! CLI command for `iowarp-build doctor`
//!
//! Reports whether CMake and git can be run, and exits non-zero when a
//! required tool is missing.

use anyhow::{bail, Result};

use crate::cli::output::{is_json, is_quiet, print_detail, print_info, print_success, print_warning, status};
use crate::core::doctor::{run_doctor, DoctorReport, ToolCheck, ToolStatus};
use crate::core::settings::Settings;
use crate::infra::process::SystemRunner;
use crate::infra::toolchain::Toolchain;

/// Git revision and target this binary was built from
fn build_info() -> (&'static str, &'static str) {
    (
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown"),
    )
}

/// Execute the doctor command
pub fn execute(settings: &Settings) -> Result<()> {
    let toolchain = Toolchain::discover(settings.tools.cmake.as_deref(), settings.tools.git.as_deref());
    let report = run_doctor(&mut SystemRunner::new(), &toolchain);

    if is_json() {
        let (revision, target) = build_info();
        let json_result = serde_json::json!({
            "ready": report.is_ready(),
            "version": env!("CARGO_PKG_VERSION"),
            "revision": revision,
            "target": target,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&json_result)?);
    } else if !is_quiet() {
        print_report(&report);
    }

    let missing: Vec<&str> = report.missing_required().map(|c| c.name).collect();
    if !missing.is_empty() {
        if is_quiet() {
            for name in &missing {
                eprintln!("{} Missing required: {name}", status::ERROR);
            }
        }
        bail!("Missing required build tools: {}", missing.join(", "));
    }
    Ok(())
}

fn print_report(report: &DoctorReport) {
    let (revision, target) = build_info();
    print_info(&format!(
        "iowarp-build {} ({revision}, {target})",
        env!("CARGO_PKG_VERSION")
    ));
    println!();

    for check in &report.checks {
        print_check(check);
    }

    println!();
    print_detail(&format!("Default parallel jobs: {}", report.compute_units));

    let found = report.found_count();
    let total = report.checks.len();
    if found == total {
        print_success(&format!("All checks passed ({found}/{total})"));
    } else if report.is_ready() {
        print_warning(&format!("{found}/{total} checks passed (optional tools missing)"));
    } else {
        println!("{} {found}/{total} checks passed", status::ERROR);
    }
}

fn print_check(check: &ToolCheck) {
    let optional = if check.required { "" } else { " [optional]" };
    match &check.status {
        ToolStatus::Found { version } => {
            let version = version.as_deref().map(|v| format!(" {v}")).unwrap_or_default();
            println!(
                "  {} {}{version}{optional} ({})",
                status::SUCCESS,
                check.name,
                check.program.display()
            );
        }
        ToolStatus::Missing { error } => {
            println!("  {} {}{optional}", status::ERROR, check.name);
            print_detail(error);
            print_detail(&format!("hint: {}", check.hint));
        }
    }
}
