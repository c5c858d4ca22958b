//! Toolchain checks for `iowarp-build doctor`
//!
//! Probes each external tool the pipeline shells out to, plus an optional
//! C++ compiler that CMake will need later.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::core::context::host_compute_units;
use crate::core::invocation;
use crate::infra::process::CommandRunner;
use crate::infra::toolchain::Toolchain;

/// Outcome of probing one tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolStatus {
    /// The tool ran; the version is parsed from its banner when possible
    Found { version: Option<String> },
    /// The tool could not be started or exited non-zero
    Missing { error: String },
}

/// One tool check
#[derive(Debug, Clone, Serialize)]
pub struct ToolCheck {
    pub name: &'static str,
    pub program: PathBuf,
    pub required: bool,
    #[serde(flatten)]
    pub status: ToolStatus,
    /// How to install or point at the tool
    pub hint: &'static str,
}

impl ToolCheck {
    pub fn is_found(&self) -> bool {
        matches!(self.status, ToolStatus::Found { .. })
    }

    pub fn version(&self) -> Option<&str> {
        match &self.status {
            ToolStatus::Found { version } => version.as_deref(),
            ToolStatus::Missing { .. } => None,
        }
    }
}

/// Everything `doctor` reports
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub checks: Vec<ToolCheck>,
    /// Parallelism the compile stage uses without `--jobs`
    pub compute_units: usize,
}

impl DoctorReport {
    /// All required tools are runnable
    pub fn is_ready(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(ToolCheck::is_found)
    }

    pub fn missing_required(&self) -> impl Iterator<Item = &ToolCheck> {
        self.checks.iter().filter(|c| c.required && !c.is_found())
    }

    pub fn found_count(&self) -> usize {
        self.checks.iter().filter(|c| c.is_found()).count()
    }
}

/// Run `<program> --version` and parse the version it prints
pub fn probe_version<R: CommandRunner>(runner: &mut R, program: &Path) -> ToolStatus {
    let probe = invocation::probe(program);
    match runner.run(&probe) {
        Ok(output) if output.success() => ToolStatus::Found {
            version: parse_version(&output.combined()),
        },
        Ok(output) => ToolStatus::Missing {
            error: match output.status {
                Some(code) => format!("'{probe}' exited with status {code}"),
                None => format!("'{probe}' was terminated"),
            },
        },
        Err(e) => ToolStatus::Missing {
            error: format!("cannot run '{}': {e}", program.display()),
        },
    }
}

/// First dotted version number in a tool banner
fn parse_version(banner: &str) -> Option<String> {
    let pattern = regex::Regex::new(r"(\d+\.\d+(?:\.\d+)*(?:-[0-9A-Za-z.]+)?)").ok()?;
    pattern
        .captures(banner)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Probe CMake, git and the C++ compiler
pub fn run_doctor<R: CommandRunner>(runner: &mut R, toolchain: &Toolchain) -> DoctorReport {
    let targets = [
        (
            "CMake",
            toolchain.generator(),
            true,
            "Install CMake 3.20+ (https://cmake.org/download/ or 'pip install cmake'), or set IOWARP_BUILD_CMAKE",
        ),
        (
            "Git",
            toolchain.vcs(),
            true,
            "Install git from your package manager, or set IOWARP_BUILD_GIT",
        ),
        (
            "C++ compiler",
            Path::new("c++"),
            false,
            "Install a C++17 compiler such as GCC or Clang; CMake reports the exact requirement",
        ),
    ];

    let checks = targets
        .into_iter()
        .map(|(name, program, required, hint)| {
            let status = probe_version(runner, program);
            if let ToolStatus::Missing { ref error } = status {
                tracing::debug!("{name} check failed: {error}");
            }
            ToolCheck {
                name,
                program: program.to_path_buf(),
                required,
                status,
                hint,
            }
        })
        .collect();

    DoctorReport {
        checks,
        compute_units: host_compute_units(),
    }
}
