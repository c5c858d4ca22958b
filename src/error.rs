//! Error types for iowarp-build
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::defaults::OUTPUT_TAIL_LINES;
use crate::core::pipeline::Stage;

/// Registry validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two entries share a name
    #[error("Component '{name}' is listed more than once")]
    DuplicateName { name: String },

    /// Name cannot be used as a directory name
    #[error("Component name '{name}' is invalid: {reason}")]
    InvalidName { name: String, reason: String },

    /// Name clashes with another component's build directory
    #[error("Component '{name}' collides with the build directory of '{owner}'")]
    PathCollision { name: String, owner: String },

    /// Dependency names a component that is not in the registry
    #[error("Missing dependency: '{dependency}' required by '{component}'")]
    UnknownDependency {
        component: String,
        dependency: String,
    },

    /// Component lists itself as a dependency
    #[error("Component '{component}' depends on itself")]
    SelfDependency { component: String },

    /// Dependency is listed after the component that needs it
    #[error("Component '{component}' depends on '{dependency}', which is listed after it")]
    OutOfOrder {
        component: String,
        dependency: String,
    },

    /// Build option is not of the form KEY=VALUE
    #[error("Invalid build option '{value}': {reason}")]
    InvalidOption { value: String, reason: String },
}

/// Build context errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// Parallelism must be at least one
    #[error("Invalid parallelism {value}: must be greater than 0")]
    InvalidParallelism { value: usize },

    /// Path must be absolute because stages run in different directories
    #[error("The {role} path '{path}' must be absolute")]
    RelativePath { role: &'static str, path: PathBuf },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to read a directory tree
    #[error("Failed to read '{path}': {error}")]
    ReadDir { path: PathBuf, error: String },

    /// Failed to remove a directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },
}

/// Build pipeline errors
///
/// Stage failures carry the component name, the exit status of the external
/// tool (`None` if it was killed by a signal or could not be started) and its
/// captured output.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Registry failed validation before any work started
    #[error("Invalid registry: {0}")]
    InvalidRegistry(#[from] RegistryError),

    /// Build context failed validation before any work started
    #[error("Invalid build context: {0}")]
    InvalidContext(#[from] ContextError),

    /// Generator or version-control client is not usable
    #[error("Toolchain not found: {tool} ({error})")]
    ToolchainMissing { tool: String, error: String },

    /// Scratch or build directory could not be created
    #[error("Failed to prepare directory '{path}': {error}")]
    Workspace { path: PathBuf, error: String },

    /// Clone failed
    #[error("Failed to acquire sources for '{component}' ({}){}", describe_status(.status), output_tail(.output))]
    AcquisitionFailed {
        component: String,
        status: Option<i32>,
        output: String,
    },

    /// Configure step failed
    #[error("Configuration failed for '{component}' ({}){}", describe_status(.status), output_tail(.output))]
    ConfigurationFailed {
        component: String,
        status: Option<i32>,
        output: String,
    },

    /// Compile step failed
    #[error("Compilation failed for '{component}' ({}){}", describe_status(.status), output_tail(.output))]
    CompileFailed {
        component: String,
        status: Option<i32>,
        output: String,
    },

    /// Install step failed
    #[error("Installation failed for '{component}' ({}){}", describe_status(.status), output_tail(.output))]
    InstallFailed {
        component: String,
        status: Option<i32>,
        output: String,
    },
}

impl BuildError {
    /// Build the error matching a failed stage
    pub fn stage_failed(stage: Stage, component: &str, status: Option<i32>, output: String) -> Self {
        let component = component.to_string();
        match stage {
            Stage::Acquire => Self::AcquisitionFailed {
                component,
                status,
                output,
            },
            Stage::Configure => Self::ConfigurationFailed {
                component,
                status,
                output,
            },
            Stage::Compile => Self::CompileFailed {
                component,
                status,
                output,
            },
            Stage::Install => Self::InstallFailed {
                component,
                status,
                output,
            },
        }
    }

    /// Component the error belongs to, if any
    pub fn component(&self) -> Option<&str> {
        match self {
            Self::AcquisitionFailed { component, .. }
            | Self::ConfigurationFailed { component, .. }
            | Self::CompileFailed { component, .. }
            | Self::InstallFailed { component, .. } => Some(component),
            _ => None,
        }
    }

    /// Stage that failed, if the error came from a stage
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::AcquisitionFailed { .. } => Some(Stage::Acquire),
            Self::ConfigurationFailed { .. } => Some(Stage::Configure),
            Self::CompileFailed { .. } => Some(Stage::Compile),
            Self::InstallFailed { .. } => Some(Stage::Install),
            _ => None,
        }
    }

    /// Exit status of the failed tool, if it exited normally
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            Self::AcquisitionFailed { status, .. }
            | Self::ConfigurationFailed { status, .. }
            | Self::CompileFailed { status, .. }
            | Self::InstallFailed { status, .. } => *status,
            _ => None,
        }
    }
}

#[allow(clippy::ref_option)]
fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "terminated without exit status".to_string(),
    }
}

/// Last lines of captured tool output, prefixed with a newline
pub(crate) fn output_tail(output: &str) -> String {
    let lines: Vec<&str> = output.trim_end().lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let start = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
    format!("\n{}", lines[start..].join("\n"))
}
