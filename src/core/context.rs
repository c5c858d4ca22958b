//! Build context
//!
//! Per-run state shared by every component: the scratch work root, the
//! install prefix all components install into, and the compile parallelism.

use std::path::{Path, PathBuf};

use crate::config::defaults::{BUILD_DIR_SUFFIX, LOGS_DIR};
use crate::core::registry::ComponentSpec;
use crate::error::ContextError;

/// Host platform, as far as configure flags care
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl Platform {
    /// Detect the platform this binary was built for
    pub fn host() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (as in `std::env::consts::OS`)
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Self::Linux,
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            _ => Self::Other,
        }
    }

    pub fn is_windows(self) -> bool {
        self == Self::Windows
    }
}

/// Number of compute units on this host
pub fn host_compute_units() -> usize {
    num_cpus::get()
}

/// Pick the compile parallelism: an explicit override wins verbatim
pub fn resolve_parallelism(override_jobs: Option<usize>, host_units: usize) -> usize {
    override_jobs.unwrap_or(host_units)
}

/// Paths derived for one component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentState {
    /// Checked-out sources (`work_root/name`)
    pub source_dir: PathBuf,
    /// Generator output (`work_root/name-build`)
    pub build_dir: PathBuf,
}

/// State for a single pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    work_root: PathBuf,
    install_prefix: PathBuf,
    parallelism: usize,
    platform: Platform,
    library_output_dir: Option<PathBuf>,
}

impl BuildContext {
    /// Create a context using all host compute units
    pub fn new(work_root: PathBuf, install_prefix: PathBuf) -> Self {
        Self {
            work_root,
            install_prefix,
            parallelism: host_compute_units(),
            platform: Platform::host(),
            library_output_dir: None,
        }
    }

    /// Apply a parallelism override; `None` keeps the host default
    #[must_use]
    pub fn with_parallelism(mut self, override_jobs: Option<usize>) -> Self {
        self.parallelism = resolve_parallelism(override_jobs, host_compute_units());
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Library output directory, injected on Windows hosts only
    #[must_use]
    pub fn with_library_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.library_output_dir = dir;
        self
    }

    pub fn work_root(&self) -> &Path {
        &self.work_root
    }

    pub fn install_prefix(&self) -> &Path {
        &self.install_prefix
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn library_output_dir(&self) -> Option<&Path> {
        self.library_output_dir.as_deref()
    }

    /// Directory holding per-stage logs
    pub fn logs_dir(&self) -> PathBuf {
        self.work_root.join(LOGS_DIR)
    }

    /// Derive source and build directories for a component
    pub fn component_state(&self, spec: &ComponentSpec) -> ComponentState {
        ComponentState {
            source_dir: self.work_root.join(spec.name()),
            build_dir: self
                .work_root
                .join(format!("{}{BUILD_DIR_SUFFIX}", spec.name())),
        }
    }

    /// Check the context before any stage runs
    ///
    /// Stages run with the build directory as working directory, so the work
    /// root and prefix must be absolute.
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.parallelism == 0 {
            return Err(ContextError::InvalidParallelism {
                value: self.parallelism,
            });
        }
        if !self.work_root.is_absolute() {
            return Err(ContextError::RelativePath {
                role: "work root",
                path: self.work_root.clone(),
            });
        }
        if !self.install_prefix.is_absolute() {
            return Err(ContextError::RelativePath {
                role: "install prefix",
                path: self.install_prefix.clone(),
            });
        }
        Ok(())
    }
}
