//! Host directory resolution
//!
//! Default install prefix and work root. The install prefix follows the
//! active runtime environment so installed libraries land next to the
//! interpreter that will load them:
//! - `CONDA_PREFIX` when a conda environment is active
//! - `VIRTUAL_ENV` when a virtualenv is active
//! - `~/.local` otherwise
//!
//! `IOWARP_PREFIX` and `IOWARP_BUILD_WORK_DIR` overrides are handled by the
//! CLI before these defaults are consulted.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::defaults::DEFAULT_WORK_DIR;

/// Environment variables naming an active runtime prefix, in priority order
pub const RUNTIME_PREFIX_VARS: &[&str] = &["CONDA_PREFIX", "VIRTUAL_ENV"];

/// Fallback when no home directory can be determined
const SYSTEM_PREFIX: &str = "/usr/local";

/// Install prefix of the active runtime environment
pub fn runtime_install_prefix() -> PathBuf {
    resolve_install_prefix(|var| env::var(var).ok(), dirs::home_dir())
}

/// Resolve the prefix from a variable lookup and a home directory
pub fn resolve_install_prefix<F>(lookup: F, home: Option<PathBuf>) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    for var in RUNTIME_PREFIX_VARS {
        if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
            return PathBuf::from(value);
        }
    }
    home.map_or_else(|| PathBuf::from(SYSTEM_PREFIX), |h| h.join(".local"))
}

/// Default work root under `base`
pub fn default_work_root(base: &Path) -> PathBuf {
    base.join(DEFAULT_WORK_DIR)
}

/// Make `path` absolute relative to `base`
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
