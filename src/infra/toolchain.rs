//! Toolchain management
//!
//! Locates the build-system generator (CMake) and the version-control client
//! (git). Both are external programs; this module only decides which path to
//! run.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::defaults::{ENV_GENERATOR, ENV_VCS, GENERATOR_PROGRAM, VCS_PROGRAM};

/// Programs the pipeline shells out to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    generator: PathBuf,
    vcs: PathBuf,
}

impl Toolchain {
    pub fn new(generator: PathBuf, vcs: PathBuf) -> Self {
        Self { generator, vcs }
    }

    /// Resolve both tools from the environment
    ///
    /// Priority: environment variable > configured path > `PATH` lookup >
    /// bare program name.
    pub fn discover(generator: Option<&Path>, vcs: Option<&Path>) -> Self {
        Self {
            generator: locate(ENV_GENERATOR, generator, GENERATOR_PROGRAM),
            vcs: locate(ENV_VCS, vcs, VCS_PROGRAM),
        }
    }

    /// Path to the build-system generator
    pub fn generator(&self) -> &Path {
        &self.generator
    }

    /// Path to the version-control client
    pub fn vcs(&self) -> &Path {
        &self.vcs
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new(PathBuf::from(GENERATOR_PROGRAM), PathBuf::from(VCS_PROGRAM))
    }
}

fn locate(env_var: &str, configured: Option<&Path>, program: &str) -> PathBuf {
    if let Some(path) = env::var_os(env_var).filter(|v| !v.is_empty()) {
        return PathBuf::from(path);
    }
    if let Some(path) = configured {
        return path.to_path_buf();
    }
    which::which(program).unwrap_or_else(|_| {
        tracing::debug!("{program} not found in PATH");
        PathBuf::from(program)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_bare_names() {
        let toolchain = Toolchain::default();
        assert_eq!(toolchain.generator(), Path::new("cmake"));
        assert_eq!(toolchain.vcs(), Path::new("git"));
    }

    #[test]
    fn test_configured_path_used_without_env_override() {
        let located = locate(
            "IOWARP_BUILD_TEST_UNSET_VARIABLE",
            Some(Path::new("/opt/cmake/bin/cmake")),
            "cmake",
        );
        assert_eq!(located, PathBuf::from("/opt/cmake/bin/cmake"));
    }

    #[test]
    fn test_unknown_program_falls_back_to_name() {
        let located = locate(
            "IOWARP_BUILD_TEST_UNSET_VARIABLE",
            None,
            "iowarp-build-no-such-tool",
        );
        assert_eq!(located, PathBuf::from("iowarp-build-no-such-tool"));
    }
}
