//! Default configuration values

/// Build-system generator program name
pub const GENERATOR_PROGRAM: &str = "cmake";

/// Version-control client program name
pub const VCS_PROGRAM: &str = "git";

/// Optimization profile passed to configure and build
pub const BUILD_PROFILE: &str = "Release";

/// Suffix appended to a component name to form its build directory
pub const BUILD_DIR_SUFFIX: &str = "-build";

/// Directory under the work root holding per-stage logs
pub const LOGS_DIR: &str = ".logs";

/// Default work root, relative to the current directory
pub const DEFAULT_WORK_DIR: &str = "build/iowarp";

/// Settings file picked up from the current directory
pub const SETTINGS_FILE: &str = "iowarp-build.toml";

/// Number of output lines shown when a tool fails
pub const OUTPUT_TAIL_LINES: usize = 20;

/// Override for the generator program
pub const ENV_GENERATOR: &str = "IOWARP_BUILD_CMAKE";

/// Override for the version-control program
pub const ENV_VCS: &str = "IOWARP_BUILD_GIT";

/// Override for the install prefix
pub const ENV_PREFIX: &str = "IOWARP_PREFIX";

/// Override for the work root
pub const ENV_WORK_DIR: &str = "IOWARP_BUILD_WORK_DIR";

/// Override for compile parallelism
pub const ENV_JOBS: &str = "IOWARP_BUILD_JOBS";
