//! External tool invocations
//!
//! Pure builders for every command the pipeline runs. Nothing here spawns a
//! process; see [`crate::infra::process`] for that.
//!
//! Arguments are kept as `OsString` so paths reach the tools byte for byte,
//! even when they are not valid UTF-8.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::defaults::BUILD_PROFILE;
use crate::core::context::{BuildContext, ComponentState};
use crate::core::registry::ComponentSpec;

/// A command line plus the directory it runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run
    pub program: PathBuf,
    /// Arguments, in order
    pub args: Vec<OsString>,
    /// Working directory (inherited when `None`)
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
            args: Vec::new(),
            cwd: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }
}

/// Lossy rendering for logs only; never parsed back into arguments
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// `-D<key>=<value>` without converting `value` to UTF-8
fn define(key: &str, value: impl AsRef<OsStr>) -> OsString {
    let mut flag = OsString::from(format!("-D{key}="));
    flag.push(value);
    flag
}

/// `<tool> --version`
pub fn probe(program: &Path) -> Invocation {
    Invocation::new(program).arg("--version")
}

/// Full recursive clone of the component into its source directory
pub fn clone_repo(vcs: &Path, spec: &ComponentSpec, ctx: &BuildContext, state: &ComponentState) -> Invocation {
    Invocation::new(vcs)
        .args(["clone", "--recursive", spec.source_location()])
        .arg(state.source_dir.as_os_str())
        .current_dir(ctx.work_root())
}

/// Configure flags, shared defaults first and component options last
pub fn configure_args(spec: &ComponentSpec, ctx: &BuildContext) -> Vec<OsString> {
    let mut args = vec![
        define("CMAKE_INSTALL_PREFIX", ctx.install_prefix()),
        define("CMAKE_BUILD_TYPE", BUILD_PROFILE),
        define("BUILD_SHARED_LIBS", "ON"),
        define("BUILD_TESTING", "OFF"),
    ];

    if ctx.platform().is_windows() {
        if let Some(dir) = ctx.library_output_dir() {
            args.push(define("CMAKE_LIBRARY_OUTPUT_DIRECTORY", dir));
        }
    }

    args.extend(spec.build_options().iter().map(|option| option.to_define().into()));
    args
}

/// `cmake <source_dir> <flags...>` run inside the build directory
pub fn configure(
    generator: &Path,
    spec: &ComponentSpec,
    ctx: &BuildContext,
    state: &ComponentState,
) -> Invocation {
    Invocation::new(generator)
        .arg(state.source_dir.as_os_str())
        .args(configure_args(spec, ctx))
        .current_dir(&state.build_dir)
}

/// `cmake --build . --config Release --parallel N`
pub fn compile(generator: &Path, ctx: &BuildContext, state: &ComponentState) -> Invocation {
    Invocation::new(generator)
        .args(["--build", ".", "--config", BUILD_PROFILE, "--parallel"])
        .arg(ctx.parallelism().to_string())
        .current_dir(&state.build_dir)
}

/// `cmake --install .`
pub fn install(generator: &Path, state: &ComponentState) -> Invocation {
    Invocation::new(generator)
        .args(["--install", "."])
        .current_dir(&state.build_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Platform;
    use proptest::prelude::*;

    fn context() -> BuildContext {
        BuildContext::new(
            std::env::temp_dir().join("work"),
            std::env::temp_dir().join("prefix"),
        )
        .with_platform(Platform::Linux)
        .with_parallelism(Some(6))
    }

    #[test]
    fn test_clone_repo_is_full_and_recursive() {
        let ctx = context();
        let spec = ComponentSpec::new("runtime", "https://github.com/iowarp/runtime");
        let state = ctx.component_state(&spec);

        let inv = clone_repo(Path::new("git"), &spec, &ctx, &state);

        assert_eq!(inv.args[0], "clone");
        assert!(inv.args.iter().any(|a| a == "--recursive"));
        assert!(!inv.args.iter().any(|a| a.to_string_lossy().starts_with("--depth")));
        assert_eq!(inv.args[2], "https://github.com/iowarp/runtime");
        assert_eq!(inv.args[3], state.source_dir.as_os_str());
        assert_eq!(inv.cwd.as_deref(), Some(ctx.work_root()));
    }

    #[test]
    fn test_configure_shared_defaults() {
        let ctx = context();
        let spec = ComponentSpec::new("runtime", "https://github.com/iowarp/runtime");

        let args = configure_args(&spec, &ctx);

        assert_eq!(
            args,
            vec![
                OsString::from(format!("-DCMAKE_INSTALL_PREFIX={}", ctx.install_prefix().display())),
                OsString::from("-DCMAKE_BUILD_TYPE=Release"),
                OsString::from("-DBUILD_SHARED_LIBS=ON"),
                OsString::from("-DBUILD_TESTING=OFF"),
            ]
        );
    }

    #[test]
    fn test_configure_runs_in_build_dir_against_source_dir() {
        let ctx = context();
        let spec = ComponentSpec::new("runtime", "https://github.com/iowarp/runtime");
        let state = ctx.component_state(&spec);

        let inv = configure(Path::new("cmake"), &spec, &ctx, &state);

        assert_eq!(inv.args[0], state.source_dir.as_os_str());
        assert_eq!(inv.cwd, Some(state.build_dir));
    }

    #[test]
    fn test_component_option_overrides_shared_default() {
        let ctx = context();
        let spec = ComponentSpec::new("x", "https://example.com/x").with_option("BUILD_SHARED_LIBS", "OFF");

        let args = configure_args(&spec, &ctx);
        let shared = args.iter().position(|a| a == "-DBUILD_SHARED_LIBS=ON").unwrap();
        let custom = args.iter().position(|a| a == "-DBUILD_SHARED_LIBS=OFF").unwrap();

        assert!(shared < custom);
        assert_eq!(args.last().unwrap(), "-DBUILD_SHARED_LIBS=OFF");
    }

    #[test]
    fn test_library_output_dir_only_on_windows() {
        let dir = std::env::temp_dir().join("lib-out");
        let spec = ComponentSpec::new("x", "https://example.com/x").with_option("A", "1");

        let linux = context().with_library_output_dir(Some(dir.clone()));
        assert!(!configure_args(&spec, &linux)
            .iter()
            .any(|a| a.to_string_lossy().starts_with("-DCMAKE_LIBRARY_OUTPUT_DIRECTORY")));

        let windows = linux.with_platform(Platform::Windows);
        let args = configure_args(&spec, &windows);
        let flag = OsString::from(format!("-DCMAKE_LIBRARY_OUTPUT_DIRECTORY={}", dir.display()));
        let position = args.iter().position(|a| a == &flag).unwrap();
        assert_eq!(position, 4);
        assert_eq!(args.last().unwrap(), "-DA=1");
    }

    #[test]
    fn test_compile_and_install() {
        let ctx = context();
        let spec = ComponentSpec::new("runtime", "https://github.com/iowarp/runtime");
        let state = ctx.component_state(&spec);

        let build = compile(Path::new("cmake"), &ctx, &state);
        assert_eq!(build.args, vec!["--build", ".", "--config", "Release", "--parallel", "6"]);
        assert_eq!(build.cwd.as_ref(), Some(&state.build_dir));

        let inst = install(Path::new("cmake"), &state);
        assert_eq!(inst.args, vec!["--install", "."]);
        assert_eq!(inst.cwd, Some(state.build_dir));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_paths_pass_through_unchanged() {
        use std::os::unix::ffi::OsStrExt;

        let odd = OsStr::from_bytes(b"w\xFFrk");
        let ctx = BuildContext::new(
            std::env::temp_dir().join(odd).join("work"),
            std::env::temp_dir().join(odd).join("prefix"),
        )
        .with_platform(Platform::Linux);
        let spec = ComponentSpec::new("runtime", "https://github.com/iowarp/runtime");
        let state = ctx.component_state(&spec);

        let clone = clone_repo(Path::new("git"), &spec, &ctx, &state);
        assert_eq!(clone.args[3], state.source_dir.as_os_str());

        let inv = configure(Path::new("cmake"), &spec, &ctx, &state);
        assert_eq!(inv.args[0], state.source_dir.as_os_str());
        let mut prefix_flag = OsString::from("-DCMAKE_INSTALL_PREFIX=");
        prefix_flag.push(ctx.install_prefix());
        assert_eq!(inv.args[1], prefix_flag);
        assert!(inv.args[1].as_bytes().ends_with(b"w\xFFrk/prefix"));

        assert!(inv.to_string().contains('\u{FFFD}'));
    }

    #[test]
    fn test_display_quotes_arguments_with_spaces() {
        let inv = Invocation::new(Path::new("cmake")).args(["-DFLAGS=-O2 -g", "."]);
        assert_eq!(inv.to_string(), "cmake \"-DFLAGS=-O2 -g\" .");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Component options always come after every shared default, in order
        #[test]
        fn prop_component_options_follow_defaults(
            options in proptest::collection::vec(("[A-Z][A-Z_]{0,12}", "[A-Z0-9]{0,6}"), 0..8),
        ) {
            let ctx = context();
            let spec = options
                .iter()
                .fold(ComponentSpec::new("x", "https://example.com/x"), |s, (k, v)| s.with_option(k, v));

            let args = configure_args(&spec, &ctx);
            let expected: Vec<OsString> = options.iter().map(|(k, v)| OsString::from(format!("-D{k}={v}"))).collect();

            prop_assert_eq!(args.len(), 4 + expected.len());
            prop_assert_eq!(&args[4..], expected.as_slice());
            prop_assert!(args[0].to_string_lossy().starts_with("-DCMAKE_INSTALL_PREFIX="));
        }
    }
}
