//! Build pipeline executor
//!
//! Drives every registry component through acquire, configure, compile and
//! install, in registry order. The first failure stops the run; components
//! after it are never touched and nothing already installed is rolled back.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::core::context::{BuildContext, ComponentState};
use crate::core::invocation::{self, Invocation};
use crate::core::registry::{ComponentSpec, Registry};
use crate::error::BuildError;
use crate::infra::process::CommandRunner;
use crate::infra::toolchain::Toolchain;

/// Pipeline stage for a single component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Acquire,
    Configure,
    Compile,
    Install,
}

impl Stage {
    /// All stages, in execution order
    pub const ALL: [Stage; 4] = [
        Stage::Acquire,
        Stage::Configure,
        Stage::Compile,
        Stage::Install,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Acquire => "acquire",
            Self::Configure => "configure",
            Self::Compile => "compile",
            Self::Install => "install",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reported when a stage starts
#[derive(Debug, Clone, Copy)]
pub struct StageEvent<'a> {
    /// Zero-based position of the component in the registry
    pub index: usize,
    /// Number of components in the run
    pub total: usize,
    pub component: &'a ComponentSpec,
    pub stage: Stage,
}

type Observer<'o> = Box<dyn FnMut(&StageEvent<'_>) + 'o>;

/// Sequential, fail-fast build pipeline
pub struct Pipeline<'o, R> {
    runner: R,
    toolchain: Toolchain,
    observer: Option<Observer<'o>>,
}

impl<'o, R: CommandRunner> Pipeline<'o, R> {
    pub fn new(runner: R, toolchain: Toolchain) -> Self {
        Self {
            runner,
            toolchain,
            observer: None,
        }
    }

    /// Register a callback invoked as each stage starts
    #[must_use]
    pub fn on_stage(mut self, observer: impl FnMut(&StageEvent<'_>) + 'o) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Build every component in registry order
    ///
    /// The registry, the context and both tools are checked before anything
    /// is written to disk.
    pub fn run(&mut self, registry: &Registry, ctx: &BuildContext) -> Result<(), BuildError> {
        registry.validate()?;
        ctx.validate()?;
        self.probe_toolchain()?;
        prepare_work_root(ctx)?;

        let total = registry.len();
        tracing::info!(
            "Building into {} (components: {total}, jobs: {})",
            ctx.install_prefix().display(),
            ctx.parallelism()
        );

        for (index, spec) in registry.components().iter().enumerate() {
            self.build_component(index, total, spec, ctx)?;
        }

        tracing::info!("Installed components: {total}");
        Ok(())
    }

    /// Check that the generator and the version-control client run
    pub fn probe_toolchain(&mut self) -> Result<(), BuildError> {
        let tools = [
            ("CMake", self.toolchain.generator().to_path_buf()),
            ("git", self.toolchain.vcs().to_path_buf()),
        ];

        for (tool, program) in tools {
            let probe = invocation::probe(&program);
            match self.runner.run(&probe) {
                Ok(output) if output.success() => {
                    let version = output.stdout.lines().next().unwrap_or_default();
                    tracing::debug!("Found {tool}: {}", version.trim());
                }
                Ok(output) => {
                    return Err(BuildError::ToolchainMissing {
                        tool: tool.to_string(),
                        error: format!("'{probe}' exited with status {:?}", output.status),
                    });
                }
                Err(e) => {
                    return Err(BuildError::ToolchainMissing {
                        tool: tool.to_string(),
                        error: format!("cannot run '{}': {e}", program.display()),
                    });
                }
            }
        }

        Ok(())
    }

    /// Acquire, configure, compile and install a single component
    pub fn build_one(&mut self, spec: &ComponentSpec, ctx: &BuildContext) -> Result<(), BuildError> {
        ctx.validate()?;
        prepare_work_root(ctx)?;
        self.build_component(0, 1, spec, ctx)
    }

    fn build_component(
        &mut self,
        index: usize,
        total: usize,
        spec: &ComponentSpec,
        ctx: &BuildContext,
    ) -> Result<(), BuildError> {
        tracing::info!("[{}/{total}] Building component: {}", index + 1, spec.name());
        let state = ctx.component_state(spec);

        for stage in Stage::ALL {
            if let Some(observer) = self.observer.as_mut() {
                observer(&StageEvent {
                    index,
                    total,
                    component: spec,
                    stage,
                });
            }

            match stage {
                Stage::Acquire => self.acquire(spec, ctx, &state)?,
                Stage::Configure => self.configure(spec, ctx, &state)?,
                Stage::Compile => {
                    let inv = invocation::compile(self.toolchain.generator(), ctx, &state);
                    self.execute(stage, spec, ctx, &inv)?;
                }
                Stage::Install => {
                    let inv = invocation::install(self.toolchain.generator(), &state);
                    self.execute(stage, spec, ctx, &inv)?;
                }
            }
        }

        tracing::info!("{} built and installed", spec.name());
        Ok(())
    }

    /// Clone unless the source directory already exists
    ///
    /// An existing checkout is reused as-is, without fetching updates.
    fn acquire(
        &mut self,
        spec: &ComponentSpec,
        ctx: &BuildContext,
        state: &ComponentState,
    ) -> Result<(), BuildError> {
        if state.source_dir.exists() {
            tracing::info!("Using existing source at {}", state.source_dir.display());
            return Ok(());
        }

        tracing::info!("Cloning {}", spec.source_location());
        let inv = invocation::clone_repo(self.toolchain.vcs(), spec, ctx, state);
        self.execute(Stage::Acquire, spec, ctx, &inv)
    }

    fn configure(
        &mut self,
        spec: &ComponentSpec,
        ctx: &BuildContext,
        state: &ComponentState,
    ) -> Result<(), BuildError> {
        create_dir(&state.build_dir)?;
        let inv = invocation::configure(self.toolchain.generator(), spec, ctx, state);
        self.execute(Stage::Configure, spec, ctx, &inv)
    }

    /// Run one invocation and map its outcome to the stage's error
    fn execute(
        &mut self,
        stage: Stage,
        spec: &ComponentSpec,
        ctx: &BuildContext,
        inv: &Invocation,
    ) -> Result<(), BuildError> {
        tracing::debug!("{} {stage}: {inv}", spec.name());

        let output = match self.runner.run(inv) {
            Ok(output) => output,
            Err(e) => {
                let message = format!("failed to start '{}': {e}", inv.program.display());
                return Err(BuildError::stage_failed(stage, spec.name(), None, message));
            }
        };

        let combined = output.combined();
        write_stage_log(ctx, spec, stage, inv, &combined);

        if output.success() {
            Ok(())
        } else {
            Err(BuildError::stage_failed(
                stage,
                spec.name(),
                output.status,
                combined,
            ))
        }
    }
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|e| BuildError::Workspace {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

fn prepare_work_root(ctx: &BuildContext) -> Result<(), BuildError> {
    create_dir(ctx.work_root())?;
    create_dir(&ctx.logs_dir())
}

/// Keep the tool output next to the build; failures here only warn
fn write_stage_log(
    ctx: &BuildContext,
    spec: &ComponentSpec,
    stage: Stage,
    inv: &Invocation,
    output: &str,
) {
    let path = ctx.logs_dir().join(format!("{}.{stage}.log", spec.name()));
    if let Err(e) = fs::write(&path, format!("$ {inv}\n\n{output}")) {
        tracing::warn!("Failed to write log {}: {e}", path.display());
    }
}
