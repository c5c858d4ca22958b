//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use iowarp_build::core::context::BuildContext;
use iowarp_build::core::invocation::Invocation;
use iowarp_build::core::pipeline::Stage;
use iowarp_build::core::registry::{ComponentSpec, Registry};
use iowarp_build::infra::process::{CommandRunner, ProcessOutput};

/// Test project context
///
/// Creates a temporary directory holding a work root and an install prefix.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn work_root(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    pub fn prefix(&self) -> PathBuf {
        self.dir.path().join("prefix")
    }

    /// Build context rooted in this project
    pub fn context(&self, jobs: usize) -> BuildContext {
        BuildContext::new(self.work_root(), self.prefix()).with_parallelism(Some(jobs))
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        std::fs::create_dir_all(self.dir.path().join(name)).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of `count` components named `c0`, `c1`, ...
pub fn registry_of(count: usize) -> Registry {
    Registry::new(
        (0..count)
            .map(|i| ComponentSpec::new(&format!("c{i}"), &format!("https://example.com/c{i}.git")))
            .collect(),
    )
}

/// One recorded tool call, classified by component and stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Probe(PathBuf),
    Stage(String, Stage),
}

/// Fake toolchain that records every call
///
/// Clones create the source directory and installs drop a library into the
/// prefix, so the filesystem looks like a real run afterwards.
pub struct RecordingRunner {
    pub prefix: PathBuf,
    pub calls: Vec<Call>,
    pub invocations: Vec<Invocation>,
    /// Return exit status 1 for this component and stage
    pub fail_on: Option<(String, Stage)>,
    /// Spawning this program fails as if it were not installed
    pub missing_program: Option<PathBuf>,
}

impl RecordingRunner {
    pub fn new(prefix: &Path) -> Self {
        Self {
            prefix: prefix.to_path_buf(),
            calls: Vec::new(),
            invocations: Vec::new(),
            fail_on: None,
            missing_program: None,
        }
    }

    #[must_use]
    pub fn failing_on(mut self, component: &str, stage: Stage) -> Self {
        self.fail_on = Some((component.to_string(), stage));
        self
    }

    #[must_use]
    pub fn missing(mut self, program: &str) -> Self {
        self.missing_program = Some(PathBuf::from(program));
        self
    }

    /// Stage calls only, without the toolchain probes
    pub fn stage_calls(&self) -> Vec<(String, Stage)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Stage(name, stage) => Some((name.clone(), *stage)),
                Call::Probe(_) => None,
            })
            .collect()
    }

    /// Components that had at least one stage invoked, in first-seen order
    pub fn touched_components(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for (name, _) in self.stage_calls() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Position of a stage call in the recorded sequence
    pub fn position(&self, component: &str, stage: Stage) -> Option<usize> {
        self.calls
            .iter()
            .position(|call| *call == Call::Stage(component.to_string(), stage))
    }

    pub fn invocation_for(&self, component: &str, stage: Stage) -> Option<&Invocation> {
        self.position(component, stage).map(|i| &self.invocations[i])
    }

    fn classify(invocation: &Invocation) -> Call {
        let first = invocation.args.first();
        let is = |flag: &str| first.is_some_and(|arg| arg == flag);
        let build_dir_name = || {
            invocation
                .cwd
                .as_deref()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().trim_end_matches("-build").to_string())
                .unwrap_or_default()
        };
        let file_name = |arg: &OsStr| {
            Path::new(arg)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        };

        match first {
            None => Call::Probe(invocation.program.clone()),
            Some(_) if is("--version") => Call::Probe(invocation.program.clone()),
            Some(_) if is("clone") => Call::Stage(file_name(invocation.args[3].as_os_str()), Stage::Acquire),
            Some(_) if is("--build") => Call::Stage(build_dir_name(), Stage::Compile),
            Some(_) if is("--install") => Call::Stage(build_dir_name(), Stage::Install),
            Some(source_dir) => Call::Stage(file_name(source_dir.as_os_str()), Stage::Configure),
        }
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        let call = Self::classify(invocation);
        self.calls.push(call.clone());
        self.invocations.push(invocation.clone());

        if self.missing_program.as_ref() == Some(&invocation.program) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "program not found"));
        }

        let Call::Stage(name, stage) = call else {
            return Ok(ProcessOutput {
                status: Some(0),
                stdout: format!("{} version 1.0.0\n", invocation.program.display()),
                stderr: String::new(),
            });
        };

        if self.fail_on.as_ref() == Some(&(name.clone(), stage)) {
            return Ok(ProcessOutput {
                status: Some(1),
                stdout: String::new(),
                stderr: format!("{stage} of {name} failed"),
            });
        }

        match stage {
            Stage::Acquire => std::fs::create_dir_all(&invocation.args[3])?,
            Stage::Install => {
                let lib_dir = self.prefix.join("lib");
                std::fs::create_dir_all(&lib_dir)?;
                std::fs::write(lib_dir.join(format!("lib{name}.so")), b"")?;
            }
            Stage::Configure | Stage::Compile => {}
        }

        Ok(ProcessOutput::exited(0))
    }
}
