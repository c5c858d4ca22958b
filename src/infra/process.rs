//! External process execution
//!
//! Every stage of the pipeline is one blocking process invocation. The
//! [`CommandRunner`] trait is the seam between the pipeline and the host.

use std::io;
use std::process::{Command, Stdio};

use crate::core::invocation::Invocation;

/// Exit status and captured output of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// A process that exited with `code` and printed nothing
    pub fn exited(code: i32) -> Self {
        Self {
            status: Some(code),
            ..Self::default()
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Stdout followed by stderr
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

/// Runs an invocation to completion
///
/// `Err` means the process could not be started at all; a non-zero exit is
/// reported through [`ProcessOutput::status`].
pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<ProcessOutput>;
}

/// Runs invocations as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        tracing::debug!("Running: {invocation}");

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).stdin(Stdio::null());
        if let Some(ref cwd) = invocation.cwd {
            command.current_dir(cwd);
        }

        let output = command.output()?;

        Ok(ProcessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
