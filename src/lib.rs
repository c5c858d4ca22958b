//! iowarp-build - ordered multi-repository CMake builds
//!
//! This library clones, configures, compiles and installs the iowarp native
//! components one after another into a shared install prefix, stopping at
//! the first failure.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Registry, build context, invocations and the pipeline
//! - [`infra`] - Infrastructure layer (processes, tool discovery, directories)
//! - [`config`] - Built-in component list and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
