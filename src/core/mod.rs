//! Core business logic module
//!
//! Orchestration logic lives here. Process spawning and host lookups belong
//! in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`registry`] - Component specs and the ordered registry
//! - [`context`] - Per-run build context and derived component paths
//! - [`invocation`] - Command lines for clone, configure, build and install
//! - [`pipeline`] - Sequential fail-fast executor
//! - [`settings`] - `iowarp-build.toml` parsing
//! - [`doctor`] - Toolchain checks
//! - [`clean`] - Work root cleanup

pub mod clean;
pub mod context;
pub mod doctor;
pub mod invocation;
pub mod pipeline;
pub mod registry;
pub mod settings;
