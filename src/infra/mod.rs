//! Infrastructure layer
//!
//! Handles external processes and host environment lookups.

pub mod dirs;
pub mod process;
pub mod toolchain;
