//! Configuration and constants
//!
//! - [`defaults`] - Tool names, build profile and directory conventions
//! - [`components`] - The built-in component table

pub mod components;
pub mod defaults;
