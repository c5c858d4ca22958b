//! Settings file (`iowarp-build.toml`)
//!
//! Optional per-project defaults for the build command, tool locations and a
//! replacement component list. Command-line flags and environment variables
//! take precedence over anything set here.
//!
//! ```toml
//! [build]
//! jobs = 8
//! prefix = "/opt/iowarp"
//!
//! [tools]
//! cmake = "/usr/bin/cmake"
//!
//! [[component]]
//! name = "runtime"
//! repo = "https://github.com/iowarp/runtime"
//! options = ["FOO=ON"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::registry::{ComponentSpec, Registry};

/// Settings error types
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read settings file
    #[error("Failed to read settings file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse settings file
    #[error("Failed to parse settings file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Contents of a settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Build defaults
    #[serde(default)]
    pub build: BuildSettings,

    /// Tool locations
    #[serde(default)]
    pub tools: ToolSettings,

    /// Components, replacing the built-in list when non-empty
    #[serde(default, rename = "component", skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentSpec>,
}

/// Default build options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Compile parallelism
    pub jobs: Option<usize>,

    /// Install prefix
    pub prefix: Option<PathBuf>,

    /// Scratch directory for sources and build trees
    pub work_dir: Option<PathBuf>,

    /// Library output directory (Windows hosts only)
    pub library_output_dir: Option<PathBuf>,
}

/// Tool locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Build-system generator
    pub cmake: Option<PathBuf>,

    /// Version-control client
    pub git: Option<PathBuf>,
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load settings from a file that must exist
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|e| SettingsError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Load settings if the file exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(path)
    }

    /// Registry to build: the file's components, or the built-in stack
    pub fn registry(&self) -> Registry {
        if self.components.is_empty() {
            Registry::builtin()
        } else {
            Registry::new(self.components.clone())
        }
    }
}
