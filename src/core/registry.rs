//! Component registry
//!
//! The ordered list of components to build. List order is the build order:
//! every component is installed before the next one is configured.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::config::components::{ComponentEntry, IOWARP_COMPONENTS};
use crate::config::defaults::BUILD_DIR_SUFFIX;
use crate::error::RegistryError;

/// A single generator option, rendered as `-DKEY=VALUE`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BuildOption {
    key: String,
    value: String,
}

impl BuildOption {
    /// Create an option from a key and value
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// Option key (e.g. `HSHM_ENABLE_MPI`)
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Option value (e.g. `OFF`)
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Render as a generator define flag
    pub fn to_define(&self) -> String {
        format!("-D{}={}", self.key, self.value)
    }
}

impl fmt::Display for BuildOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Parses `KEY=VALUE`, with an optional leading `-D`
impl FromStr for BuildOption {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix("-D").unwrap_or(s);
        let Some((key, value)) = body.split_once('=') else {
            return Err(RegistryError::InvalidOption {
                value: s.to_string(),
                reason: "expected KEY=VALUE".to_string(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(RegistryError::InvalidOption {
                value: s.to_string(),
                reason: "key cannot be empty".to_string(),
            });
        }
        if key.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidOption {
                value: s.to_string(),
                reason: "key cannot contain whitespace".to_string(),
            });
        }
        Ok(Self::new(key, value))
    }
}

impl TryFrom<String> for BuildOption {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BuildOption> for String {
    fn from(option: BuildOption) -> Self {
        option.to_string()
    }
}

/// One buildable component
///
/// Fields are private: a spec is fixed once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    name: String,
    #[serde(rename = "repo")]
    source_location: String,
    #[serde(default, rename = "options")]
    build_options: Vec<BuildOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<String>,
}

impl ComponentSpec {
    /// Create a component with no options or declared dependencies
    pub fn new(name: &str, source_location: &str) -> Self {
        Self {
            name: name.to_string(),
            source_location: source_location.to_string(),
            build_options: Vec::new(),
            depends_on: Vec::new(),
        }
    }

    /// Append a generator option
    #[must_use]
    pub fn with_option(mut self, key: &str, value: &str) -> Self {
        self.build_options.push(BuildOption::new(key, value));
        self
    }

    /// Declare a component that must be installed first
    #[must_use]
    pub fn with_dependency(mut self, name: &str) -> Self {
        self.depends_on.push(name.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_location(&self) -> &str {
        &self.source_location
    }

    /// Component-specific options, in the order they are passed
    pub fn build_options(&self) -> &[BuildOption] {
        &self.build_options
    }

    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }
}

impl From<&ComponentEntry> for ComponentSpec {
    fn from(entry: &ComponentEntry) -> Self {
        let spec = entry
            .options
            .iter()
            .fold(Self::new(entry.name, entry.repo), |spec, (key, value)| {
                spec.with_option(key, value)
            });
        entry
            .depends_on
            .iter()
            .fold(spec, |spec, dep| spec.with_dependency(dep))
    }
}

/// Ordered, read-only list of components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    components: Vec<ComponentSpec>,
}

impl Registry {
    /// Create a registry; order is build order
    pub fn new(components: Vec<ComponentSpec>) -> Self {
        Self { components }
    }

    /// The built-in iowarp component stack
    pub fn builtin() -> Self {
        Self::new(IOWARP_COMPONENTS.iter().map(ComponentSpec::from).collect())
    }

    /// Components in build order
    pub fn components(&self) -> &[ComponentSpec] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Look up a component by name
    pub fn get(&self, name: &str) -> Option<&ComponentSpec> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Check names and declared dependencies
    ///
    /// Declared dependencies must appear earlier in the list. The list is
    /// never reordered.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let all: HashSet<&str> = self.components.iter().map(|c| c.name.as_str()).collect();
        let mut seen: HashSet<&str> = HashSet::new();

        for component in &self.components {
            validate_name(&component.name)?;
            if !seen.insert(component.name.as_str()) {
                return Err(RegistryError::DuplicateName {
                    name: component.name.clone(),
                });
            }
            if let Some(owner) = component
                .name
                .strip_suffix(BUILD_DIR_SUFFIX)
                .filter(|owner| all.contains(owner))
            {
                return Err(RegistryError::PathCollision {
                    name: component.name.clone(),
                    owner: owner.to_string(),
                });
            }

            for dep in &component.depends_on {
                if dep == &component.name {
                    return Err(RegistryError::SelfDependency {
                        component: component.name.clone(),
                    });
                }
                if seen.contains(dep.as_str()) {
                    continue;
                }
                if all.contains(dep.as_str()) {
                    return Err(RegistryError::OutOfOrder {
                        component: component.name.clone(),
                        dependency: dep.clone(),
                    });
                }
                return Err(RegistryError::UnknownDependency {
                    component: component.name.clone(),
                    dependency: dep.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Names become directory names under the work root
fn validate_name(name: &str) -> Result<(), RegistryError> {
    let invalid = |reason: &str| {
        Err(RegistryError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return invalid("name cannot be empty");
    }
    if name.starts_with('.') {
        return invalid("name cannot start with '.'");
    }
    if name.contains(['/', '\\']) {
        return invalid("name cannot contain path separators");
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return invalid("name cannot contain whitespace");
    }
    Ok(())
}
