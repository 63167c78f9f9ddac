//! Exclusion and preservation rules over entry base names.
//!
//! Exclusion removes an entry from the managed tree entirely: it is never
//! hashed and never copied. Preservation only matters when updating an
//! existing instance: a preserved name that already exists at the destination
//! is left alone even if the bundle ships a newer copy.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Names and suffix wildcards that never enter the managed tree.
const BUILTIN_EXCLUDE: &[&str] = &[
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    "node_modules",
    ".venv",
    "venv",
    ".git",
    ".DS_Store",
    ".env",
    ".version.json",
    "specs",
    "roadmap",
    "ideation",
    "*.pyc",
    "*.pyo",
    "*.log",
];

/// Project-owned names an update must not overwrite.
const BUILTIN_PRESERVE: &[&str] = &["specs", "roadmap", "ideation", ".env"];

/// Serializable policy lists, as read from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Literal names, or `*.ext` suffix wildcards
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Literal names left untouched at the destination during updates
    #[serde(default = "default_preserve")]
    pub preserve: Vec<String>,
}

fn default_exclude() -> Vec<String> {
    BUILTIN_EXCLUDE.iter().map(|s| s.to_string()).collect()
}

fn default_preserve() -> Vec<String> {
    BUILTIN_PRESERVE.iter().map(|s| s.to_string()).collect()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            preserve: default_preserve(),
        }
    }
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<(), String> {
        for pattern in self.exclude.iter().chain(self.preserve.iter()) {
            if pattern.trim().is_empty() {
                return Err("Policy patterns cannot be empty".to_string());
            }
        }
        for name in &self.preserve {
            if name.starts_with('*') {
                return Err(format!(
                    "Preserve entries must be literal names, got '{}'",
                    name
                ));
            }
        }
        Ok(())
    }
}

/// Immutable classifier built once from a [`PolicyConfig`].
#[derive(Debug, Clone)]
pub struct Policy {
    exclude_names: HashSet<String>,
    exclude_suffixes: Vec<String>,
    preserve_names: HashSet<String>,
}

impl Policy {
    pub fn new(config: &PolicyConfig) -> Self {
        let mut exclude_names = HashSet::new();
        let mut exclude_suffixes = Vec::new();
        for pattern in &config.exclude {
            match pattern.strip_prefix('*') {
                Some(suffix) => exclude_suffixes.push(suffix.to_string()),
                None => {
                    exclude_names.insert(pattern.clone());
                }
            }
        }

        Self {
            exclude_names,
            exclude_suffixes,
            preserve_names: config.preserve.iter().cloned().collect(),
        }
    }

    /// True if `name` is an excluded literal or ends with an excluded suffix.
    pub fn should_exclude(&self, name: &str) -> bool {
        self.exclude_names.contains(name)
            || self
                .exclude_suffixes
                .iter()
                .any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// True if an existing destination entry named `name` survives updates.
    pub fn should_preserve(&self, name: &str) -> bool {
        self.preserve_names.contains(name)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}

impl From<&PolicyConfig> for Policy {
    fn from(config: &PolicyConfig) -> Self {
        Self::new(config)
    }
}
