//! Configuration System
//!
//! Layered configuration for the install layout, the exclusion/preservation
//! policy and logging. Layers, lowest to highest precedence: built-in
//! defaults, the global config file, the project config file, and
//! `BUNDLE_SYNC__*` environment variables.

use crate::logging::LoggingConfig;
use crate::policy::PolicyConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod loader;
mod merge;
mod sources;

pub use loader::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::project_file::PROJECT_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Conventional names inside bundles and projects
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Exclusion and preservation lists
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Conventional names the install and update operations rely on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Installed instance directory inside a project
    #[serde(default = "default_install_dir")]
    pub install_dir: String,

    /// Source-development directory that may coexist in a project; never an install target
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Version marker file inside the bundle
    #[serde(default = "default_version_file")]
    pub version_file: String,

    /// JSON sidecar inside the installed instance
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Data directories scaffolded on initialize
    #[serde(default = "default_data_dirs")]
    pub data_dirs: Vec<String>,

    /// Empty file dropped into newly scaffolded data directories
    #[serde(default = "default_marker_file")]
    pub marker_file: String,

    /// Environment template shipped in the bundle
    #[serde(default = "default_env_template")]
    pub env_template: String,

    /// Environment file materialized from the template
    #[serde(default = "default_env_file")]
    pub env_file: String,

    /// Hex characters kept from the tree digest
    #[serde(default = "default_hash_len")]
    pub hash_len: usize,
}

fn default_install_dir() -> String {
    ".auto-claude".to_string()
}

fn default_source_dir() -> String {
    "auto-claude".to_string()
}

fn default_version_file() -> String {
    "VERSION".to_string()
}

fn default_metadata_file() -> String {
    ".version.json".to_string()
}

fn default_data_dirs() -> Vec<String> {
    vec![
        "specs".to_string(),
        "roadmap".to_string(),
        "ideation".to_string(),
    ]
}

fn default_marker_file() -> String {
    ".gitkeep".to_string()
}

fn default_env_template() -> String {
    ".env.example".to_string()
}

fn default_env_file() -> String {
    ".env".to_string()
}

fn default_hash_len() -> usize {
    16
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            install_dir: default_install_dir(),
            source_dir: default_source_dir(),
            version_file: default_version_file(),
            metadata_file: default_metadata_file(),
            data_dirs: default_data_dirs(),
            marker_file: default_marker_file(),
            env_template: default_env_template(),
            env_file: default_env_file(),
            hash_len: default_hash_len(),
        }
    }
}

impl LayoutConfig {
    /// Conventional instance path for a project, whether or not it exists
    pub fn install_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.install_dir)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.install_dir.trim().is_empty() {
            return Err("install_dir cannot be empty".to_string());
        }
        if self.install_dir == self.source_dir {
            return Err(format!(
                "install_dir and source_dir must differ (both '{}')",
                self.install_dir
            ));
        }
        if self.version_file.trim().is_empty() {
            return Err("version_file cannot be empty".to_string());
        }
        if self.metadata_file.trim().is_empty() {
            return Err("metadata_file cannot be empty".to_string());
        }
        if !(8..=64).contains(&self.hash_len) {
            return Err(format!(
                "hash_len must be between 8 and 64, got {}",
                self.hash_len
            ));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Layout(String),
    Policy(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Layout(msg) => write!(f, "Layout: {}", msg),
            ValidationError::Policy(msg) => write!(f, "Policy: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl BundleConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.layout.validate() {
            errors.push(ValidationError::Layout(e));
        }
        if let Err(e) = self.policy.validate() {
            errors.push(ValidationError::Policy(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
