//! Error types for bundle installation and synchronization.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem errors raised while walking, hashing or copying a tree
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to walk {path:?}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to copy {from:?} to {to:?}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors writing the version sidecar
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to encode version metadata: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write version metadata to {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors surfaced by the lifecycle operations
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Source bundle not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Project directory not found: {0}")]
    ProjectNotFound(PathBuf),

    #[error("Already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Not initialized: {0} does not exist. Run initialize first.")]
    NotInitialized(PathBuf),

    #[error("{cause}; instance left partially synced at {instance:?}")]
    Incomplete {
        instance: PathBuf,
        #[source]
        cause: Box<InstallError>,
    },

    #[error("Sync failed: {0}")]
    Sync(#[from] SyncError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for InstallError {
    fn from(err: config::ConfigError) -> Self {
        InstallError::ConfigError(err.to_string())
    }
}

impl InstallError {
    /// Wrap a failure that happened after the instance directory was touched.
    pub fn incomplete(instance: impl Into<PathBuf>, cause: InstallError) -> Self {
        InstallError::Incomplete {
            instance: instance.into(),
            cause: Box::new(cause),
        }
    }
}
