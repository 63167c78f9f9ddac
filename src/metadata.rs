//! Version metadata sidecar
//!
//! A small JSON document inside the installed instance recording which bundle
//! version and fingerprint it was last synced from. Reads never fail: a
//! missing or unparsable sidecar is reported through [`MetadataRead`].

use crate::error::MetadataError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Provenance of an installed instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    pub version: String,
    pub source_hash: String,
    pub source_path: PathBuf,
    pub initialized_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VersionMetadata {
    /// Metadata for a first sync: both timestamps are `now`.
    pub fn new(
        version: impl Into<String>,
        source_hash: impl Into<String>,
        source_path: impl Into<PathBuf>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            version: version.into(),
            source_hash: source_hash.into(),
            source_path: source_path.into(),
            initialized_at: now,
            updated_at: now,
        }
    }

    /// Metadata for a later sync, keeping `initialized_at`.
    pub fn refreshed(
        &self,
        version: impl Into<String>,
        source_hash: impl Into<String>,
        source_path: impl Into<PathBuf>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            version: version.into(),
            source_hash: source_hash.into(),
            source_path: source_path.into(),
            initialized_at: self.initialized_at,
            updated_at: now,
        }
    }
}

/// Outcome of reading the sidecar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataRead {
    Present(VersionMetadata),
    Absent,
    /// The sidecar exists but could not be read or parsed
    Malformed(String),
}

impl MetadataRead {
    /// Collapse to an option; malformed counts as absent.
    pub fn into_option(self) -> Option<VersionMetadata> {
        match self {
            MetadataRead::Present(metadata) => Some(metadata),
            MetadataRead::Absent | MetadataRead::Malformed(_) => None,
        }
    }
}

/// Reads and writes the sidecar of one installed instance
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(installed_path: &Path, file_name: &str) -> Self {
        Self {
            path: installed_path.join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> MetadataRead {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return MetadataRead::Absent,
            Err(e) => return MetadataRead::Malformed(format!("unreadable: {}", e)),
        };

        match serde_json::from_str(&contents) {
            Ok(metadata) => MetadataRead::Present(metadata),
            Err(e) => MetadataRead::Malformed(e.to_string()),
        }
    }

    /// Write the sidecar through a temporary file and rename.
    pub fn write(&self, metadata: &VersionMetadata) -> Result<(), MetadataError> {
        let serialized = serde_json::to_string_pretty(metadata)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, serialized).map_err(|source| MetadataError::Write {
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, &self.path).map_err(|source| {
            let _ = fs::remove_file(&temp_path);
            MetadataError::Write {
                path: self.path.clone(),
                source,
            }
        })?;

        debug!(path = %self.path.display(), version = %metadata.version, "wrote version metadata");
        Ok(())
    }
}
