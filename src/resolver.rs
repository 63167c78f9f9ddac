//! Version resolution: is a project initialized, and does its bundle have an update?

use crate::config::LayoutConfig;
use crate::error::{InstallError, SyncError};
use crate::metadata::{MetadataRead, MetadataStore, VersionMetadata};
use crate::policy::Policy;
use crate::tree::hasher::fingerprint_tree;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Version reported when the bundle has no usable version marker
pub const UNKNOWN_VERSION: &str = "0.0.0";

/// Freshly computed on every check; never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionCheckResult {
    pub is_initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_version: Option<String>,
    pub update_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

impl VersionCheckResult {
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// Initialized, but staleness cannot be determined
    pub fn initialized(current_version: Option<String>) -> Self {
        Self {
            is_initialized: true,
            current_version,
            ..Self::default()
        }
    }
}

/// An update is reported only when both the content and the version moved.
pub fn is_update_available(stored: &VersionMetadata, live_version: &str, live_hash: &str) -> bool {
    stored.source_hash != live_hash && stored.version != live_version
}

/// Read the bundle version marker: first line, trimmed.
///
/// A missing or blank marker yields [`UNKNOWN_VERSION`].
pub fn read_bundle_version(source: &Path, version_file: &str) -> String {
    let path = source.join(version_file);
    let Ok(contents) = fs::read_to_string(&path) else {
        debug!(path = %path.display(), "no version marker, assuming {}", UNKNOWN_VERSION);
        return UNKNOWN_VERSION.to_string();
    };

    match contents.lines().next().map(str::trim) {
        Some(line) if !line.is_empty() => line.to_string(),
        _ => UNKNOWN_VERSION.to_string(),
    }
}

/// Canonical form of an existing path; the path unchanged if it cannot be resolved.
pub fn resolve_path(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Answers version questions for projects under one layout and policy
pub struct VersionResolver<'a> {
    layout: &'a LayoutConfig,
    policy: &'a Policy,
}

impl<'a> VersionResolver<'a> {
    pub fn new(layout: &'a LayoutConfig, policy: &'a Policy) -> Self {
        Self { layout, policy }
    }

    pub fn bundle_version(&self, source: &Path) -> String {
        read_bundle_version(source, &self.layout.version_file)
    }

    pub fn fingerprint(&self, dir: &Path) -> Result<String, SyncError> {
        fingerprint_tree(dir, self.policy, self.layout.hash_len)
    }

    pub fn metadata_store(&self, installed: &Path) -> MetadataStore {
        MetadataStore::new(installed, &self.layout.metadata_file)
    }

    /// Compare a project's installed instance against the bundle at `source`.
    ///
    /// An instance without a sidecar gets one synthesized from the bundle's
    /// version and the installed tree's own fingerprint, persisted so that
    /// synthesis happens once.
    pub fn check(&self, project: &Path, source: &Path) -> Result<VersionCheckResult, InstallError> {
        let installed = self.layout.install_path(project);
        if !installed.is_dir() {
            return Ok(VersionCheckResult::uninitialized());
        }

        let source_exists = source.is_dir();
        let store = self.metadata_store(&installed);

        let metadata = match store.read() {
            MetadataRead::Present(metadata) => Some(metadata),
            MetadataRead::Malformed(reason) => {
                warn!(
                    path = %store.path().display(),
                    %reason,
                    "ignoring malformed version metadata"
                );
                None
            }
            MetadataRead::Absent => None,
        };

        let metadata = match metadata {
            Some(metadata) => Some(metadata),
            None if source_exists => Some(self.synthesize(&installed, source, &store)?),
            None => None,
        };

        let Some(metadata) = metadata else {
            return Ok(VersionCheckResult::initialized(None));
        };

        if !source_exists {
            return Ok(VersionCheckResult::initialized(Some(metadata.version)));
        }

        let source_version = self.bundle_version(source);
        let source_hash = self.fingerprint(source)?;
        let update_available = is_update_available(&metadata, &source_version, &source_hash);

        debug!(
            installed = %installed.display(),
            current = %metadata.version,
            source = %source_version,
            stored_hash = %metadata.source_hash,
            source_hash = %source_hash,
            update_available,
            "version check"
        );

        Ok(VersionCheckResult {
            is_initialized: true,
            current_version: Some(metadata.version),
            source_version: Some(source_version),
            update_available,
            source_path: Some(source.to_path_buf()),
        })
    }

    /// Baseline metadata for an instance that predates version tracking.
    fn synthesize(
        &self,
        installed: &Path,
        source: &Path,
        store: &MetadataStore,
    ) -> Result<VersionMetadata, InstallError> {
        let metadata = VersionMetadata::new(
            self.bundle_version(source),
            self.fingerprint(installed)?,
            resolve_path(source),
            Utc::now(),
        );
        store.write(&metadata)?;
        info!(
            installed = %installed.display(),
            version = %metadata.version,
            "synthesized version metadata for untracked instance"
        );
        Ok(metadata)
    }
}
