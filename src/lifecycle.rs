//! Lifecycle operations: initialize, update, check, and locate an installed instance.
//!
//! These are the entry points for callers. They never return `Err`: every
//! failure becomes an [`InitializationResult`] with `success: false`.
//! A failure after copying started leaves the partially written instance in
//! place; the sidecar is written last, so such an instance never claims a
//! completed sync.

use crate::concurrency::ProjectLockManager;
use crate::config::{BundleConfig, LayoutConfig};
use crate::error::{InstallError, SyncError};
use crate::metadata::VersionMetadata;
use crate::policy::Policy;
use crate::resolver::{resolve_path, VersionCheckResult, VersionResolver};
use crate::tree::sync::{sync_tree, SyncMode, SyncReport};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of `initialize` or `update`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub was_update: Option<bool>,
}

impl InitializationResult {
    pub fn succeeded(version: String, was_update: bool) -> Self {
        Self {
            success: true,
            error: None,
            version: Some(version),
            was_update: Some(was_update),
        }
    }

    pub fn failed(error: &InstallError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            version: None,
            was_update: None,
        }
    }
}

/// What a successful sync produced, before it is flattened into a result
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub metadata: VersionMetadata,
    pub report: SyncReport,
}

/// Installs and updates bundle copies inside projects
pub struct Installer {
    layout: LayoutConfig,
    policy: Policy,
    locks: ProjectLockManager,
}

impl Default for Installer {
    fn default() -> Self {
        Self::new(&BundleConfig::default())
    }
}

impl Installer {
    pub fn new(config: &BundleConfig) -> Self {
        Self::with_parts(config.layout.clone(), Policy::new(&config.policy))
    }

    pub fn with_parts(layout: LayoutConfig, policy: Policy) -> Self {
        Self {
            layout,
            policy,
            locks: ProjectLockManager::new(),
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    fn resolver(&self) -> VersionResolver<'_> {
        VersionResolver::new(&self.layout, &self.policy)
    }

    /// Lock key: the resolved instance path, even before the instance exists
    fn lock_key(&self, project: &Path) -> PathBuf {
        self.layout.install_path(&resolve_path(project))
    }

    /// Path of the installed instance, only if it exists.
    ///
    /// The coexisting source-development directory is never returned.
    pub fn install_path(&self, project: &Path) -> Option<PathBuf> {
        let installed = self.layout.install_path(project);
        installed.is_dir().then_some(installed)
    }

    /// Version check that degrades failures to a non-update answer.
    pub fn check_version(&self, project: &Path, source: &Path) -> VersionCheckResult {
        match self.try_check_version(project, source) {
            Ok(result) => result,
            Err(e) => {
                warn!(project = %project.display(), error = %e, "version check failed");
                VersionCheckResult {
                    is_initialized: self.install_path(project).is_some(),
                    ..VersionCheckResult::default()
                }
            }
        }
    }

    pub fn try_check_version(
        &self,
        project: &Path,
        source: &Path,
    ) -> Result<VersionCheckResult, InstallError> {
        self.locks
            .with_lock(&self.lock_key(project), || self.resolver().check(project, source))
    }

    pub fn initialize(&self, project: &Path, source: &Path) -> InitializationResult {
        match self.try_initialize(project, source) {
            Ok(outcome) => InitializationResult::succeeded(outcome.metadata.version, false),
            Err(e) => {
                warn!(project = %project.display(), error = %e, "initialize failed");
                InitializationResult::failed(&e)
            }
        }
    }

    pub fn update(&self, project: &Path, source: &Path) -> InitializationResult {
        match self.try_update(project, source) {
            Ok(outcome) => InitializationResult::succeeded(outcome.metadata.version, true),
            Err(e) => {
                warn!(project = %project.display(), error = %e, "update failed");
                InitializationResult::failed(&e)
            }
        }
    }

    /// Copy the bundle into a project that has no instance yet.
    pub fn try_initialize(
        &self,
        project: &Path,
        source: &Path,
    ) -> Result<SyncOutcome, InstallError> {
        self.locks.with_lock(&self.lock_key(project), || {
            if !source.is_dir() {
                return Err(InstallError::SourceNotFound(source.to_path_buf()));
            }
            if !project.is_dir() {
                return Err(InstallError::ProjectNotFound(project.to_path_buf()));
            }
            let installed = self.layout.install_path(project);
            if installed.exists() {
                return Err(InstallError::AlreadyInitialized(installed));
            }

            self.populate(source, &installed)
                .map_err(|e| InstallError::incomplete(&installed, e))
        })
    }

    /// Refresh an existing instance from the bundle, keeping preserved entries.
    pub fn try_update(&self, project: &Path, source: &Path) -> Result<SyncOutcome, InstallError> {
        self.locks.with_lock(&self.lock_key(project), || {
            if !source.is_dir() {
                return Err(InstallError::SourceNotFound(source.to_path_buf()));
            }
            let installed = self.layout.install_path(project);
            if !installed.is_dir() {
                return Err(InstallError::NotInitialized(installed));
            }

            self.refresh(source, &installed)
                .map_err(|e| InstallError::incomplete(&installed, e))
        })
    }

    fn populate(&self, source: &Path, installed: &Path) -> Result<SyncOutcome, InstallError> {
        let report = sync_tree(source, installed, SyncMode::Fresh, &self.policy)?;
        self.scaffold_data_dirs(installed)?;
        self.materialize_env(source, installed)?;

        let resolver = self.resolver();
        let metadata = VersionMetadata::new(
            resolver.bundle_version(source),
            resolver.fingerprint(source)?,
            resolve_path(source),
            Utc::now(),
        );
        resolver.metadata_store(installed).write(&metadata)?;

        info!(
            installed = %installed.display(),
            version = %metadata.version,
            copied = report.copied.len(),
            "initialized bundle"
        );
        Ok(SyncOutcome { metadata, report })
    }

    fn refresh(&self, source: &Path, installed: &Path) -> Result<SyncOutcome, InstallError> {
        let report = sync_tree(source, installed, SyncMode::Update, &self.policy)?;

        let resolver = self.resolver();
        let store = resolver.metadata_store(installed);
        let version = resolver.bundle_version(source);
        let source_hash = resolver.fingerprint(source)?;
        let now = Utc::now();

        let metadata = match store.read().into_option() {
            Some(previous) => previous.refreshed(version, source_hash, resolve_path(source), now),
            None => VersionMetadata::new(version, source_hash, resolve_path(source), now),
        };
        store.write(&metadata)?;

        info!(
            installed = %installed.display(),
            version = %metadata.version,
            copied = report.copied.len(),
            preserved = report.preserved.len(),
            "updated bundle"
        );
        Ok(SyncOutcome { metadata, report })
    }

    /// Ensure each data directory exists; new ones get an empty marker file.
    fn scaffold_data_dirs(&self, installed: &Path) -> Result<(), InstallError> {
        for name in &self.layout.data_dirs {
            let dir = installed.join(name);
            if dir.exists() {
                continue;
            }
            fs::create_dir_all(&dir).map_err(|source| SyncError::CreateDir {
                path: dir.clone(),
                source,
            })?;
            let marker = dir.join(&self.layout.marker_file);
            fs::write(&marker, b"").map_err(|source| SyncError::Write {
                path: marker.clone(),
                source,
            })?;
            debug!(dir = %dir.display(), "scaffolded data directory");
        }
        Ok(())
    }

    /// Copy the env template to the env file unless the env file already exists.
    fn materialize_env(&self, source: &Path, installed: &Path) -> Result<(), InstallError> {
        let template = source.join(&self.layout.env_template);
        let env_file = installed.join(&self.layout.env_file);
        if !template.is_file() || env_file.exists() {
            return Ok(());
        }

        fs::copy(&template, &env_file).map_err(|source| SyncError::Copy {
            from: template.clone(),
            to: env_file.clone(),
            source,
        })?;
        debug!(env_file = %env_file.display(), "created env file from template");
        Ok(())
    }
}
