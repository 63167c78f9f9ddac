//! Additive tree synchronization from a bundle into an instance.
//!
//! Sync only ever creates directories and writes files. Entries present at
//! the destination but absent from the source are never removed, so a
//! project can keep files alongside the managed set.

use crate::error::SyncError;
use crate::policy::Policy;
use crate::tree::walker::{Entry, Walker};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Whether the destination is being populated for the first time or refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Destination starts empty; preservation rules do not apply
    Fresh,
    /// Destination exists; preserved names already present are left untouched
    Update,
}

/// What a sync did, as paths relative to the destination
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub copied: Vec<PathBuf>,
    pub preserved: Vec<PathBuf>,
    pub created_dirs: Vec<PathBuf>,
}

/// Copy every non-excluded entry of `source` into `dest`, creating `dest` if needed.
///
/// Files overwrite same-named destination files. Under [`SyncMode::Update`], a
/// source entry whose name is preserved is skipped (with its whole subtree)
/// when the destination already has an entry of that name.
pub fn sync_tree(
    source: &Path,
    dest: &Path,
    mode: SyncMode,
    policy: &Policy,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();

    if !dest.exists() {
        create_dir(dest)?;
    }

    let entries = Walker::new(source, policy).walk_filtered(|relative, name| {
        if mode == SyncMode::Update
            && policy.should_preserve(name)
            && dest.join(relative).exists()
        {
            debug!(entry = %relative.display(), "preserving existing destination entry");
            report.preserved.push(relative.to_path_buf());
            return false;
        }
        true
    })?;

    for entry in &entries {
        let target = dest.join(entry.relative());
        match entry {
            Entry::Directory { .. } => {
                if !target.is_dir() {
                    create_dir(&target)?;
                    report.created_dirs.push(entry.relative().to_path_buf());
                }
            }
            Entry::File { path, .. } => {
                fs::copy(path, &target).map_err(|source| SyncError::Copy {
                    from: path.clone(),
                    to: target.clone(),
                    source,
                })?;
                report.copied.push(entry.relative().to_path_buf());
            }
        }
    }

    debug!(
        source = %source.display(),
        dest = %dest.display(),
        mode = ?mode,
        copied = report.copied.len(),
        preserved = report.preserved.len(),
        created_dirs = report.created_dirs.len(),
        "sync complete"
    );

    Ok(report)
}

fn create_dir(path: &Path) -> Result<(), SyncError> {
    fs::create_dir_all(path).map_err(|source| SyncError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
