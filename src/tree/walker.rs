//! Policy-aware filesystem walker with deterministic ordering

use crate::error::SyncError;
use crate::policy::Policy;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Filesystem entry types
#[derive(Debug, Clone)]
pub enum Entry {
    /// A file entry with its absolute path and path relative to the walk root
    File { path: PathBuf, relative: PathBuf },
    /// A directory entry
    Directory { path: PathBuf, relative: PathBuf },
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::File { path, .. } | Entry::Directory { path, .. } => path,
        }
    }

    pub fn relative(&self) -> &Path {
        match self {
            Entry::File { relative, .. } | Entry::Directory { relative, .. } => relative,
        }
    }

    /// Base name of the entry
    pub fn name(&self) -> String {
        self.path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Filesystem walker
///
/// Yields entries depth-first, parents before children, siblings sorted by
/// file name. Excluded entries and everything beneath them are skipped.
/// A symlink to a regular file is yielded as a file; symlinks to directories
/// and dangling links are skipped, so a walk never leaves the tree or loops.
pub struct Walker<'a> {
    root: PathBuf,
    policy: &'a Policy,
}

impl<'a> Walker<'a> {
    pub fn new(root: impl Into<PathBuf>, policy: &'a Policy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    /// Walk all non-excluded entries. A missing root yields no entries.
    pub fn walk(&self) -> Result<Vec<Entry>, SyncError> {
        self.walk_filtered(|_, _| true)
    }

    /// Walk with an extra pruning predicate, called with the entry's relative
    /// path and base name. Returning false skips the entry and its subtree.
    pub fn walk_filtered<F>(&self, mut keep: F) -> Result<Vec<Entry>, SyncError>
    where
        F: FnMut(&Path, &str) -> bool,
    {
        if !self.root.exists() {
            debug!(root = %self.root.display(), "walk root missing, nothing to visit");
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let root = self.root.as_path();
        let policy = self.policy;

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let name = entry_name(entry);
                if policy.should_exclude(&name) {
                    trace!(path = %entry.path().display(), "excluded");
                    return false;
                }
                let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
                keep(relative, &name)
            });

        for entry in walker {
            let entry = entry.map_err(|e| SyncError::Walk {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
                message: e.to_string(),
            })?;

            let path = entry.path().to_path_buf();
            let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                entries.push(Entry::Directory { path, relative });
            } else if file_type.is_file() || resolves_to_file(&path) {
                entries.push(Entry::File { path, relative });
            } else {
                debug!(path = %path.display(), "skipping directory symlink or special entry");
            }
        }

        Ok(entries)
    }
}

fn entry_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}

/// True if `path` is a symlink whose target is a regular file
fn resolves_to_file(path: &Path) -> bool {
    path.is_symlink() && fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}
