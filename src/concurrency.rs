//! Per-project mutual exclusion for lifecycle operations.
//!
//! Locks are in-process only and keyed by the resolved instance path, so two
//! spellings of the same project serialize against each other. Nothing here
//! protects against a second process touching the same instance.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

/// Hands out one mutex per instance path
#[derive(Debug, Default)]
pub struct ProjectLockManager {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl ProjectLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `key`.
    pub fn with_lock<R>(&self, key: &Path, f: impl FnOnce() -> R) -> R {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(key.to_path_buf()).or_default())
        };

        let result = {
            let _guard = lock.lock();
            trace!(key = %key.display(), "project lock acquired");
            f()
        };

        // Drop the map entry once no other caller holds or waits on it
        let mut locks = self.locks.lock();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(key);
        }
        result
    }

    /// Number of keys currently tracked
    pub fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}
