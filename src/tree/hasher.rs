//! Tree fingerprinting using BLAKE3

use crate::error::SyncError;
use crate::policy::Policy;
use crate::tree::walker::{Entry, Walker};
use blake3::Hasher;
use std::fs;
use std::path::Path;

/// Hex length of the full BLAKE3 digest
pub const FULL_HEX_LEN: usize = 64;

/// Compute a short fingerprint of every non-excluded entry under `root`
///
/// Entries are folded in walker order (siblings sorted by name, parents first):
/// a directory contributes `dir:<name>`, a file contributes
/// `file:<name>:<byte length>` followed by its bytes. The digest is truncated
/// to `hex_len` hex characters; it detects change, it does not authenticate.
///
/// A missing root hashes as an empty tree.
pub fn fingerprint_tree(
    root: &Path,
    policy: &Policy,
    hex_len: usize,
) -> Result<String, SyncError> {
    let entries = Walker::new(root, policy).walk()?;

    let mut hasher = Hasher::new();
    for entry in &entries {
        match entry {
            Entry::Directory { .. } => {
                hasher.update(b"dir:");
                hasher.update(entry.name().as_bytes());
            }
            Entry::File { path, .. } => {
                let content = fs::read(path).map_err(|source| SyncError::Read {
                    path: path.clone(),
                    source,
                })?;
                hasher.update(b"file:");
                hasher.update(entry.name().as_bytes());
                hasher.update(b":");
                hasher.update(content.len().to_string().as_bytes());
                hasher.update(&content);
            }
        }
    }

    Ok(truncate_hex(hasher.finalize().as_bytes(), hex_len))
}

fn truncate_hex(digest: &[u8; 32], hex_len: usize) -> String {
    let mut encoded = hex::encode(digest);
    encoded.truncate(hex_len.min(FULL_HEX_LEN));
    encoded
}
