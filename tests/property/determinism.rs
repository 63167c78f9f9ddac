//! Property-based tests for fingerprint determinism

use bundle_sync::tree::hasher::fingerprint_tree;
use bundle_sync::Policy;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_tree(root: &Path, files: &[(String, Vec<u8>)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

fn tree_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(
        "(dir[a-c]/)?file[a-z]{1,6}\\.txt",
        prop::collection::vec(any::<u8>(), 0..64),
        1..12,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Writing the same files in any order yields the same fingerprint
    #[test]
    fn fingerprint_ignores_creation_order(tree in tree_strategy(), seed in any::<u64>()) {
        let forward: Vec<_> = tree.clone().into_iter().collect();
        let mut shuffled = forward.clone();
        let len = shuffled.len();
        for i in 0..len {
            let j = (seed as usize).wrapping_add(i * 7) % len;
            shuffled.swap(i, j);
        }

        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_tree(first.path(), &forward);
        write_tree(second.path(), &shuffled);

        let policy = Policy::default();
        prop_assert_eq!(
            fingerprint_tree(first.path(), &policy, 16).unwrap(),
            fingerprint_tree(second.path(), &policy, 16).unwrap()
        );
    }

    /// Adding an excluded cache directory never changes the fingerprint
    #[test]
    fn fingerprint_ignores_excluded(
        tree in tree_strategy(),
        junk in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let files: Vec<_> = tree.into_iter().collect();
        let root = TempDir::new().unwrap();
        write_tree(root.path(), &files);

        let policy = Policy::default();
        let before = fingerprint_tree(root.path(), &policy, 16).unwrap();

        write_tree(root.path(), &[
            ("node_modules/pkg/index.js".to_string(), junk.clone()),
            ("cache.pyc".to_string(), junk),
        ]);
        let after = fingerprint_tree(root.path(), &policy, 16).unwrap();

        prop_assert_eq!(before, after);
    }
}
