//! Property-based tests for determinism guarantees

use cartographer::tree::{hasher, HashTree, TreeBuilder};
use cartographer::types::NodeKind;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Relative paths built from a small alphabet so folders are shared.
fn tracked_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c]{1,2}", 1..4).prop_map(|segments| segments.join("/"))
}

/// File trees where no path is both a file and a folder.
fn file_tree() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(tracked_path(), any::<Vec<u8>>(), 0..24).prop_map(|mut files| {
        let folders: BTreeSet<String> = files
            .keys()
            .flat_map(|path| {
                let parts: Vec<&str> = path.split('/').collect();
                (1..parts.len())
                    .map(|i| parts[..i].join("/"))
                    .collect::<Vec<_>>()
            })
            .collect();
        files.retain(|path, _| !folders.contains(path));
        files
    })
}

fn build(source: &BTreeMap<String, Vec<u8>>) -> HashTree {
    let files: BTreeSet<String> = source.keys().cloned().collect();
    TreeBuilder::new(source).build_files(&files).unwrap()
}

proptest! {
    /// Same content always yields the same digest
    #[test]
    fn content_hash_is_deterministic(content in any::<Vec<u8>>()) {
        prop_assert_eq!(
            hasher::compute_content_hash(&content),
            hasher::compute_content_hash(&content.clone())
        );
    }

    /// Folder digests do not depend on the order children are supplied in
    #[test]
    fn folder_digest_ignores_child_order(
        children in prop::collection::btree_map(
            "[a-z]{1,8}",
            (any::<bool>(), any::<[u8; 32]>()),
            0..16,
        ),
        seed in any::<u64>(),
    ) {
        let mut entries: Vec<(String, NodeKind, cartographer::Digest)> = children
            .into_iter()
            .map(|(name, (is_file, bytes))| {
                let kind = if is_file { NodeKind::File } else { NodeKind::Folder };
                (name, kind, cartographer::Digest(bytes))
            })
            .collect();
        let sorted = hasher::compute_folder_digest(&entries);

        // Deterministic shuffle driven by the seed
        let len = entries.len();
        if len > 1 {
            let mut state = seed;
            for i in (1..len).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                entries.swap(i, j);
            }
        }
        prop_assert_eq!(sorted, hasher::compute_folder_digest(&entries));
    }

    /// Building twice from the same files yields identical trees that verify
    #[test]
    fn tree_build_is_deterministic(files in file_tree()) {
        let first = build(&files);
        let second = build(&files);
        prop_assert!(first.verify().is_ok());
        prop_assert_eq!(&first, &second);
        prop_assert!(first.folder_hashes.contains_key("."));
    }

    /// Every folder of the tree is the root or an ancestor of a tracked file
    #[test]
    fn folders_are_exactly_file_ancestors(files in file_tree()) {
        let tree = build(&files);
        let mut expected: BTreeSet<String> = BTreeSet::new();
        expected.insert(".".to_string());
        for path in files.keys() {
            let parts: Vec<&str> = path.split('/').collect();
            for i in 1..parts.len() {
                expected.insert(parts[..i].join("/"));
            }
        }
        let actual: BTreeSet<String> = tree.folder_hashes.keys().cloned().collect();
        prop_assert_eq!(actual, expected);
    }
}
