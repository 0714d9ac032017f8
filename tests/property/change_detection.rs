//! Property-based tests for change detection

use cartographer::changes::{compare, differing_folders};
use cartographer::tree::{HashTree, TreeBuilder};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn tracked_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c]", 1..4).prop_map(|segments| format!("{}.f", segments.join("/")))
}

fn file_map() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(tracked_path(), prop::collection::vec(any::<u8>(), 0..4), 0..16)
}

fn build(source: &BTreeMap<String, Vec<u8>>) -> HashTree {
    let files: BTreeSet<String> = source.keys().cloned().collect();
    TreeBuilder::new(source).build_files(&files).unwrap()
}

proptest! {
    /// Affected folders are exactly the folders whose digest differs
    #[test]
    fn affected_folders_match_digest_differences(before in file_map(), after in file_map()) {
        let previous = build(&before);
        let current = build(&after);
        let changes = compare(&previous, &current);
        prop_assert_eq!(&changes.affected_folders, &differing_folders(&previous, &current));
        prop_assert_eq!(changes.is_empty(), previous.root_digest() == current.root_digest());
    }

    /// Comparing a tree with itself reports nothing
    #[test]
    fn self_comparison_is_empty(files in file_map()) {
        let tree = build(&files);
        let changes = compare(&tree, &tree);
        prop_assert!(changes.is_empty());
        prop_assert!(changes.affected_folders.is_empty());
    }

    /// Added, removed and modified sets partition the changed paths
    #[test]
    fn change_classes_are_disjoint(before in file_map(), after in file_map()) {
        let changes = compare(&build(&before), &build(&after));
        prop_assert!(changes.added_files.is_disjoint(&changes.removed_files));
        prop_assert!(changes.added_files.is_disjoint(&changes.modified_files));
        prop_assert!(changes.removed_files.is_disjoint(&changes.modified_files));
        for path in &changes.added_files {
            prop_assert!(after.contains_key(path) && !before.contains_key(path));
        }
        for path in &changes.removed_files {
            prop_assert!(before.contains_key(path) && !after.contains_key(path));
        }
        for path in &changes.modified_files {
            prop_assert!(before[path] != after[path]);
        }
    }
}
