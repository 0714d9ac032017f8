//! Integration tests for snapshot persistence

use super::test_utils::{fixture, strings};
use cartographer::store::{JsonSnapshotStore, Snapshot, SnapshotStore, FORMAT_VERSION};
use cartographer::tree::{FsContentSource, HashTree, Resolver, ResolverConfig, TreeBuilder};
use cartographer::CartographyError;
use std::fs;
use std::path::Path;

fn snapshot_of(root: &Path, include: &[&str]) -> (HashTree, Snapshot) {
    let config = ResolverConfig::new(strings(include), vec!["**/*.tmp".to_string()]);
    let scope = Resolver::new(root, &config).unwrap().resolve().unwrap();
    let source = FsContentSource::for_scope(&scope);
    let tree = TreeBuilder::new(&source).build(&scope).unwrap();
    let snapshot = Snapshot::from_tree(&tree, &config.include, &config.exclude);
    (tree, snapshot)
}

#[test]
fn test_save_load_roundtrip() {
    let temp_dir = fixture(&[("src/a.ts", "a"), ("src/lib/b.ts", "b"), ("README.md", "r")]);
    let store = JsonSnapshotStore::new();
    let (tree, snapshot) = snapshot_of(temp_dir.path(), &["**/*"]);

    store.save(temp_dir.path(), &snapshot).unwrap();
    let loaded = store.load(temp_dir.path()).unwrap();

    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.tree(), tree);
    assert_eq!(loaded.metadata.format_version, FORMAT_VERSION);
    assert_eq!(loaded.metadata.include_patterns, strings(&["**/*"]));
    assert_eq!(loaded.metadata.exclude_patterns, strings(&["**/*.tmp"]));
}

#[test]
fn test_record_layout_on_disk() {
    let temp_dir = fixture(&[("src/a.ts", "a")]);
    let store = JsonSnapshotStore::new();
    let (_, snapshot) = snapshot_of(temp_dir.path(), &["**/*.ts"]);
    store.save(temp_dir.path(), &snapshot).unwrap();

    let path = temp_dir.path().join(".slim").join("cartography.json");
    assert_eq!(JsonSnapshotStore::state_path(temp_dir.path()), path);

    let value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    let timestamp = value["metadata"]["last_run_timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    let digest = value["file_hashes"]["src/a.ts"].as_str().unwrap();
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert!(value["folder_hashes"]["."].is_string());
    assert!(value["folder_hashes"]["src"].is_string());
}

#[test]
fn test_save_replaces_whole_record() {
    let temp_dir = fixture(&[("a.txt", "a"), ("b.txt", "b")]);
    let store = JsonSnapshotStore::new();
    let (_, first) = snapshot_of(temp_dir.path(), &["**/*"]);
    store.save(temp_dir.path(), &first).unwrap();

    fs::remove_file(temp_dir.path().join("b.txt")).unwrap();
    let (_, second) = snapshot_of(temp_dir.path(), &["**/*"]);
    store.save(temp_dir.path(), &second).unwrap();

    let loaded = store.load(temp_dir.path()).unwrap();
    assert_eq!(loaded, second);
    assert!(!loaded.file_hashes.contains_key("b.txt"));

    let leftovers: Vec<_> = fs::read_dir(temp_dir.path().join(".slim"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(leftovers, vec!["cartography.json".to_string()]);
}

#[test]
fn test_missing_record_is_no_snapshot() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let store = JsonSnapshotStore::new();
    assert!(!store.exists(temp_dir.path()));
    assert!(matches!(
        store.load(temp_dir.path()),
        Err(CartographyError::NoSnapshot(_))
    ));
}

#[test]
fn test_tampered_folder_digest_is_corrupt() {
    let temp_dir = fixture(&[("src/a.ts", "a")]);
    let store = JsonSnapshotStore::new();
    let (_, mut snapshot) = snapshot_of(temp_dir.path(), &["**/*"]);
    let bogus = snapshot.file_hashes["src/a.ts"];
    snapshot.folder_hashes.insert("src".to_string(), bogus);
    store.save(temp_dir.path(), &snapshot).unwrap();

    assert!(matches!(
        store.load(temp_dir.path()),
        Err(CartographyError::CorruptSnapshot { .. })
    ));
}

#[test]
fn test_future_major_version_is_unsupported() {
    let temp_dir = fixture(&[("src/a.ts", "a")]);
    let store = JsonSnapshotStore::new();
    let (_, mut snapshot) = snapshot_of(temp_dir.path(), &["**/*"]);
    snapshot.metadata.format_version = "2.0.0".to_string();
    store.save(temp_dir.path(), &snapshot).unwrap();

    match store.load(temp_dir.path()) {
        Err(CartographyError::UnsupportedFormat { found, .. }) => assert_eq!(found, "2.0.0"),
        other => panic!("expected UnsupportedFormat, got {:?}", other.map(|_| ())),
    }
}
