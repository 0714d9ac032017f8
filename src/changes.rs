//! Change Detector
//!
//! Compares a freshly computed hash tree with a persisted snapshot and
//! classifies the difference. Detection never touches stored state.

use crate::store::Snapshot;
use crate::tree::pattern::same_patterns;
use crate::tree::{path, HashTree};
use crate::types::ROOT_PATH;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Classified difference between a baseline and the current tree
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChangeSet {
    pub added_files: BTreeSet<String>,
    pub removed_files: BTreeSet<String>,
    pub modified_files: BTreeSet<String>,
    /// Folders whose digest differs; always includes the root when anything changed
    pub affected_folders: BTreeSet<String>,
    /// True when no comparable baseline existed and every file is reported as added
    pub rebaseline: bool,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added_files.is_empty()
            && self.removed_files.is_empty()
            && self.modified_files.is_empty()
    }

    /// Every changed file path, added, removed and modified alike.
    pub fn changed_files(&self) -> impl Iterator<Item = &String> {
        self.added_files
            .iter()
            .chain(self.removed_files.iter())
            .chain(self.modified_files.iter())
    }
}

/// Why the detector fell back to a full re-baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// Snapshot exists and was produced with the same pattern set
    Comparable,
    /// No snapshot exists
    Missing,
    /// Snapshot exists but was produced with a different pattern set
    PatternDrift,
}

/// Decide whether `snapshot` is a meaningful baseline for the given patterns.
///
/// Patterns are compared as sets: order and duplicates do not matter.
pub fn baseline_status(
    snapshot: Option<&Snapshot>,
    include: &[String],
    exclude: &[String],
) -> Baseline {
    match snapshot {
        None => Baseline::Missing,
        Some(s)
            if same_patterns(&s.metadata.include_patterns, include)
                && same_patterns(&s.metadata.exclude_patterns, exclude) =>
        {
            Baseline::Comparable
        }
        Some(_) => Baseline::PatternDrift,
    }
}

/// Detect changes of `current` (resolved with `include`/`exclude`) against `snapshot`.
pub fn detect(
    current: &HashTree,
    include: &[String],
    exclude: &[String],
    snapshot: Option<&Snapshot>,
) -> ChangeSet {
    let status = baseline_status(snapshot, include, exclude);
    let changes = match (status, snapshot) {
        (Baseline::Comparable, Some(snapshot)) => compare(&snapshot.tree(), current),
        _ => {
            debug!(?status, "No comparable baseline, re-baselining");
            rebaseline(current)
        }
    };
    info!(
        added = changes.added_files.len(),
        removed = changes.removed_files.len(),
        modified = changes.modified_files.len(),
        affected_folders = changes.affected_folders.len(),
        rebaseline = changes.rebaseline,
        "Changes detected"
    );
    changes
}

/// Path-by-path comparison of two trees built with the same pattern set.
pub fn compare(previous: &HashTree, current: &HashTree) -> ChangeSet {
    let mut changes = ChangeSet::default();

    for (file, digest) in &current.file_hashes {
        match previous.file_hashes.get(file) {
            None => {
                changes.added_files.insert(file.clone());
            }
            Some(old) if old != digest => {
                changes.modified_files.insert(file.clone());
            }
            Some(_) => {}
        }
    }
    for file in previous.file_hashes.keys() {
        if !current.file_hashes.contains_key(file) {
            changes.removed_files.insert(file.clone());
        }
    }

    let mut affected = BTreeSet::new();
    for file in changes.changed_files() {
        for folder in path::ancestors(file) {
            if !affected.insert(folder.to_string()) {
                break;
            }
        }
    }
    changes.affected_folders = affected;
    changes
}

/// Treat every current file as added and every tracked folder as affected.
pub fn rebaseline(current: &HashTree) -> ChangeSet {
    let mut affected_folders: BTreeSet<String> = current.folder_hashes.keys().cloned().collect();
    affected_folders.insert(ROOT_PATH.to_string());
    ChangeSet {
        added_files: current.file_hashes.keys().cloned().collect(),
        removed_files: BTreeSet::new(),
        modified_files: BTreeSet::new(),
        affected_folders,
        rebaseline: true,
    }
}

/// Folders whose digest differs between two trees, including folders present
/// in only one of them.
pub fn differing_folders(previous: &HashTree, current: &HashTree) -> BTreeSet<String> {
    let all: BTreeSet<&String> = previous
        .folder_hashes
        .keys()
        .chain(current.folder_hashes.keys())
        .collect();
    all.into_iter()
        .filter(|f| previous.folder_hashes.get(*f) != current.folder_hashes.get(*f))
        .cloned()
        .collect()
}
