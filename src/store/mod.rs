//! Snapshot Store
//!
//! Persists the hash tree together with the pattern set that produced it.
//! A snapshot is only ever replaced whole; there is no partial update.

pub mod persistence;

pub use persistence::JsonSnapshotStore;

use crate::error::CartographyError;
use crate::tree::HashTree;
use crate::types::Digest;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// State directory under the root, never part of the tracked set.
pub const STATE_DIR: &str = ".slim";

/// Snapshot file name inside the state directory.
pub const STATE_FILE: &str = "cartography.json";

/// Current snapshot format version.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Snapshot metadata: format, write time, and the exact patterns used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub format_version: String,
    /// RFC 3339 UTC timestamp of the last write
    pub last_run_timestamp: String,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

/// Persisted baseline: metadata plus file and folder digests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub file_hashes: BTreeMap<String, Digest>,
    pub folder_hashes: BTreeMap<String, Digest>,
}

impl Snapshot {
    /// Build a snapshot of `tree`, stamped with the current time.
    pub fn from_tree(tree: &HashTree, include: &[String], exclude: &[String]) -> Self {
        Self {
            metadata: SnapshotMetadata {
                format_version: FORMAT_VERSION.to_string(),
                last_run_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                include_patterns: include.to_vec(),
                exclude_patterns: exclude.to_vec(),
            },
            file_hashes: tree.file_hashes.clone(),
            folder_hashes: tree.folder_hashes.clone(),
        }
    }

    /// The stored hash tree.
    pub fn tree(&self) -> HashTree {
        HashTree {
            file_hashes: self.file_hashes.clone(),
            folder_hashes: self.folder_hashes.clone(),
        }
    }

    /// Check format version and folder-digest consistency of a loaded record.
    pub fn validate(&self, path: &Path) -> Result<(), CartographyError> {
        let major = |v: &str| v.split('.').next().map(str::to_string);
        if major(&self.metadata.format_version) != major(FORMAT_VERSION) {
            return Err(CartographyError::UnsupportedFormat {
                path: path.to_path_buf(),
                found: self.metadata.format_version.clone(),
                supported: FORMAT_VERSION.to_string(),
            });
        }
        self.tree()
            .verify()
            .map_err(|folder| CartographyError::CorruptSnapshot {
                path: path.to_path_buf(),
                reason: format!("folder digest for {:?} does not match its children", folder),
            })
    }
}

/// Snapshot Store interface
pub trait SnapshotStore {
    /// Load the snapshot for `root`, or fail with `NoSnapshot`.
    fn load(&self, root: &Path) -> Result<Snapshot, CartographyError>;

    /// Atomically replace the snapshot for `root`.
    fn save(&self, root: &Path, snapshot: &Snapshot) -> Result<(), CartographyError>;

    /// Whether a snapshot exists for `root`.
    fn exists(&self, root: &Path) -> bool;
}
