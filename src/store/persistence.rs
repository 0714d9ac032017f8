//! JSON file persistence for snapshots

use crate::error::CartographyError;
use crate::store::{Snapshot, SnapshotStore, STATE_DIR, STATE_FILE};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Stores one pretty-printed JSON record per root at `<root>/.slim/cartography.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSnapshotStore;

impl JsonSnapshotStore {
    pub fn new() -> Self {
        Self
    }

    /// Location of the snapshot record for a root.
    pub fn state_path(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join(STATE_FILE)
    }

    fn temp_path(root: &Path) -> PathBuf {
        root.join(STATE_DIR)
            .join(format!("{}.{}.tmp", STATE_FILE, std::process::id()))
    }
}

impl SnapshotStore for JsonSnapshotStore {
    #[instrument(skip(self))]
    fn load(&self, root: &Path) -> Result<Snapshot, CartographyError> {
        let path = Self::state_path(root);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CartographyError::NoSnapshot(root.to_path_buf()));
            }
            Err(e) => {
                return Err(CartographyError::CorruptSnapshot {
                    path,
                    reason: format!("unreadable: {}", e),
                });
            }
        };

        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| CartographyError::CorruptSnapshot {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        snapshot.validate(&path)?;

        debug!(
            files = snapshot.file_hashes.len(),
            folders = snapshot.folder_hashes.len(),
            written_at = %snapshot.metadata.last_run_timestamp,
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Write to a temporary file beside the record, flush it to disk, then
    /// rename it over the record. Readers see the old or the new record, never
    /// a partial one.
    #[instrument(skip(self, snapshot), fields(files = snapshot.file_hashes.len()))]
    fn save(&self, root: &Path, snapshot: &Snapshot) -> Result<(), CartographyError> {
        let path = Self::state_path(root);
        let temp_path = Self::temp_path(root);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CartographyError::Persist {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let serialized = serde_json::to_vec_pretty(snapshot).map_err(|e| {
            CartographyError::Persist {
                path: path.clone(),
                source: std::io::Error::new(ErrorKind::InvalidData, e),
            }
        })?;

        let write_temp = || -> std::io::Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(&serialized)?;
            file.write_all(b"\n")?;
            file.sync_all()
        };
        if let Err(e) = write_temp() {
            let _ = fs::remove_file(&temp_path);
            return Err(CartographyError::Persist {
                path: temp_path,
                source: e,
            });
        }

        // Atomically rename temp file to final location
        if let Err(e) = fs::rename(&temp_path, &path) {
            warn!("Failed to move snapshot into place: {}", e);
            let _ = fs::remove_file(&temp_path);
            return Err(CartographyError::Persist { path, source: e });
        }

        if let Some(parent) = path.parent() {
            sync_dir(parent).map_err(|e| CartographyError::Persist {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!(path = %path.display(), "Snapshot saved");
        Ok(())
    }

    fn exists(&self, root: &Path) -> bool {
        Self::state_path(root).is_file()
    }
}

/// Flush a directory entry so a completed rename survives a crash.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
