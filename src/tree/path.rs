//! Root-relative path handling for tracked entries
//!
//! Tracked paths are root-relative, forward-slash separated, NFC-normalized
//! and case-preserving. The root itself is `"."`.

use crate::error::CartographyError;
use crate::types::ROOT_PATH;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Resolve a root directory to its canonical absolute form.
///
/// Fails with `InvalidRoot` when the root is missing or not a directory.
pub fn canonicalize_root(root: &Path) -> Result<PathBuf, CartographyError> {
    if !root.is_dir() {
        return Err(CartographyError::InvalidRoot(root.to_path_buf()));
    }
    dunce::canonicalize(root).map_err(|_| CartographyError::InvalidRoot(root.to_path_buf()))
}

/// Convert a path relative to the root into its tracked string form.
///
/// Returns `"."` for an empty relative path, and `None` when a component is
/// not valid UTF-8. The tracked form is NFC, so it may differ from the bytes
/// on disk; callers that need to reopen the entry keep the original path.
pub fn to_tracked(relative: &Path) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in relative.components() {
        if let Component::Normal(name) = component {
            parts.push(name.to_str()?.nfc().collect());
        }
    }
    if parts.is_empty() {
        Some(ROOT_PATH.to_string())
    } else {
        Some(parts.join("/"))
    }
}

/// Parent folder of a tracked path. The root has no parent.
pub fn parent_of(path: &str) -> Option<&str> {
    if path == ROOT_PATH {
        return None;
    }
    match path.rfind('/') {
        Some(idx) => Some(&path[..idx]),
        None => Some(ROOT_PATH),
    }
}

/// Last segment of a tracked path.
pub fn name_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// All ancestor folders of a tracked path, nearest first, ending with the root.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(parent_of(path), |p| parent_of(*p))
}

/// Depth of a folder below the root (root = 0).
pub fn depth_of(path: &str) -> usize {
    if path == ROOT_PATH {
        0
    } else {
        path.matches('/').count() + 1
    }
}

/// Absolute filesystem location of a tracked path under `root`.
pub fn absolute(root: &Path, path: &str) -> PathBuf {
    if path == ROOT_PATH {
        root.to_path_buf()
    } else {
        path.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }
}
