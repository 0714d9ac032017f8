//! Documentation placeholder collaborator.
//!
//! `init` asks a `PlaceholderWriter` to make sure every tracked folder has a
//! documentation placeholder. Filling the placeholder in is someone else's job.

use crate::error::CartographyError;
use crate::types::ROOT_PATH;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::trace;

/// File name of the per-folder documentation placeholder.
pub const PLACEHOLDER_FILE: &str = "codemap.md";

/// Capability to create a documentation placeholder for a tracked folder.
pub trait PlaceholderWriter {
    /// Ensure a placeholder exists for the tracked `folder`, whose on-disk
    /// directory is `dir`.
    ///
    /// Returns `true` when a new placeholder was created, `false` when one
    /// already existed.
    fn ensure_placeholder(&self, dir: &Path, folder: &str) -> Result<bool, CartographyError>;
}

/// Writes an empty `codemap.md` carrying only a title line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodemapPlaceholders;

impl PlaceholderWriter for CodemapPlaceholders {
    fn ensure_placeholder(&self, dir: &Path, folder: &str) -> Result<bool, CartographyError> {
        let target = dir.join(PLACEHOLDER_FILE);
        let title = if folder == ROOT_PATH {
            dir.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| ROOT_PATH.to_string())
        } else {
            folder.to_string()
        };

        // create_new never clobbers an existing placeholder
        match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(mut file) => {
                writeln!(file, "# {}/", title).map_err(|e| CartographyError::Placeholder {
                    folder: folder.to_string(),
                    source: e,
                })?;
                trace!(folder = %folder, "Created placeholder");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(CartographyError::Placeholder {
                folder: folder.to_string(),
                source: e,
            }),
        }
    }
}

/// Creates nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPlaceholders;

impl PlaceholderWriter for NoopPlaceholders {
    fn ensure_placeholder(&self, _dir: &Path, _folder: &str) -> Result<bool, CartographyError> {
        Ok(false)
    }
}
