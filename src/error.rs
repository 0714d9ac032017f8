//! Error types for the cartographer change-detection engine.

use std::path::PathBuf;
use thiserror::Error;

/// Every failure an operation can report. All of them abort the operation;
/// none leaves a partially written snapshot behind.
#[derive(Debug, Error)]
pub enum CartographyError {
    #[error("Invalid root: {0} does not exist or is not a directory")]
    InvalidRoot(PathBuf),

    #[error("No include patterns supplied; refusing to track an unbounded scope")]
    NoIncludePatterns,

    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Unreadable file {path}: {source}")]
    UnreadableFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Paths {first} and {second} both normalize to tracked path {tracked}")]
    PathCollision {
        tracked: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Failed to walk {path}: {reason}")]
    Walk { path: PathBuf, reason: String },

    #[error("No cartography state found under {0}. Run `cartographer init` first.")]
    NoSnapshot(PathBuf),

    #[error("Cartography state already exists at {0}. Use `update`, or `init --force` to rebuild.")]
    AlreadyInitialized(PathBuf),

    #[error("Corrupt snapshot {path}: {reason}")]
    CorruptSnapshot { path: PathBuf, reason: String },

    #[error("Unsupported snapshot format version {found} in {path} (supported: {supported})")]
    UnsupportedFormat {
        path: PathBuf,
        found: String,
        supported: String,
    },

    #[error("Failed to persist snapshot to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write placeholder for folder {folder}: {source}")]
    Placeholder {
        folder: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for CartographyError {
    fn from(err: config::ConfigError) -> Self {
        CartographyError::Config(err.to_string())
    }
}
