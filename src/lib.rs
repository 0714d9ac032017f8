//! Cartographer: Hierarchical Content-Addressed Change Detection
//!
//! Tracks which parts of a source tree changed since they were last examined.
//! Files selected by include/exclude patterns are hashed, the digests are
//! rolled up into per-folder digests along the directory tree, and the result
//! is persisted as a snapshot that later runs compare against.

pub mod api;
pub mod changes;
pub mod cli;
pub mod config;
pub mod error;
pub mod ignore;
pub mod logging;
pub mod placeholder;
pub mod store;
pub mod tree;
pub mod types;

pub use api::{Cartographer, InitSummary, UpdateSummary};
pub use changes::ChangeSet;
pub use error::CartographyError;
pub use store::{JsonSnapshotStore, Snapshot, SnapshotStore};
pub use tree::HashTree;
pub use types::{Digest, NodeKind};
