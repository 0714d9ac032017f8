//! Operations API
//!
//! `init`, `changes` and `update` over a root. Each call runs one synchronous
//! resolve → hash → compare/persist pass; nothing is cached between calls.

use crate::changes::{self, ChangeSet};
use crate::config::ScanConfig;
use crate::error::CartographyError;
use crate::placeholder::{CodemapPlaceholders, PlaceholderWriter};
use crate::store::{JsonSnapshotStore, Snapshot, SnapshotStore};
use crate::tree::{path, FsContentSource, HashTree, ResolvedScope, Resolver, TreeBuilder};
use crate::types::{Digest, ROOT_PATH};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Outcome of `init`
#[derive(Debug, Clone, Serialize)]
pub struct InitSummary {
    pub root: PathBuf,
    pub files: usize,
    pub folders: usize,
    pub root_digest: Digest,
    /// Whether an existing snapshot was overwritten
    pub replaced: bool,
    /// Placeholders newly created this run
    pub placeholders_created: usize,
}

/// Outcome of `update`
#[derive(Debug, Clone, Serialize)]
pub struct UpdateSummary {
    pub root: PathBuf,
    pub files: usize,
    pub folders: usize,
    pub root_digest: Digest,
    pub previous_root_digest: Option<Digest>,
    /// Whether the stored pattern set was replaced
    pub patterns_changed: bool,
}

/// Change-detection service over one store and one placeholder collaborator.
pub struct Cartographer {
    store: Arc<dyn SnapshotStore + Send + Sync>,
    placeholders: Arc<dyn PlaceholderWriter + Send + Sync>,
    scan: ScanConfig,
}

impl Cartographer {
    /// JSON store and `codemap.md` placeholders.
    pub fn new(scan: ScanConfig) -> Self {
        Self::with_parts(
            Arc::new(JsonSnapshotStore::new()),
            Arc::new(CodemapPlaceholders),
            scan,
        )
    }

    pub fn with_parts(
        store: Arc<dyn SnapshotStore + Send + Sync>,
        placeholders: Arc<dyn PlaceholderWriter + Send + Sync>,
        scan: ScanConfig,
    ) -> Self {
        Self {
            store,
            placeholders,
            scan,
        }
    }

    /// Replace the placeholder collaborator.
    pub fn with_placeholders(
        mut self,
        placeholders: Arc<dyn PlaceholderWriter + Send + Sync>,
    ) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Resolve and hash the tracked scope, ensure a placeholder exists for
    /// every tracked folder, then persist a fresh snapshot.
    ///
    /// Fails with `AlreadyInitialized` when a snapshot exists and `force` is
    /// not set. Placeholders are written before the snapshot, so a failed
    /// placeholder write leaves no snapshot behind and a plain re-run works.
    #[instrument(skip(self, include, exclude), fields(root = %root.display()))]
    pub fn init(
        &self,
        root: &Path,
        include: &[String],
        exclude: &[String],
        force: bool,
    ) -> Result<InitSummary, CartographyError> {
        let config = self
            .scan
            .resolver_config(include.to_vec(), exclude.to_vec());
        let resolver = Resolver::new(root, &config)?;
        let root = resolver.root().to_path_buf();

        let replaced = self.store.exists(&root);
        if replaced && !force {
            return Err(CartographyError::AlreadyInitialized(root));
        }

        let scope = resolver.resolve()?;
        let tree = self.build(&scope)?;

        // Placeholders are implicitly ignored, so writing them leaves the tree unchanged
        let mut placeholders_created = 0;
        for folder in &scope.folders {
            if self
                .placeholders
                .ensure_placeholder(&scope.absolute(folder), folder)?
            {
                placeholders_created += 1;
            }
        }

        let snapshot = Snapshot::from_tree(&tree, include, exclude);
        self.store.save(&root, &snapshot)?;

        info!(
            files = tree.file_hashes.len(),
            folders = tree.folder_hashes.len(),
            placeholders_created,
            replaced,
            "Initialized snapshot"
        );
        Ok(InitSummary {
            files: tree.file_hashes.len(),
            folders: tree.folder_hashes.len(),
            root_digest: tree.root_digest(),
            root,
            replaced,
            placeholders_created,
        })
    }

    /// Compare the current tree against the stored snapshot. Never writes.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn changes(&self, root: &Path) -> Result<ChangeSet, CartographyError> {
        let root = path::canonicalize_root(root)?;
        let snapshot = self.store.load(&root)?;
        let (include, exclude) = self.current_patterns(&snapshot);

        let tree = self.current_tree(&root, &include, &exclude)?;
        Ok(changes::detect(&tree, &include, &exclude, Some(&snapshot)))
    }

    /// Recompute the tree with the current patterns and replace the snapshot.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn update(&self, root: &Path) -> Result<UpdateSummary, CartographyError> {
        let root = path::canonicalize_root(root)?;
        let previous = self.store.load(&root)?;
        let (include, exclude) = self.current_patterns(&previous);
        let patterns_changed = changes::baseline_status(Some(&previous), &include, &exclude)
            != changes::Baseline::Comparable;
        if patterns_changed {
            warn!(
                previous_include = ?previous.metadata.include_patterns,
                include = ?include,
                "Pattern set changed since last snapshot"
            );
        }

        let tree = self.current_tree(&root, &include, &exclude)?;
        let snapshot = Snapshot::from_tree(&tree, &include, &exclude);
        self.store.save(&root, &snapshot)?;

        info!(
            files = tree.file_hashes.len(),
            folders = tree.folder_hashes.len(),
            "Updated snapshot"
        );
        Ok(UpdateSummary {
            files: tree.file_hashes.len(),
            folders: tree.folder_hashes.len(),
            root_digest: tree.root_digest(),
            previous_root_digest: previous.folder_hashes.get(ROOT_PATH).copied(),
            root,
            patterns_changed,
        })
    }

    /// Configured patterns where set, otherwise the snapshot's.
    fn current_patterns(&self, snapshot: &Snapshot) -> (Vec<String>, Vec<String>) {
        self.scan.effective_patterns(
            &snapshot.metadata.include_patterns,
            &snapshot.metadata.exclude_patterns,
        )
    }

    fn current_tree(
        &self,
        root: &Path,
        include: &[String],
        exclude: &[String],
    ) -> Result<HashTree, CartographyError> {
        let config = self.scan.resolver_config(include.to_vec(), exclude.to_vec());
        let scope = Resolver::new(root, &config)?.resolve()?;
        self.build(&scope)
    }

    fn build(&self, scope: &ResolvedScope) -> Result<HashTree, CartographyError> {
        let source = FsContentSource::for_scope(scope);
        TreeBuilder::new(&source)
            .with_threads(self.scan.threads)
            .build(scope)
    }
}

impl Default for Cartographer {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}
