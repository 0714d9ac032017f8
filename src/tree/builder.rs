//! Hash tree construction over a resolved scope
//!
//! File digests are computed in parallel; folder digests are computed in
//! waves from the deepest level up to the root, each wave starting only once
//! every folder below it has a digest.

use crate::error::CartographyError;
use crate::tree::hasher;
use crate::tree::path;
use crate::tree::resolver::ResolvedScope;
use crate::types::{Digest, NodeKind, ROOT_PATH};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// Source of file bytes, addressed by tracked path.
///
/// The filesystem implementation is used in production; tests can supply an
/// in-memory tree instead.
pub trait ContentSource: Sync {
    fn read(&self, tracked: &str) -> std::io::Result<Vec<u8>>;
}

/// Reads tracked files from disk under a root.
///
/// Files listed in `locations` are opened through their on-disk relative
/// path; anything else is opened at its tracked path.
pub struct FsContentSource {
    root: PathBuf,
    locations: BTreeMap<String, PathBuf>,
}

impl FsContentSource {
    /// Source over a resolved scope, reading each file where the walk found it.
    pub fn for_scope(scope: &ResolvedScope) -> Self {
        Self {
            root: scope.root.clone(),
            locations: scope.locations.clone(),
        }
    }
}

impl ContentSource for FsContentSource {
    fn read(&self, tracked: &str) -> std::io::Result<Vec<u8>> {
        match self.locations.get(tracked) {
            Some(on_disk) => std::fs::read(self.root.join(on_disk)),
            None => std::fs::read(path::absolute(&self.root, tracked)),
        }
    }
}

impl ContentSource for BTreeMap<String, Vec<u8>> {
    fn read(&self, tracked: &str) -> std::io::Result<Vec<u8>> {
        self.get(tracked).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, format!("no entry {}", tracked))
        })
    }
}

/// Complete hash tree over a tracked scope
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HashTree {
    /// File path → content digest
    pub file_hashes: BTreeMap<String, Digest>,
    /// Folder path → folder digest (always contains the root)
    pub folder_hashes: BTreeMap<String, Digest>,
}

impl HashTree {
    /// Roll file digests up into folder digests.
    ///
    /// Pure: touches no filesystem state. Every ancestor of a file becomes a
    /// tracked folder, and the root is always present.
    pub fn from_file_hashes(file_hashes: BTreeMap<String, Digest>) -> Self {
        let folder_hashes = {
            let folders = folders_of(file_hashes.keys());
            let index = child_index(&file_hashes, &folders);

            // Group folders by depth, deepest first
            let mut waves: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
            for folder in &folders {
                waves
                    .entry(path::depth_of(folder))
                    .or_default()
                    .push(folder.as_str());
            }

            let mut folder_hashes: BTreeMap<String, Digest> = BTreeMap::new();
            for (depth, wave) in waves.into_iter().rev() {
                let computed: Vec<(String, Digest)> = wave
                    .par_iter()
                    .map(|folder| {
                        let children = resolve_children(
                            index.get(folder).map(Vec::as_slice).unwrap_or(&[]),
                            &file_hashes,
                            &folder_hashes,
                        );
                        (folder.to_string(), hasher::compute_folder_digest(&children))
                    })
                    .collect();
                trace!(depth, folders = computed.len(), "Folder wave hashed");
                folder_hashes.extend(computed);
            }
            folder_hashes
        };

        Self {
            file_hashes,
            folder_hashes,
        }
    }

    /// Digest of the root folder.
    pub fn root_digest(&self) -> Digest {
        self.folder_hashes
            .get(ROOT_PATH)
            .copied()
            .unwrap_or_else(hasher::empty_folder_digest)
    }

    /// Direct children of a folder as `(name, kind, digest)`, sorted by name.
    pub fn children_of(&self, folder: &str) -> Vec<(String, NodeKind, Digest)> {
        let mut children: Vec<(String, NodeKind, Digest)> = self
            .file_hashes
            .iter()
            .map(|(p, d)| (p, NodeKind::File, d))
            .chain(
                self.folder_hashes
                    .iter()
                    .map(|(p, d)| (p, NodeKind::Folder, d)),
            )
            .filter(|(p, _, _)| path::parent_of(p) == Some(folder))
            .map(|(p, kind, d)| (path::name_of(p).to_string(), kind, *d))
            .collect();
        children.sort_by(|a, b| a.0.cmp(&b.0));
        children
    }

    /// Check that every folder digest is reproducible from its children and
    /// that the folder set is exactly the root plus the ancestors of files.
    ///
    /// Returns the first offending folder path.
    pub fn verify(&self) -> Result<(), String> {
        let expected = folders_of(self.file_hashes.keys());
        let actual: BTreeSet<String> = self.folder_hashes.keys().cloned().collect();
        if let Some(extra) = actual.symmetric_difference(&expected).next() {
            return Err(extra.clone());
        }

        let index = child_index(&self.file_hashes, &expected);
        for (folder, digest) in &self.folder_hashes {
            let children = resolve_children(
                index.get(folder.as_str()).map(Vec::as_slice).unwrap_or(&[]),
                &self.file_hashes,
                &self.folder_hashes,
            );
            if hasher::compute_folder_digest(&children) != *digest {
                return Err(folder.clone());
            }
        }
        Ok(())
    }
}

/// Root plus every ancestor of the given files.
fn folders_of<'a>(files: impl Iterator<Item = &'a String>) -> BTreeSet<String> {
    let mut folders = BTreeSet::new();
    folders.insert(ROOT_PATH.to_string());
    for file in files {
        for ancestor in path::ancestors(file) {
            if !folders.insert(ancestor.to_string()) {
                break;
            }
        }
    }
    folders
}

type ChildRef<'a> = (&'a str, NodeKind);

/// Folder → direct children (path, kind).
fn child_index<'a>(
    files: &'a BTreeMap<String, Digest>,
    folders: &'a BTreeSet<String>,
) -> HashMap<&'a str, Vec<ChildRef<'a>>> {
    let mut index: HashMap<&str, Vec<ChildRef<'_>>> = HashMap::new();
    for file in files.keys() {
        if let Some(parent) = path::parent_of(file) {
            index.entry(parent).or_default().push((file.as_str(), NodeKind::File));
        }
    }
    for folder in folders {
        if let Some(parent) = path::parent_of(folder) {
            index
                .entry(parent)
                .or_default()
                .push((folder.as_str(), NodeKind::Folder));
        }
    }
    index
}

fn resolve_children(
    children: &[ChildRef<'_>],
    file_hashes: &BTreeMap<String, Digest>,
    folder_hashes: &BTreeMap<String, Digest>,
) -> Vec<(String, NodeKind, Digest)> {
    children
        .iter()
        .filter_map(|(child, kind)| {
            let digest = match kind {
                NodeKind::File => file_hashes.get(*child),
                NodeKind::Folder => folder_hashes.get(*child),
            }?;
            Some((path::name_of(child).to_string(), *kind, *digest))
        })
        .collect()
}

/// Builds a `HashTree` by reading every tracked file through a `ContentSource`.
pub struct TreeBuilder<'a, S: ContentSource> {
    source: &'a S,
    threads: usize,
}

impl<'a, S: ContentSource> TreeBuilder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source, threads: 0 }
    }

    /// Bound the number of hashing workers, and with it the number of files
    /// open at once. `0` uses the rayon default.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Build the hash tree for a resolved scope.
    ///
    /// Any unreadable file aborts the whole build; no partial tree is returned.
    #[instrument(skip(self, scope), fields(files = scope.files.len()))]
    pub fn build(&self, scope: &ResolvedScope) -> Result<HashTree, CartographyError> {
        self.build_files(&scope.files)
    }

    /// Build the hash tree for an explicit set of tracked file paths.
    pub fn build_files(&self, files: &BTreeSet<String>) -> Result<HashTree, CartographyError> {
        let start = Instant::now();

        let tree = if self.threads == 0 {
            self.hash_all(files)?
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()
                .map_err(|e| {
                    CartographyError::Config(format!("Failed to build hashing pool: {}", e))
                })?;
            pool.install(|| self.hash_all(files))?
        };

        info!(
            files = tree.file_hashes.len(),
            folders = tree.folder_hashes.len(),
            root = %tree.root_digest(),
            duration_ms = start.elapsed().as_millis(),
            "Hash tree built"
        );
        Ok(tree)
    }

    fn hash_all(&self, files: &BTreeSet<String>) -> Result<HashTree, CartographyError> {
        let hashed: Vec<(String, Digest)> = files
            .par_iter()
            .map(|file| self.hash_file(file))
            .collect::<Result<Vec<_>, CartographyError>>()?;
        debug!(count = hashed.len(), "File digests computed");
        Ok(HashTree::from_file_hashes(hashed.into_iter().collect()))
    }

    fn hash_file(&self, tracked: &str) -> Result<(String, Digest), CartographyError> {
        let content = self.source.read(tracked).map_err(|e| {
            error!(path = %tracked, "Failed to read file: {}", e);
            CartographyError::UnreadableFile {
                path: tracked.to_string(),
                source: e,
            }
        })?;
        let digest = hasher::compute_content_hash(&content);
        trace!(path = %tracked, digest = %digest, "Hashed file");
        Ok((tracked.to_string(), digest))
    }
}
