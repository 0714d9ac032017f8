//! Pattern resolver: turns include/exclude patterns plus the implicit ignore
//! policy into the concrete set of tracked paths under a root.

use crate::error::CartographyError;
use crate::ignore::IgnorePolicy;
use crate::tree::path;
use crate::tree::pattern::PatternSet;
use crate::types::ROOT_PATH;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, trace, warn};
use walkdir::{DirEntry, WalkDir};

/// Resolver configuration
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Include patterns; at least one is required
    pub include: Vec<String>,
    /// Exclude patterns
    pub exclude: Vec<String>,
    /// Honour the root `.gitignore` (default: true)
    pub respect_gitignore: bool,
    /// Skip entries whose name starts with `.` (default: true)
    pub skip_hidden: bool,
}

impl ResolverConfig {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include,
            exclude,
            respect_gitignore: true,
            skip_hidden: true,
        }
    }
}

/// Tracked files and folders of one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScope {
    /// Canonical absolute root
    pub root: PathBuf,
    /// Tracked file paths, root-relative
    pub files: BTreeSet<String>,
    /// Tracked folders: the root plus every ancestor of a tracked file
    pub folders: BTreeSet<String>,
    /// Tracked path → on-disk path relative to the root, for files and folders
    pub locations: BTreeMap<String, PathBuf>,
}

impl ResolvedScope {
    /// Build a scope from tracked file paths and their on-disk locations,
    /// deriving tracked folders.
    pub fn from_locations(root: PathBuf, files: BTreeMap<String, PathBuf>) -> Self {
        let mut folders = BTreeSet::new();
        let mut locations = BTreeMap::new();
        folders.insert(ROOT_PATH.to_string());
        locations.insert(ROOT_PATH.to_string(), PathBuf::new());

        for (tracked, on_disk) in &files {
            // Tracked ancestors and on-disk parents line up one to one
            for (folder, dir) in path::ancestors(tracked).zip(on_disk.ancestors().skip(1)) {
                if !folders.insert(folder.to_string()) {
                    break;
                }
                locations.insert(folder.to_string(), dir.to_path_buf());
            }
        }

        let files_set = files.keys().cloned().collect();
        locations.extend(files);
        Self {
            root,
            files: files_set,
            folders,
            locations,
        }
    }

    /// Absolute on-disk location of a tracked file or folder.
    pub fn absolute(&self, tracked: &str) -> PathBuf {
        match self.locations.get(tracked) {
            Some(on_disk) => self.root.join(on_disk),
            None => path::absolute(&self.root, tracked),
        }
    }
}

/// Pattern resolver bound to one root.
pub struct Resolver {
    root: PathBuf,
    include: PatternSet,
    exclude: PatternSet,
    policy: IgnorePolicy,
}

impl Resolver {
    /// Validate the root and compile the patterns.
    pub fn new(root: &Path, config: &ResolverConfig) -> Result<Self, CartographyError> {
        let root = path::canonicalize_root(root)?;
        if config.include.iter().all(|p| p.trim().is_empty()) {
            return Err(CartographyError::NoIncludePatterns);
        }
        let include = PatternSet::new(&config.include)?;
        let exclude = PatternSet::new(&config.exclude)?;
        let policy = IgnorePolicy::load(&root, config.respect_gitignore, config.skip_hidden);
        Ok(Self {
            root,
            include,
            exclude,
            policy,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a root-relative file path is tracked under the patterns alone.
    pub fn matches(&self, tracked: &str) -> bool {
        self.include.is_match(tracked) && !self.exclude.is_match(tracked)
    }

    /// Walk the root and collect the tracked scope.
    ///
    /// Entries are visited in file-name order and collected into sorted sets,
    /// so the result does not depend on directory-listing order.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn resolve(&self) -> Result<ResolvedScope, CartographyError> {
        let start = Instant::now();
        let mut files: BTreeMap<String, PathBuf> = BTreeMap::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.should_prune(entry));

        for entry in walker {
            let entry = entry.map_err(|e| CartographyError::Walk {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone()),
                reason: e.to_string(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = self.relative(&entry);
            let Some(tracked) = path::to_tracked(relative) else {
                warn!(path = %entry.path().display(), "Skipping file with non-UTF-8 name");
                continue;
            };
            if self.policy.is_ignored(&tracked, false) {
                trace!(path = %tracked, "Ignored by policy");
                continue;
            }
            if !self.matches(&tracked) {
                continue;
            }

            trace!(path = %tracked, "Tracked");
            if let Some(first) = files.get(&tracked) {
                return Err(CartographyError::PathCollision {
                    tracked,
                    first: self.root.join(first),
                    second: entry.path().to_path_buf(),
                });
            }
            files.insert(tracked, relative.to_path_buf());
        }

        let scope = ResolvedScope::from_locations(self.root.clone(), files);
        info!(
            files = scope.files.len(),
            folders = scope.folders.len(),
            duration_ms = start.elapsed().as_millis(),
            "Resolved tracked scope"
        );
        Ok(scope)
    }

    /// Directories covered by the ignore policy are not descended into,
    /// nor are directories whose name is not valid UTF-8.
    fn should_prune(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let Some(tracked) = path::to_tracked(self.relative(entry)) else {
            warn!(path = %entry.path().display(), "Skipping directory with non-UTF-8 name");
            return true;
        };
        let pruned = self.policy.is_ignored(&tracked, true);
        if pruned {
            debug!(path = %tracked, "Pruned directory");
        }
        pruned
    }

    fn relative<'e>(&self, entry: &'e DirEntry) -> &'e Path {
        entry.path().strip_prefix(&self.root).unwrap_or(entry.path())
    }
}
