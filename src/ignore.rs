//! Implicit ignore policy applied on top of include/exclude patterns.
//!
//! Rules, in order:
//! - the state directory (`.slim`) is never tracked
//! - the documentation placeholder file (`codemap.md`) is never tracked
//! - hidden entries below the root are skipped when `skip_hidden` is set
//! - the root `.gitignore` applies when `respect_gitignore` is set
//!
//! Only the root `.gitignore` is read; nested ignore files are not consulted.

use crate::placeholder::PLACEHOLDER_FILE;
use crate::store::STATE_DIR;
use crate::tree::path;
use ::ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;
use tracing::{debug, warn};

/// Name of the version-control ignore file read from the root.
const GITIGNORE_FILE: &str = ".gitignore";

/// Implicit ignore rules for one root.
pub struct IgnorePolicy {
    gitignore: Option<Gitignore>,
    skip_hidden: bool,
}

impl IgnorePolicy {
    /// Build the policy for `root`. A `.gitignore` that fails to parse is
    /// logged and skipped rather than treated as fatal.
    pub fn load(root: &Path, respect_gitignore: bool, skip_hidden: bool) -> Self {
        let gitignore = if respect_gitignore {
            let gitignore_path = root.join(GITIGNORE_FILE);
            if gitignore_path.is_file() {
                let mut builder = GitignoreBuilder::new(root);
                if let Some(e) = builder.add(&gitignore_path) {
                    warn!("Partially parsed .gitignore: {}", e);
                }
                match builder.build() {
                    Ok(gi) => {
                        debug!(rules = gi.num_ignores(), "Loaded .gitignore");
                        Some(gi)
                    }
                    Err(e) => {
                        warn!("Failed to parse .gitignore: {}", e);
                        None
                    }
                }
            } else {
                None
            }
        } else {
            None
        };

        Self {
            gitignore,
            skip_hidden,
        }
    }

    /// Whether a tracked path (never the root) is covered by the policy.
    pub fn is_ignored(&self, tracked: &str, is_dir: bool) -> bool {
        let name = path::name_of(tracked);

        if tracked == STATE_DIR || tracked.starts_with(&format!("{}/", STATE_DIR)) {
            return true;
        }
        if !is_dir && name == PLACEHOLDER_FILE {
            return true;
        }
        if self.skip_hidden && name.starts_with('.') {
            return true;
        }
        if let Some(ref gi) = self.gitignore {
            if gi.matched(Path::new(tracked), is_dir).is_ignore() {
                return true;
            }
        }
        false
    }
}
