//! Glob pattern sets for include/exclude resolution
//!
//! Patterns are matched against root-relative, forward-slash paths:
//! - `*` and `?` stay within one path segment, `**` spans segments
//! - a leading `/` anchors the pattern at the root
//! - an unanchored pattern may match at the root or beneath any folder
//! - a trailing `/` matches everything beneath a matching folder

use crate::error::CartographyError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Compiled set of glob patterns.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl PatternSet {
    /// Compile patterns into a single matcher.
    pub fn new(patterns: &[String]) -> Result<Self, CartographyError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            for expanded in expand(pattern)? {
                let glob = GlobBuilder::new(&expanded)
                    .literal_separator(true)
                    .build()
                    .map_err(|e| CartographyError::InvalidPattern {
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })?;
                builder.add(glob);
            }
        }
        let set = builder.build().map_err(|e| CartographyError::InvalidPattern {
            pattern: patterns.join(", "),
            reason: e.to_string(),
        })?;
        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    /// Whether a tracked path matches at least one pattern.
    pub fn is_match(&self, path: &str) -> bool {
        !self.patterns.is_empty() && self.set.is_match(path)
    }
}

/// Rewrite one user pattern into the globs that implement its dialect.
fn expand(pattern: &str) -> Result<Vec<String>, CartographyError> {
    let trimmed = pattern.trim();
    let (anchored, body) = match trimmed.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let directory = body.ends_with('/');
    let body = body.trim_end_matches('/');
    if body.is_empty() {
        return Err(CartographyError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "pattern is empty".to_string(),
        });
    }

    let body = if directory {
        format!("{}/**", body)
    } else {
        body.to_string()
    };

    if anchored || body.starts_with("**/") || body == "**" {
        Ok(vec![body])
    } else {
        let nested = format!("**/{}", body);
        Ok(vec![body, nested])
    }
}

/// Order-insensitive equality of two pattern lists (duplicates ignored).
pub fn same_patterns(a: &[String], b: &[String]) -> bool {
    use std::collections::BTreeSet;
    let a: BTreeSet<&str> = a.iter().map(|s| s.trim()).collect();
    let b: BTreeSet<&str> = b.iter().map(|s| s.trim()).collect();
    a == b
}
