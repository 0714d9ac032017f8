//! Tracked-file hash tree
//!
//! Resolves the tracked subset of a root and represents it as a Merkle-style
//! tree, where each folder's digest is derived from its children's digests.

pub mod builder;
pub mod hasher;
pub mod path;
pub mod pattern;
pub mod resolver;

pub use builder::{ContentSource, FsContentSource, HashTree, TreeBuilder};
pub use resolver::{ResolvedScope, Resolver, ResolverConfig};
