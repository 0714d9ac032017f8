//! Digest computation for tracked files and folders using BLAKE3

use crate::types::{Digest, NodeKind};
use blake3::Hasher;

/// Compute the digest of a file's byte content.
///
/// Depends only on the bytes; paths and metadata never enter the digest.
pub fn compute_content_hash(content: &[u8]) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(content);
    Digest(*hasher.finalize().as_bytes())
}

/// Compute the digest of a folder from its direct children.
///
/// Digest = hash("folder" || children_count || (name_len || name || kind || digest)*)
///
/// Children are sorted by name before folding, so the caller's ordering
/// never affects the result.
pub fn compute_folder_digest(children: &[(String, NodeKind, Digest)]) -> Digest {
    let mut sorted: Vec<&(String, NodeKind, Digest)> = children.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Hasher::new();

    // Hash type discriminator
    hasher.update(b"folder");

    // Hash children count (8 bytes, big-endian)
    hasher.update(&(sorted.len() as u64).to_be_bytes());

    for (name, kind, digest) in sorted {
        // Length prefix keeps adjacent names from running together
        hasher.update(&(name.len() as u64).to_be_bytes());
        hasher.update(name.as_bytes());
        hasher.update(kind.tag());
        hasher.update(digest.as_bytes());
    }

    Digest(*hasher.finalize().as_bytes())
}

/// Digest of a folder with no tracked children.
pub fn empty_folder_digest() -> Digest {
    compute_folder_digest(&[])
}
