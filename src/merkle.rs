//! Merkle root over an ordered list of string fingerprints.
//!
//! Leaves are hashed pairwise left to right; an odd trailing leaf is paired
//! with itself. Levels are reduced until a single digest remains.

use crate::crypto::{digest, HashHex};

/// Root digest of `fingerprints`.
///
/// A single fingerprint is returned as-is, matching the reduction's base
/// case. An empty list has no natural root and yields the digest of the
/// empty string.
pub fn merkle_root<S: AsRef<str>>(fingerprints: &[S]) -> HashHex {
    if fingerprints.is_empty() {
        return digest("");
    }

    let mut level: Vec<String> = fingerprints.iter().map(|f| f.as_ref().to_string()).collect();
    while level.len() > 1 {
        level = next_level(&level);
    }
    level.swap_remove(0)
}

fn next_level(level: &[String]) -> Vec<String> {
    let mut parents = Vec::with_capacity(level.len().div_ceil(2));
    for pair in level.chunks(2) {
        let left = &pair[0];
        let right = pair.get(1).unwrap_or(left);
        parents.push(digest(&format!("{}{}", left, right)));
    }
    parents
}
