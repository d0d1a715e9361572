//! Content fingerprints for migration resources.
//!
//! Checksums are SHA-256 over UTF-8 content with line endings normalized to
//! `\n`, rendered as lowercase hex. Multi-resource checksums sort the
//! resource names before combining, so the result is independent of
//! discovery order. Note this is not compatible with checksums recorded by
//! other migration tools; adopting an existing history table requires
//! re-baselining.

use std::borrow::Cow;

use sha2::{Digest, Sha256};

/// Fingerprints one resource's content.
#[must_use]
pub fn checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_line_endings(content).as_bytes());
    to_hex(&hasher.finalize())
}

/// Fingerprints a set of named resources.
///
/// Per-resource digests are computed first, sorted by resource name, then
/// hashed together; reordering the input never changes the result.
#[must_use]
pub fn combined_checksum(resources: &[(&str, &str)]) -> String {
    let mut digests: Vec<(&str, String)> = resources
        .iter()
        .map(|(name, content)| (*name, checksum(content)))
        .collect();
    digests.sort_by(|a, b| a.0.cmp(b.0));

    let mut hasher = Sha256::new();
    for (name, digest) in digests {
        hasher.update(name.as_bytes());
        hasher.update(digest.as_bytes());
    }
    to_hex(&hasher.finalize())
}

fn normalize_line_endings(content: &str) -> Cow<'_, str> {
    if content.contains('\r') {
        Cow::Owned(content.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(content)
    }
}

fn to_hex(bytes: &[u8]) -> String {
    use core::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
