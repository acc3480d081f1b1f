//! Fingerprint generation for cache keys

use sha2::{Digest, Sha256};

/// Normalizes text for fingerprinting: case-folded with collapsed whitespace,
/// so trivially different spellings of the same submission share a key.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deterministic fingerprint of normalized submission text
///
/// Derived from the text alone - never from session or priority - so
/// identical text from different sessions shares a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(text: &str) -> Self {
        let normalized = normalize_text(text);
        let digest = Sha256::digest(normalized.as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
