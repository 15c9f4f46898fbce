//! Cache-key derivation for derived artifacts
//!
//! A fingerprint identifies one artifact request: kind, source-content set,
//! and (kind-dependent) parameters. Source ids are sorted before hashing so
//! selection order never changes the key.

use sha2::{Digest, Sha256};
use std::fmt;
use studykit_common::artifact::{ArtifactKind, GenerationParams};

/// Deterministic cache key for one artifact request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    key: String,
}

impl Fingerprint {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Parameters as they participate in the cache-lookup key
///
/// For `flashcards` and `quiz`, any cached artifact for the kind + source set
/// is reused regardless of count or difficulty, so parameters are dropped
/// from the lookup key. They still travel on submission. This is the single
/// place that decides which kinds get the relaxed key.
pub fn lookup_params(params: &GenerationParams) -> Option<&GenerationParams> {
    match params {
        GenerationParams::Flashcards(_) | GenerationParams::Quiz(_) => None,
        other => Some(other),
    }
}

/// Source ids sorted lexicographically, duplicates removed
pub fn normalized_ids(source_ids: &[String]) -> Vec<String> {
    let mut ids: Vec<String> = source_ids.to_vec();
    ids.sort();
    ids.dedup();
    ids
}

/// Build the cache-lookup fingerprint for an artifact request
pub fn lookup_fingerprint(
    kind: ArtifactKind,
    source_ids: &[String],
    params: &GenerationParams,
) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_str().as_bytes());
    hasher.update([0u8]);

    for id in normalized_ids(source_ids) {
        hasher.update(id.as_bytes());
        hasher.update([0u8]);
    }

    if let Some(params) = lookup_params(params) {
        // Struct fields serialize in declaration order and question types are
        // a BTreeSet, so this JSON form is canonical.
        let payload = params.payload();
        hasher.update(payload.to_string().as_bytes());
    }

    Fingerprint {
        key: format!("{:x}", hasher.finalize()),
    }
}
