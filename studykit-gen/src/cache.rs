//! Cached-artifact lookup and invalidation
//!
//! Lookup is fail-open: a backend or transport failure reads as a miss so a
//! fresh generation attempt can proceed. Generation is idempotent, so
//! re-running on a false miss is safe; blocking the user on a flaky cache
//! check is not. Invalidation is idempotent and deleting zero entries is
//! success.

use crate::backend::GenerationBackend;
use crate::error::Result;
use crate::fingerprint::{lookup_fingerprint, lookup_params, normalized_ids};
use std::sync::Arc;
use studykit_common::artifact::{Artifact, ArtifactKind, GenerationParams};

/// Read/delete access to previously generated artifacts
pub struct ArtifactCache<B> {
    backend: Arc<B>,
}

impl<B: GenerationBackend> ArtifactCache<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Look up a previously completed artifact for kind + source set
    ///
    /// Returns `None` on a definitive miss and on backend failure alike.
    /// Never returns a partial result: the backend only caches completed
    /// jobs, and a `cached` response without a payload is treated as a miss.
    pub async fn lookup(
        &self,
        kind: ArtifactKind,
        source_ids: &[String],
        params: &GenerationParams,
    ) -> Option<Artifact> {
        let ids = normalized_ids(source_ids);
        let fingerprint = lookup_fingerprint(kind, &ids, params);

        match self
            .backend
            .cached_result(kind, &ids, lookup_params(params))
            .await
        {
            Ok(response) if response.cached => match response.result {
                Some(artifact) => {
                    tracing::debug!(
                        kind = %kind,
                        fingerprint = %fingerprint,
                        "Cache hit"
                    );
                    Some(artifact)
                }
                None => {
                    tracing::warn!(
                        kind = %kind,
                        fingerprint = %fingerprint,
                        "Backend reported cached result without payload, treating as miss"
                    );
                    None
                }
            },
            Ok(_) => {
                tracing::debug!(kind = %kind, fingerprint = %fingerprint, "Cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(
                    kind = %kind,
                    fingerprint = %fingerprint,
                    error = %e,
                    "Cache lookup failed, treating as miss"
                );
                None
            }
        }
    }

    /// Delete cached artifacts of `kind` for the source set
    ///
    /// With `params: None` every cached variant of the kind is removed,
    /// regardless of the parameters that produced it.
    pub async fn invalidate(
        &self,
        kind: ArtifactKind,
        source_ids: &[String],
        params: Option<&GenerationParams>,
    ) -> Result<u64> {
        let ids = normalized_ids(source_ids);
        let response = self.backend.invalidate(kind, &ids, params).await?;

        tracing::debug!(
            kind = %kind,
            deleted_count = response.deleted_count,
            "Cache invalidated"
        );
        Ok(response.deleted_count)
    }
}
