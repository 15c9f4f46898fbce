//! Generation backend binding
//!
//! The pipeline is a client of an external generation service. This module
//! defines the binding trait plus its wire types; `http` provides the
//! production reqwest implementation, and tests script their own.

mod http;

pub use http::HttpGenerationBackend;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use studykit_common::artifact::{Artifact, ArtifactKind, GenerationParams};

/// Status of a generation job as reported by the backend
///
/// `Completed` and `Failed` are terminal; a job never transitions out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

/// Response to `POST generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub job_id: String,
}

/// Response to `GET jobStatus`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub status: JobStatus,
    /// Present only when `status` is `completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Artifact>,
    /// Backend-provided reason, present only when `status` is `failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response to `GET cachedResult`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResultResponse {
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Artifact>,
}

/// Response to `DELETE cachedResult`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidateResponse {
    #[serde(default)]
    pub deleted_count: u64,
}

/// Operations the generation backend exposes to the pipeline
///
/// Semantics the pipeline relies on:
/// - `submit` returns as soon as the job is accepted; it never waits for
///   generation to finish.
/// - `cached_result` only ever reflects completed jobs; `cached: true` with a
///   payload is a reusable artifact, never a partial one.
/// - `invalidate` deleting zero entries is success.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// `POST generate` — request computation of an artifact
    async fn submit(
        &self,
        kind: ArtifactKind,
        source_ids: &[String],
        parameters: &GenerationParams,
    ) -> Result<SubmitResponse>;

    /// `GET jobStatus`
    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse>;

    /// `DELETE jobStatus` — cleanup of a terminal job record
    async fn delete_job(&self, job_id: &str) -> Result<()>;

    /// `GET cachedResult` — `parameters: None` matches any cached variant of
    /// the kind for the source set
    async fn cached_result(
        &self,
        kind: ArtifactKind,
        source_ids: &[String],
        parameters: Option<&GenerationParams>,
    ) -> Result<CachedResultResponse>;

    /// `DELETE cachedResult` — `parameters: None` deletes every cached
    /// variant of the kind for the source set
    async fn invalidate(
        &self,
        kind: ArtifactKind,
        source_ids: &[String],
        parameters: Option<&GenerationParams>,
    ) -> Result<InvalidateResponse>;
}
