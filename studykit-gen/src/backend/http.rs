//! HTTP binding to the generation backend

use crate::backend::{
    CachedResultResponse, GenerationBackend, InvalidateResponse, JobStatusResponse, SubmitResponse,
};
use crate::error::{GenerationError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use studykit_common::artifact::{ArtifactKind, GenerationParams};
use studykit_common::config::GenerationConfig;

const USER_AGENT: &str = "StudyKit/0.1.0";

/// Wire body for `POST generate`
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    kind: ArtifactKind,
    source_ids: &'a [String],
    parameters: serde_json::Value,
}

/// reqwest-backed implementation of [`GenerationBackend`]
pub struct HttpGenerationBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpGenerationBackend {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Query pairs shared by the cache endpoints
    fn cache_query(
        kind: ArtifactKind,
        source_ids: &[String],
        parameters: Option<&GenerationParams>,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![("kind", kind.as_str().to_string())];
        for id in source_ids {
            query.push(("source_id", id.clone()));
        }
        if let Some(params) = parameters {
            query.push(("parameters", params.payload().to_string()));
        }
        query
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn submit(
        &self,
        kind: ArtifactKind,
        source_ids: &[String],
        parameters: &GenerationParams,
    ) -> Result<SubmitResponse> {
        let body = GenerateRequest {
            kind,
            source_ids,
            parameters: parameters.payload(),
        };

        let response = self
            .http_client
            .post(self.url("/generate"))
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Backend rejection (malformed parameters, quota, ...) is a
            // submission error, distinct from a later polling failure.
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::Submission(format!(
                "{}: {}",
                status, detail
            )));
        }

        response
            .json::<SubmitResponse>()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse> {
        let response = self
            .http_client
            .get(self.url(&format!("/jobs/{}", job_id)))
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Transport(format!(
                "job status returned {}",
                status
            )));
        }

        response
            .json::<JobStatusResponse>()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))
    }

    async fn delete_job(&self, job_id: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(self.url(&format!("/jobs/{}", job_id)))
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Transport(format!(
                "job delete returned {}",
                status
            )));
        }
        Ok(())
    }

    async fn cached_result(
        &self,
        kind: ArtifactKind,
        source_ids: &[String],
        parameters: Option<&GenerationParams>,
    ) -> Result<CachedResultResponse> {
        let response = self
            .http_client
            .get(self.url("/cache"))
            .query(&Self::cache_query(kind, source_ids, parameters))
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Transport(format!(
                "cache lookup returned {}",
                status
            )));
        }

        response
            .json::<CachedResultResponse>()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))
    }

    async fn invalidate(
        &self,
        kind: ArtifactKind,
        source_ids: &[String],
        parameters: Option<&GenerationParams>,
    ) -> Result<InvalidateResponse> {
        let response = self
            .http_client
            .delete(self.url("/cache"))
            .query(&Self::cache_query(kind, source_ids, parameters))
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Transport(format!(
                "cache invalidation returned {}",
                status
            )));
        }

        response
            .json::<InvalidateResponse>()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))
    }
}
