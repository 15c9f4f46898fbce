//! Shared test support: a scripted generation backend
//!
//! Responses are queued per endpoint (and per job id for status checks);
//! empty queues fall back to benign defaults (cache miss, job pending).
//! Every call is appended to an ordered log so tests can assert call
//! ordering, e.g. invalidate-before-submit.

// Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use studykit_common::artifact::{
    Artifact, ArtifactKind, Difficulty, Flashcard, FlashcardParams, GenerationParams, Summary,
};
use studykit_common::config::{GenerationConfig, PollingConfig};
use studykit_common::source::{SourceContentRef, SourceKind};
use studykit_gen::backend::{
    CachedResultResponse, GenerationBackend, InvalidateResponse, JobStatus, JobStatusResponse,
    SubmitResponse,
};
use studykit_gen::error::{GenerationError, Result};

#[derive(Default)]
pub struct MockBackend {
    submit_queue: Mutex<VecDeque<Result<SubmitResponse>>>,
    status_scripts: Mutex<HashMap<String, VecDeque<Result<JobStatusResponse>>>>,
    cached_queue: Mutex<VecDeque<Result<CachedResultResponse>>>,
    invalidate_queue: Mutex<VecDeque<Result<InvalidateResponse>>>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_submit(&self, response: Result<SubmitResponse>) {
        self.submit_queue.lock().unwrap().push_back(response);
    }

    pub fn push_status(&self, job_id: &str, response: Result<JobStatusResponse>) {
        self.status_scripts
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn push_cached(&self, response: Result<CachedResultResponse>) {
        self.cached_queue.lock().unwrap().push_back(response);
    }

    pub fn push_invalidate(&self, response: Result<InvalidateResponse>) {
        self.invalidate_queue.lock().unwrap().push_back(response);
    }

    /// Ordered log of backend calls ("submit", "job_status:<id>", ...)
    pub fn call_log(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_matching(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn submit(
        &self,
        _kind: ArtifactKind,
        source_ids: &[String],
        _parameters: &GenerationParams,
    ) -> Result<SubmitResponse> {
        self.log(format!("submit:{}", source_ids.join("+")));
        self.submit_queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(SubmitResponse {
                    job_id: "job-1".to_string(),
                })
            })
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse> {
        self.log(format!("job_status:{}", job_id));
        self.status_scripts
            .lock()
            .unwrap()
            .get_mut(job_id)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| {
                Ok(JobStatusResponse {
                    status: JobStatus::Pending,
                    result: None,
                    error: None,
                })
            })
    }

    async fn delete_job(&self, job_id: &str) -> Result<()> {
        self.log(format!("delete_job:{}", job_id));
        Ok(())
    }

    async fn cached_result(
        &self,
        _kind: ArtifactKind,
        _source_ids: &[String],
        parameters: Option<&GenerationParams>,
    ) -> Result<CachedResultResponse> {
        self.log(format!(
            "cached_result:{}",
            if parameters.is_some() { "params" } else { "no-params" }
        ));
        self.cached_queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(CachedResultResponse {
                    cached: false,
                    result: None,
                })
            })
    }

    async fn invalidate(
        &self,
        _kind: ArtifactKind,
        _source_ids: &[String],
        parameters: Option<&GenerationParams>,
    ) -> Result<InvalidateResponse> {
        self.log(format!(
            "invalidate:{}",
            if parameters.is_some() { "params" } else { "no-params" }
        ));
        self.invalidate_queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(InvalidateResponse { deleted_count: 0 }))
    }
}

/// Config with millisecond cadence so polling tests finish fast
pub fn test_config(interval_ms: u64, max_attempts: u32) -> GenerationConfig {
    GenerationConfig {
        polling: PollingConfig {
            interval_ms,
            max_attempts,
        },
        ..GenerationConfig::default()
    }
}

pub fn selection(ids: &[&str]) -> Vec<SourceContentRef> {
    ids.iter()
        .map(|id| SourceContentRef::new(*id, SourceKind::Document))
        .collect()
}

pub fn flashcard_params(difficulty: Difficulty, count: u32) -> GenerationParams {
    GenerationParams::Flashcards(FlashcardParams { difficulty, count })
}

pub fn flashcard_deck(count: usize) -> Artifact {
    Artifact::Flashcards {
        cards: (0..count)
            .map(|i| Flashcard {
                front: format!("Question {}", i + 1),
                back: format!("Answer {}", i + 1),
                hint: None,
            })
            .collect(),
    }
}

pub fn summary_artifact(text: &str) -> Artifact {
    Artifact::Summary {
        summary: Summary {
            text: text.to_string(),
            key_points: Vec::new(),
        },
    }
}

pub fn pending() -> Result<JobStatusResponse> {
    Ok(JobStatusResponse {
        status: JobStatus::Pending,
        result: None,
        error: None,
    })
}

pub fn completed(artifact: Artifact) -> Result<JobStatusResponse> {
    Ok(JobStatusResponse {
        status: JobStatus::Completed,
        result: Some(artifact),
        error: None,
    })
}

pub fn failed(reason: &str) -> Result<JobStatusResponse> {
    Ok(JobStatusResponse {
        status: JobStatus::Failed,
        result: None,
        error: Some(reason.to_string()),
    })
}

pub fn transport_error() -> GenerationError {
    GenerationError::Transport("connection refused".to_string())
}

/// Route pipeline logs through the test writer; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Poll `cond` every couple of milliseconds until it holds or `deadline_ms`
/// elapses; returns the final evaluation
pub async fn wait_until(deadline_ms: u64, mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..(deadline_ms / 2).max(1) {
        if cond() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    cond()
}
