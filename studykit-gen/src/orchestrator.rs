//! Pipeline orchestration per artifact kind
//!
//! One `GenerationPipeline` exists per active content selection. It owns the
//! per-kind state map, enforces at most one outstanding job per kind, and
//! ties the pieces together: check cache, submit on miss, poll to a terminal
//! state, and on a forced regeneration invalidate before resubmitting.
//! Kinds are fully independent; a quiz may generate while flashcards poll.
//!
//! The pipeline is constructed fresh when the selection context changes and
//! torn down on navigation. Results arriving after a cancellation or
//! selection change are discarded via an epoch check, so a stale artifact
//! from one document set never leaks into the view of another.

use crate::backend::GenerationBackend;
use crate::cache::ArtifactCache;
use crate::error::{GenerationError, Result};
use crate::fingerprint::normalized_ids;
use crate::poller::CompletionPoller;
use crate::state::{KindState, PipelineStatus};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use studykit_common::artifact::{Artifact, ArtifactKind, GenerationParams};
use studykit_common::config::GenerationConfig;
use studykit_common::events::{EventBus, GenerationEvent};
use studykit_common::source::SourceContentRef;
use tokio::sync::{broadcast, Mutex};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Capacity of the event broadcast channel; slow subscribers lose events
const EVENT_CHANNEL_CAPACITY: usize = 64;

struct PipelineInner {
    selection: Vec<SourceContentRef>,
    states: HashMap<ArtifactKind, KindState>,
}

/// An in-flight claim on one artifact kind
///
/// Holds everything a generation attempt needs after the state lock is
/// released: the normalized source ids, the epoch the attempt started under,
/// and the token that cancels its wait.
struct Claim {
    source_ids: Vec<String>,
    epoch: u64,
    cancel: CancellationToken,
}

/// Orchestrates artifact generation for one content selection
pub struct GenerationPipeline<B> {
    backend: Arc<B>,
    cache: ArtifactCache<B>,
    poller: CompletionPoller<B>,
    inner: Mutex<PipelineInner>,
    events: EventBus,
    session_id: Uuid,
}

impl<B: GenerationBackend> GenerationPipeline<B> {
    pub fn new(backend: Arc<B>, selection: Vec<SourceContentRef>, config: &GenerationConfig) -> Self {
        Self {
            cache: ArtifactCache::new(Arc::clone(&backend)),
            poller: CompletionPoller::new(
                Arc::clone(&backend),
                Duration::from_millis(config.polling.interval_ms),
                config.polling.max_attempts,
            ),
            backend,
            inner: Mutex::new(PipelineInner {
                selection,
                states: HashMap::new(),
            }),
            events: EventBus::new(EVENT_CHANNEL_CAPACITY),
            session_id: Uuid::new_v4(),
        }
    }

    /// Id correlating this pipeline instance's events
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Subscribe to pipeline progress events
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationEvent> {
        self.events.subscribe()
    }

    /// Return the artifact for `params`, generating it if necessary
    ///
    /// Fast paths: a previously delivered artifact is returned as-is, then
    /// the cache is consulted. Only on a miss is a job submitted and polled.
    /// A second call for the same kind while one is outstanding is rejected
    /// without contacting the backend.
    pub async fn get_or_generate(&self, params: GenerationParams) -> Result<Artifact> {
        let kind = params.kind();

        let claim = {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;
            if inner.selection.is_empty() {
                return Err(GenerationError::Validation("no content selected".to_string()));
            }
            let state = inner.states.entry(kind).or_default();
            if let Some(artifact) = &state.current {
                return Ok(artifact.clone());
            }
            if state.in_flight {
                return Err(GenerationError::AlreadyInFlight { kind });
            }
            Self::claim_kind(state, &inner.selection)
        };

        if let Some(artifact) = self.cache.lookup(kind, &claim.source_ids, &params).await {
            let mut guard = self.inner.lock().await;
            let state = guard.states.entry(kind).or_default();
            if state.epoch != claim.epoch {
                return Err(GenerationError::Cancelled);
            }
            state.current = Some(artifact.clone());
            state.in_flight = false;
            state.last_error = None;
            state.cancel = None;
            self.events.emit(GenerationEvent::CacheHit {
                session_id: self.session_id,
                kind,
                timestamp: Utc::now(),
            });
            return Ok(artifact);
        }

        self.generate(kind, params, claim).await
    }

    /// Force a fresh generation, discarding any cached artifact first
    ///
    /// The cache is invalidated for the kind + source set (all parameter
    /// variants) before the new job is submitted; if invalidation fails the
    /// job is submitted anyway. Blocked only while the *same* kind is in
    /// flight.
    pub async fn regenerate(&self, params: GenerationParams) -> Result<Artifact> {
        let kind = params.kind();

        let claim = {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;
            if inner.selection.is_empty() {
                return Err(GenerationError::Validation("no content selected".to_string()));
            }
            let state = inner.states.entry(kind).or_default();
            if state.in_flight {
                return Err(GenerationError::AlreadyInFlight { kind });
            }
            state.current = None;
            Self::claim_kind(state, &inner.selection)
        };

        match self.cache.invalidate(kind, &claim.source_ids, None).await {
            Ok(deleted_count) => {
                self.events.emit(GenerationEvent::CacheInvalidated {
                    session_id: self.session_id,
                    kind,
                    deleted_count,
                    timestamp: Utc::now(),
                });
            }
            Err(e) => {
                // Best-effort cache hygiene; the stale entry will be
                // overwritten by the job this submission starts.
                tracing::warn!(kind = %kind, error = %e, "Cache invalidation failed, submitting anyway");
            }
        }

        self.generate(kind, params, claim).await
    }

    /// Stop observing an in-flight generation for `kind`
    ///
    /// Cooperative: the backend job keeps running and its result, once
    /// complete, becomes available to a future cache lookup. No state update
    /// from the abandoned wait is applied afterwards. No-op when nothing is
    /// in flight.
    pub async fn cancel(&self, kind: ArtifactKind) {
        let mut guard = self.inner.lock().await;
        if let Some(state) = guard.states.get_mut(&kind) {
            if state.in_flight {
                state.reset();
                self.events.emit(GenerationEvent::GenerationCancelled {
                    session_id: self.session_id,
                    kind,
                    timestamp: Utc::now(),
                });
            }
        }
    }

    /// Replace the active source-content selection
    ///
    /// Cancels every in-flight wait and clears all per-kind state, including
    /// delivered artifacts.
    pub async fn set_selection(&self, selection: Vec<SourceContentRef>) {
        let mut guard = self.inner.lock().await;
        guard.selection = selection;
        for (kind, state) in guard.states.iter_mut() {
            let was_in_flight = state.in_flight;
            state.reset();
            if was_in_flight {
                self.events.emit(GenerationEvent::GenerationCancelled {
                    session_id: self.session_id,
                    kind: *kind,
                    timestamp: Utc::now(),
                });
            }
        }
    }

    /// Read-only snapshot of one kind's state, for rendering
    pub async fn status(&self, kind: ArtifactKind) -> PipelineStatus {
        let guard = self.inner.lock().await;
        guard
            .states
            .get(&kind)
            .map(PipelineStatus::from)
            .unwrap_or_default()
    }

    /// The active selection
    pub async fn selection(&self) -> Vec<SourceContentRef> {
        self.inner.lock().await.selection.clone()
    }

    /// Mark `state` in flight and capture what the attempt needs
    fn claim_kind(state: &mut KindState, selection: &[SourceContentRef]) -> Claim {
        let cancel = CancellationToken::new();
        state.in_flight = true;
        state.cancel = Some(cancel.clone());
        let ids: Vec<String> = selection.iter().map(|r| r.id.clone()).collect();
        Claim {
            source_ids: normalized_ids(&ids),
            epoch: state.epoch,
            cancel,
        }
    }

    /// Submit and poll one generation job under an existing claim
    async fn generate(
        &self,
        kind: ArtifactKind,
        params: GenerationParams,
        claim: Claim,
    ) -> Result<Artifact> {
        if claim.cancel.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }

        let submitted = match self
            .backend
            .submit(kind, &claim.source_ids, &params)
            .await
        {
            Ok(response) => response,
            Err(e) => return self.fail(kind, claim.epoch, e).await,
        };

        tracing::info!(kind = %kind, job_id = %submitted.job_id, "Generation job submitted");
        self.events.emit(GenerationEvent::JobSubmitted {
            session_id: self.session_id,
            kind,
            job_id: submitted.job_id.clone(),
            timestamp: Utc::now(),
        });

        match self
            .poller
            .wait_for_completion(&submitted.job_id, &claim.cancel)
            .await
        {
            Ok(success) => {
                let mut guard = self.inner.lock().await;
                let state = guard.states.entry(kind).or_default();
                if state.epoch != claim.epoch {
                    // Cancelled or selection changed while the final status
                    // request was in flight.
                    return Err(GenerationError::Cancelled);
                }
                state.current = Some(success.artifact.clone());
                state.in_flight = false;
                state.last_error = None;
                state.cancel = None;
                self.events.emit(GenerationEvent::GenerationCompleted {
                    session_id: self.session_id,
                    kind,
                    job_id: submitted.job_id,
                    poll_attempts: success.attempts,
                    timestamp: Utc::now(),
                });
                Ok(success.artifact)
            }
            // State was already reset by whoever cancelled.
            Err(GenerationError::Cancelled) => Err(GenerationError::Cancelled),
            Err(e) => self.fail(kind, claim.epoch, e).await,
        }
    }

    /// Record a terminal failure and surface it to the caller
    async fn fail(
        &self,
        kind: ArtifactKind,
        epoch: u64,
        error: GenerationError,
    ) -> Result<Artifact> {
        let mut guard = self.inner.lock().await;
        let state = guard.states.entry(kind).or_default();
        if state.epoch == epoch {
            state.in_flight = false;
            state.cancel = None;
            if error.is_recordable() {
                state.last_error = Some(error.clone());
            }
            self.events.emit(GenerationEvent::GenerationFailed {
                session_id: self.session_id,
                kind,
                error: error.to_string(),
                timestamp: Utc::now(),
            });
        }
        Err(error)
    }
}
