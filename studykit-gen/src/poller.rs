//! Completion polling for generation jobs
//!
//! Polls job status on a fixed cadence until a terminal state, attempt
//! exhaustion, or cancellation. The cadence is uniform (no backoff):
//! generation latency is bounded and user-facing, so a steady interval keeps
//! perceived responsiveness high. A transport error during any status check
//! ends the wait immediately rather than silently extending it.

use crate::backend::{GenerationBackend, JobStatus};
use crate::error::{GenerationError, Result};
use std::sync::Arc;
use std::time::Duration;
use studykit_common::artifact::Artifact;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Successful poll outcome
#[derive(Debug, Clone)]
pub struct PollSuccess {
    pub artifact: Artifact,
    /// Status checks it took to observe completion
    pub attempts: u32,
}

/// Polls one job to a terminal state
pub struct CompletionPoller<B> {
    backend: Arc<B>,
    interval: Duration,
    max_attempts: u32,
}

impl<B: GenerationBackend> CompletionPoller<B> {
    pub fn new(backend: Arc<B>, interval: Duration, max_attempts: u32) -> Self {
        Self {
            backend,
            interval,
            max_attempts,
        }
    }

    /// Wait for `job_id` to reach a terminal state
    ///
    /// Delivers the artifact (or a typed error) exactly once; no further
    /// status requests are issued after a terminal result. Cancellation is
    /// cooperative: an in-flight status request completes and its result is
    /// discarded.
    ///
    /// One full interval elapses before the first status check; generation
    /// takes tens of seconds, so an immediate check never succeeds.
    pub async fn wait_for_completion(
        &self,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> Result<PollSuccess> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() completes its first tick immediately; consume it so each
        // attempt below waits one full period.
        ticker.tick().await;

        for attempt in 1..=self.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(job_id, attempt, "Polling cancelled");
                    return Err(GenerationError::Cancelled);
                }
                _ = ticker.tick() => {}
            }

            let response = self.backend.job_status(job_id).await?;

            if cancel.is_cancelled() {
                tracing::debug!(job_id, attempt, "Polling cancelled, discarding response");
                return Err(GenerationError::Cancelled);
            }

            match response.status {
                JobStatus::Pending => {
                    tracing::debug!(job_id, attempt, "Job still pending");
                }
                JobStatus::Completed => {
                    let artifact = response.result.ok_or_else(|| {
                        GenerationError::Transport(
                            "job completed without a result payload".to_string(),
                        )
                    })?;
                    tracing::info!(job_id, attempt, "Job completed");
                    return Ok(PollSuccess {
                        artifact,
                        attempts: attempt,
                    });
                }
                JobStatus::Failed => {
                    let reason = response
                        .error
                        .unwrap_or_else(|| "no reason reported".to_string());
                    tracing::warn!(job_id, attempt, reason = %reason, "Job failed");
                    // The failure has been consumed; the record can go.
                    self.discard_job(job_id).await;
                    return Err(GenerationError::Generation(reason));
                }
            }
        }

        tracing::warn!(
            job_id,
            attempts = self.max_attempts,
            "Job did not reach a terminal state before the attempt bound"
        );
        Err(GenerationError::PollingTimeout {
            attempts: self.max_attempts,
        })
    }

    /// Best-effort cleanup of a terminal job record
    async fn discard_job(&self, job_id: &str) {
        if let Err(e) = self.backend.delete_job(job_id).await {
            tracing::warn!(job_id, error = %e, "Failed to discard terminal job record");
        }
    }
}
