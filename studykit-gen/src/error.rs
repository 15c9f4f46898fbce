//! Error types for the generation pipeline
//!
//! Every failure is scoped to a single artifact-kind request; nothing here is
//! fatal to the session. The taxonomy distinguishes failures the UI messages
//! differently: a backend-reported failure ("generation failed") is not a
//! timeout ("still processing, try again"), and neither is a rejection that
//! happened before any job existed.

use studykit_common::artifact::ArtifactKind;
use thiserror::Error;

/// Result type for generation pipeline operations
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Failures surfaced by the generation pipeline
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Rejected before any backend call (e.g. empty content selection)
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The backend rejected the generate call synchronously
    #[error("Submission rejected: {0}")]
    Submission(String),

    /// The job reached terminal state `failed`
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Poll attempts exhausted before the job reached a terminal state
    #[error("Generation still pending after {attempts} status checks")]
    PollingTimeout { attempts: u32 },

    /// Network failure talking to the backend
    #[error("Transport error: {0}")]
    Transport(String),

    /// A job of the same kind is already being polled for this selection
    #[error("{kind} generation already in progress")]
    AlreadyInFlight { kind: ArtifactKind },

    /// The wait was cancelled before a terminal state was observed
    #[error("Generation cancelled")]
    Cancelled,
}

impl GenerationError {
    /// True for failures worth recording in per-kind pipeline state
    ///
    /// Synchronous rejections (validation, duplicate request) and
    /// cancellations return to the caller only; they do not represent the
    /// outcome of a generation attempt.
    pub fn is_recordable(&self) -> bool {
        matches!(
            self,
            GenerationError::Submission(_)
                | GenerationError::Generation(_)
                | GenerationError::PollingTimeout { .. }
                | GenerationError::Transport(_)
        )
    }
}
