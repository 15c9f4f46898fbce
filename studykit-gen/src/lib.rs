//! # StudyKit Generation Pipeline
//!
//! Derived-artifact generation and caching for StudyKit: given a selection of
//! source content, produce AI-derived study artifacts (flashcards, quizzes,
//! summaries, notes) through an asynchronous generation backend.
//!
//! The flow per artifact kind: check the cache, submit a job on a miss, poll
//! its status on a fixed cadence to a terminal state, and deliver the result
//! exactly once. Forced regeneration invalidates the cache first; abandoning
//! a wait (navigation, selection change) stops polling without touching the
//! backend job.

pub mod backend;
pub mod cache;
pub mod error;
pub mod fingerprint;
pub mod orchestrator;
pub mod poller;
pub mod state;

pub use backend::{GenerationBackend, HttpGenerationBackend};
pub use error::{GenerationError, Result};
pub use orchestrator::GenerationPipeline;
pub use poller::CompletionPoller;
pub use state::PipelineStatus;
