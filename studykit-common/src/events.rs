//! Generation pipeline event types
//!
//! Provides shared event definitions and the EventBus the pipeline broadcasts
//! on. Sends are lossy best-effort; a subscriber that falls behind misses
//! events rather than slowing the pipeline. All events carry the session id
//! of the pipeline instance that emitted them, for correlation when several
//! selection contexts are alive at once.

use crate::artifact::ArtifactKind;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted by the generation pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GenerationEvent {
    /// Cache lookup satisfied the request; no job was submitted
    CacheHit {
        session_id: Uuid,
        kind: ArtifactKind,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Generation job accepted by the backend
    JobSubmitted {
        session_id: Uuid,
        kind: ArtifactKind,
        job_id: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Job reached terminal success and the artifact was delivered
    GenerationCompleted {
        session_id: Uuid,
        kind: ArtifactKind,
        job_id: String,
        /// Status checks it took to observe completion
        poll_attempts: u32,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Request failed (submission rejection, backend failure, or timeout)
    GenerationFailed {
        session_id: Uuid,
        kind: ArtifactKind,
        error: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Wait abandoned before a terminal state was observed
    GenerationCancelled {
        session_id: Uuid,
        kind: ArtifactKind,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Cached artifacts removed ahead of a forced regeneration
    CacheInvalidated {
        session_id: Uuid,
        kind: ArtifactKind,
        deleted_count: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Broadcast bus for [`GenerationEvent`]
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GenerationEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GenerationEvent> {
        self.tx.subscribe()
    }

    /// Lossy send: no subscribers, or subscriber lag, is not an error
    pub fn emit(&self, event: GenerationEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_type_tagged_for_subscribers() {
        let event = GenerationEvent::JobSubmitted {
            session_id: Uuid::new_v4(),
            kind: ArtifactKind::Quiz,
            job_id: "job-42".to_string(),
            timestamp: chrono::Utc::now(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "JobSubmitted");
        assert_eq!(value["kind"], "quiz");
    }

    #[test]
    fn emit_without_subscribers_is_a_no_op() {
        let bus = EventBus::new(8);
        bus.emit(GenerationEvent::CacheHit {
            session_id: Uuid::new_v4(),
            kind: ArtifactKind::Summary,
            timestamp: chrono::Utc::now(),
        });

        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }
}
