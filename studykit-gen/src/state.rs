//! Per-kind pipeline state

use crate::error::GenerationError;
use serde::Serialize;
use studykit_common::artifact::Artifact;
use tokio_util::sync::CancellationToken;

/// Mutable state the orchestrator keeps per artifact kind
///
/// Owned exclusively by the orchestrator and reset whenever the active
/// source-content selection changes.
#[derive(Debug, Default)]
pub(crate) struct KindState {
    pub in_flight: bool,
    pub last_error: Option<GenerationError>,
    pub current: Option<Artifact>,
    /// Bumped on every cancellation and selection change. A generation
    /// attempt records the epoch it started under and may only write results
    /// back while the epoch still matches.
    pub epoch: u64,
    /// Token for the in-flight poll, if any
    pub cancel: Option<CancellationToken>,
}

impl KindState {
    /// Cancel any in-flight work and clear the state
    pub fn reset(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.in_flight = false;
        self.last_error = None;
        self.current = None;
        self.epoch += 1;
    }
}

/// Read-only snapshot of one kind's state, for rendering
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStatus {
    pub in_flight: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Artifact>,
}

impl From<&KindState> for PipelineStatus {
    fn from(state: &KindState) -> Self {
        Self {
            in_flight: state.in_flight,
            last_error: state.last_error.as_ref().map(|e| e.to_string()),
            current: state.current.clone(),
        }
    }
}
