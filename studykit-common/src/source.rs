//! Source content references
//!
//! Source content (uploaded documents, recorded lectures, pasted text, video
//! transcripts) is ingested, transcribed, and persisted by other subsystems.
//! The generation pipeline only ever holds opaque ids plus a kind tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of source content a reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Document,
    Recording,
    Text,
    VideoTranscript,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Document => "document",
            SourceKind::Recording => "recording",
            SourceKind::Text => "text",
            SourceKind::VideoTranscript => "video-transcript",
        };
        write!(f, "{}", s)
    }
}

/// Reference to one unit of source content, immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceContentRef {
    /// Opaque id assigned by the ingestion subsystem
    pub id: String,
    pub kind: SourceKind,
}

impl SourceContentRef {
    pub fn new(id: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}
