//! Study artifact types and generation parameters
//!
//! An artifact is one AI-derived study aid (flashcards, a quiz, a summary, or
//! structured notes) produced from a set of source content. Each kind carries
//! its own parameter schema; parameters travel with the generation request
//! and, for some kinds, participate in the cache key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Closed enumeration of artifact kinds the pipeline can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Flashcards,
    Quiz,
    Summary,
    Notes,
}

impl ArtifactKind {
    /// All kinds, in a stable order (used when resetting per-kind state)
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Flashcards,
        ArtifactKind::Quiz,
        ArtifactKind::Summary,
        ArtifactKind::Notes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Flashcards => "flashcards",
            ArtifactKind::Quiz => "quiz",
            ArtifactKind::Summary => "summary",
            ArtifactKind::Notes => "notes",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Requested difficulty for flashcard and quiz generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardParams {
    pub difficulty: Difficulty,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizParams {
    pub question_count: u32,
    /// BTreeSet keeps the serialized form order-stable
    pub question_types: BTreeSet<String>,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesParams {
    /// Note style, e.g. "outline" or "cornell"; distinct styles are distinct artifacts
    pub style: String,
}

/// Kind-specific generation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GenerationParams {
    Flashcards(FlashcardParams),
    Quiz(QuizParams),
    /// Summaries take no parameters
    Summary,
    Notes(NotesParams),
}

impl GenerationParams {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            GenerationParams::Flashcards(_) => ArtifactKind::Flashcards,
            GenerationParams::Quiz(_) => ArtifactKind::Quiz,
            GenerationParams::Summary => ArtifactKind::Summary,
            GenerationParams::Notes(_) => ArtifactKind::Notes,
        }
    }

    /// Parameter payload as sent on submission (no kind tag; `{}` for summary)
    pub fn payload(&self) -> serde_json::Value {
        match self {
            GenerationParams::Flashcards(p) => {
                serde_json::to_value(p).unwrap_or(serde_json::Value::Null)
            }
            GenerationParams::Quiz(p) => serde_json::to_value(p).unwrap_or(serde_json::Value::Null),
            GenerationParams::Summary => serde_json::json!({}),
            GenerationParams::Notes(p) => {
                serde_json::to_value(p).unwrap_or(serde_json::Value::Null)
            }
        }
    }
}

/// One flashcard in a generated deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    /// e.g. "multiple-choice", "true-false", "short-answer"
    pub question_type: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSection {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notes {
    pub style: String,
    pub sections: Vec<NoteSection>,
}

/// A generated study artifact
///
/// Only ever constructed from a completed generation job or a cache hit;
/// partial results never take this form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Artifact {
    Flashcards { cards: Vec<Flashcard> },
    Quiz { quiz: Quiz },
    Summary { summary: Summary },
    Notes { notes: Notes },
}

impl Artifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::Flashcards { .. } => ArtifactKind::Flashcards,
            Artifact::Quiz { .. } => ArtifactKind::Quiz,
            Artifact::Summary { .. } => ArtifactKind::Summary,
            Artifact::Notes { .. } => ArtifactKind::Notes,
        }
    }
}
