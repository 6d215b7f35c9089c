/// Why a commit was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(rename_all = "kebab-case")]
pub enum CommitReason {
    /// Hard terminal punctuation found in the buffer.
    Punct,
    /// Buffer ends on a declarative/polite sentence-final suffix.
    FinalEnding,
    /// Comma-class mark with a long enough tail beyond it.
    SoftPunct,
    /// Silence persisted past the normal force threshold.
    Timeout,
    /// Silence persisted past the longer connective threshold.
    TimeoutConnective,
    /// The recognizer closed the utterance.
    Final,
}

/// An emitted, immutable unit of confirmed clause text.
///
/// A later commit with the same `segment_id` and a higher `revision`
/// supersedes this one for display, but both stay in the event log.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct Commit {
    pub segment_id: u64,
    pub revision: u32,
    pub text: String,
    pub is_final: bool,
    pub reason: CommitReason,
}

/// Everything the engine can emit from one entry-point call, in the order it
/// was decided. Callers treat `Partial` as a low-confidence preview that is
/// safe to overwrite repeatedly.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EngineEvent {
    Partial { text: String },
    Commit(Commit),
}

impl EngineEvent {
    pub fn as_commit(&self) -> Option<&Commit> {
        match self {
            Self::Commit(c) => Some(c),
            Self::Partial { .. } => None,
        }
    }
}
