use crate::error::Error;

/// Thresholds for the clause-commit engine. All durations are milliseconds.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(default)]
pub struct EngineConfig {
    /// Silence age after which a buffered clause is force-committed.
    pub force_after_ms: u64,
    /// Longer grace period for buffers ending on a connective.
    pub connective_force_after_ms: u64,
    /// How long without interim changes counts as a pause.
    pub vad_silence_ms: u64,
    /// Minimum chars for any non-final commit.
    pub min_chunk_chars: usize,
    /// Stricter minimum for the first commit within a segment.
    pub min_first_commit_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            force_after_ms: 1400,
            connective_force_after_ms: 2300,
            vad_silence_ms: 420,
            min_chunk_chars: 12,
            min_first_commit_chars: 16,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.force_after_ms == 0 || self.connective_force_after_ms == 0 || self.vad_silence_ms == 0
        {
            return Err(Error::InvalidConfig("timeouts must be positive"));
        }
        if self.connective_force_after_ms < self.force_after_ms {
            return Err(Error::InvalidConfig(
                "connective timeout must not undercut the normal timeout",
            ));
        }
        if self.min_chunk_chars == 0 || self.min_first_commit_chars == 0 {
            return Err(Error::InvalidConfig("char minimums must be positive"));
        }
        Ok(())
    }
}

/// Thresholds for the silence-triggered sentence buffer.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, specta::Type)]
#[serde(default)]
pub struct SentenceBufferConfig {
    /// Flush deadline after the last added chunk.
    pub timeout_ms: u64,
    /// Fragments shorter than this are dropped unless silence-flushed.
    pub min_length: usize,
}

impl Default for SentenceBufferConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1200,
            min_length: 4,
        }
    }
}

impl SentenceBufferConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.timeout_ms == 0 {
            return Err(Error::InvalidConfig("timeout must be positive"));
        }
        Ok(())
    }
}
