use crate::clock::{Clock, SystemClock};
use crate::config::SentenceBufferConfig;
use crate::error::Error;
use crate::normalize::normalize;

/// Silence-triggered sentence buffer — the simple fallback strategy.
///
/// Chunks accumulate joined by spaces; a chunk that lands on a terminal
/// marker flushes immediately, anything else (re)arms a flush deadline.
/// There is no boundary classifier and no segment ledger here; use
/// [`crate::ClauseCommitEngine`] when clause-level granularity matters.
///
/// Deadlines are polled rather than scheduled: the owner calls [`poll`] on
/// its periodic tick and receives the flushed sentence once the deadline
/// passes.
///
/// [`poll`]: SentenceBuffer::poll
pub struct SentenceBuffer {
    config: SentenceBufferConfig,
    clock: Box<dyn Clock>,
    terminal_markers: Vec<&'static str>,
    buf: String,
    deadline: Option<u64>,
}

impl SentenceBuffer {
    pub fn new(config: SentenceBufferConfig) -> Result<Self, Error> {
        Self::with_clock(config, SystemClock::new())
    }

    pub fn with_clock(
        config: SentenceBufferConfig,
        clock: impl Clock + 'static,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            clock: Box::new(clock),
            terminal_markers: vec![
                "요.", "니다.", "다.", "죠.", "함.", "함니다.", "?", "!", ".", "…",
            ],
            buf: String::new(),
            deadline: None,
        })
    }

    /// Add one partial STT chunk (interim or final). Returns the flushed
    /// sentence when the chunk completes one.
    pub fn add(&mut self, chunk: &str) -> Option<String> {
        let clean = normalize(chunk);
        if clean.is_empty() {
            return None;
        }

        if self.buf.is_empty() {
            self.buf = clean;
        } else {
            self.buf.push(' ');
            self.buf.push_str(&clean);
        }

        if self.ends_sentence() {
            self.flush(false)
        } else {
            self.deadline = Some(self.clock.now_ms() + self.config.timeout_ms);
            None
        }
    }

    /// Flush once the silence deadline has passed. Call on a periodic tick.
    pub fn poll(&mut self) -> Option<String> {
        match self.deadline {
            Some(at) if self.clock.now_ms() >= at => self.flush(true),
            _ => None,
        }
    }

    /// Force emission, e.g. at end of utterance. Tiny fragments are dropped
    /// unless the flush was silence-triggered — after a real pause even a
    /// short burst is worth keeping.
    pub fn flush(&mut self, from_timeout: bool) -> Option<String> {
        self.deadline = None;
        let out = std::mem::take(&mut self.buf);

        if out.is_empty() {
            return None;
        }
        if !from_timeout && out.chars().count() < self.config.min_length {
            tracing::debug!(chars = out.chars().count(), "short fragment dropped");
            return None;
        }
        Some(out)
    }

    /// Clear the buffer and disarm any pending flush (e.g. when switching
    /// speakers or languages).
    pub fn reset(&mut self) {
        self.deadline = None;
        self.buf.clear();
    }

    pub fn peek(&self) -> &str {
        &self.buf
    }

    fn ends_sentence(&self) -> bool {
        let t = self.buf.trim_end();
        self.terminal_markers.iter().any(|m| t.ends_with(m))
    }
}
