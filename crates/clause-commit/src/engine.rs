//! # Clause-commit engine
//!
//! Single mutable accumulator of not-yet-committed text for the current
//! segment, plus the policy that decides when a prefix of it becomes a
//! commit. Three entry points drive it:
//!
//! - [`ClauseCommitEngine::feed_interim`] — a (possibly rewritten) partial
//!   transcript arrived;
//! - [`ClauseCommitEngine::feed_final`] — the recognizer closed the
//!   utterance; always commits and advances the segment;
//! - [`ClauseCommitEngine::tick`] — periodic poll, recommended at 10 Hz.
//!   Silence produces no input events, so timeout forcing can only be
//!   driven by polling.
//!
//! Each call returns the events it decided, in order. Revision numbers
//! within a segment strictly increase; `(segment_id, revision)` pairs are
//! lexicographically non-decreasing across any call sequence.

use crate::boundary::find_boundary;
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::dedup::strip_committed_prefix;
use crate::error::Error;
use crate::normalize::normalize;
use crate::rules::RuleSet;
use crate::types::{Commit, CommitReason, EngineEvent};

pub struct ClauseCommitEngine {
    config: EngineConfig,
    rules: RuleSet,
    clock: Box<dyn Clock>,

    /// Rolling not-yet-committed text for the current segment.
    buf: String,
    segment_id: u64,
    revision: u32,
    last_change_at: u64,
    segment_start_at: u64,

    /// Last partial we emitted, to suppress partial spam.
    last_partial_sent: String,
    /// Last committed text. Survives `reset()` so re-sent copies of already
    /// confirmed text still strip across a segment boundary.
    last_commit_text: String,
}

impl ClauseCommitEngine {
    pub fn new(config: EngineConfig) -> Result<Self, Error> {
        Self::with_rules(config, RuleSet::korean(), SystemClock::new())
    }

    pub fn with_clock(config: EngineConfig, clock: impl Clock + 'static) -> Result<Self, Error> {
        Self::with_rules(config, RuleSet::korean(), clock)
    }

    pub fn with_rules(
        config: EngineConfig,
        rules: RuleSet,
        clock: impl Clock + 'static,
    ) -> Result<Self, Error> {
        config.validate()?;
        let clock = Box::new(clock);
        let now = clock.now_ms();
        Ok(Self {
            config,
            rules,
            clock,
            buf: String::new(),
            segment_id: 1,
            revision: 0,
            last_change_at: now,
            segment_start_at: now,
            last_partial_sent: String::new(),
            last_commit_text: String::new(),
        })
    }

    /// Current segment id. Advances only when a final input closes the segment.
    pub fn segment_id(&self) -> u64 {
        self.segment_id
    }

    /// Commits emitted so far within the current segment.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// The live, not-yet-committed buffer content.
    pub fn buffered(&self) -> &str {
        &self.buf
    }

    /// Feed one interim transcript update. Whitespace-only input is a no-op.
    pub fn feed_interim(&mut self, text: &str) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        self.fold_interim(text, &mut events);
        events
    }

    /// Feed a final transcript. The buffer is folded in via the interim path,
    /// then committed unconditionally (finals are authoritative — length
    /// guards and the duplicate check do not apply), then the segment
    /// advances. An empty final emits nothing but still advances.
    pub fn feed_final(&mut self, text: &str) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        self.fold_interim(text, &mut events);

        let buffered = std::mem::take(&mut self.buf);
        if buffered.trim().is_empty() {
            tracing::debug!(segment = self.segment_id, "final with empty buffer");
        } else {
            self.emit_commit(&buffered, true, CommitReason::Final, &mut events);
        }
        self.advance_segment();
        events
    }

    /// Evaluate the commit policy once. Call on a fixed interval.
    pub fn tick(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if self.buf.is_empty() {
            return events;
        }

        let now = self.clock.now_ms();
        let since_change = now.saturating_sub(self.last_change_at);
        let since_start = now.saturating_sub(self.segment_start_at);

        let boundary = find_boundary(&self.buf, &self.rules);
        let chars = self.buf.chars().count();

        let last_token = self.buf.split_whitespace().next_back().unwrap_or("");
        let ends_on_particle = self.rules.is_particle_tail(last_token);
        let ends_on_adverb = self.rules.is_adverb_tail(last_token);
        let looks_like_stub = self.rules.is_short_stub(last_token);
        let ends_with_connective = self.rules.ends_with_hold(&self.buf);

        let pause_detected = since_change >= self.config.vad_silence_ms;
        let age_ok_normal = pause_detected && since_start >= self.config.force_after_ms;
        let age_ok_connective =
            pause_detected && since_start >= self.config.connective_force_after_ms;

        let mut should_force = age_ok_normal && chars >= self.config.min_chunk_chars;
        let mut force_reason = CommitReason::Timeout;

        // First utterances must accumulate more context before committing.
        if self.revision == 0 && boundary.is_none() && chars < self.config.min_first_commit_chars {
            should_force = false;
        }

        // Connective tails wait for the longer grace window.
        if ends_with_connective {
            should_force = age_ok_connective && chars >= self.config.min_first_commit_chars;
            if should_force {
                force_reason = CommitReason::TimeoutConnective;
            }
        }

        // Particles, trailing adverbs, and bare verb stubs read as an
        // incomplete clause; hold unless we already waited the long window.
        if should_force
            && (ends_on_particle || ends_on_adverb || looks_like_stub)
            && since_start < self.config.connective_force_after_ms
        {
            tracing::debug!(token = last_token, since_start, "force vetoed on incomplete tail");
            should_force = false;
        }

        // A detected boundary takes priority over pure-timeout forcing.
        if let Some(b) = boundary {
            if b.chars >= self.config.min_chunk_chars {
                let head = self.buf[..b.cut].trim().to_string();
                let tail = self.buf[b.cut..].trim().to_string();
                self.emit_commit(&head, false, b.reason, &mut events);
                if !tail.is_empty() {
                    tracing::debug!(chars = tail.chars().count(), "carrying boundary tail");
                }
                self.buf = tail;
                self.last_change_at = now;
                self.segment_start_at = now;
                // let the remainder be re-announced as a fresh partial
                self.last_partial_sent.clear();
                return events;
            }
        }

        if should_force {
            let text = std::mem::take(&mut self.buf);
            self.emit_commit(&text, false, force_reason, &mut events);
            self.last_change_at = now;
            self.segment_start_at = now;
            self.last_partial_sent.clear();
        }

        events
    }

    /// Clear buffer, revision, and timers. The last committed text is
    /// deliberately kept so duplicate resubmission across a segment boundary
    /// still strips.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.revision = 0;
        self.last_partial_sent.clear();
        let now = self.clock.now_ms();
        self.last_change_at = now;
        self.segment_start_at = now;
        tracing::debug!(segment = self.segment_id, "engine reset");
    }

    // ── Internal ────────────────────────────────────────────────────────────

    fn fold_interim(&mut self, text: &str, events: &mut Vec<EngineEvent>) {
        let full = normalize(text);
        if full.is_empty() {
            return;
        }

        let trimmed = if self.last_commit_text.is_empty() {
            full.as_str()
        } else {
            let tail = strip_committed_prefix(&full, &self.last_commit_text);
            if tail.len() != full.len() {
                tracing::trace!(
                    from = full.chars().count(),
                    to = tail.chars().count(),
                    "stripped committed prefix"
                );
            }
            tail
        };

        if trimmed == self.buf {
            return;
        }

        let was_empty = self.buf.is_empty();
        self.buf = trimmed.to_string();

        let now = self.clock.now_ms();
        self.last_change_at = now;
        if was_empty && !self.buf.is_empty() {
            self.segment_start_at = now;
        }

        if self.buf != self.last_partial_sent {
            self.last_partial_sent = self.buf.clone();
            events.push(EngineEvent::Partial {
                text: self.buf.clone(),
            });
        } else {
            tracing::trace!("unchanged partial suppressed");
        }
    }

    fn emit_commit(
        &mut self,
        text: &str,
        is_final: bool,
        reason: CommitReason,
        events: &mut Vec<EngineEvent>,
    ) {
        let clean = text.trim();
        if clean.is_empty() {
            return;
        }
        if !is_final && clean == self.last_commit_text {
            tracing::debug!(segment = self.segment_id, "duplicate commit suppressed");
            return;
        }

        self.revision += 1;
        tracing::debug!(
            segment = self.segment_id,
            revision = self.revision,
            is_final,
            ?reason,
            chars = clean.chars().count(),
            "commit"
        );
        self.last_commit_text = clean.to_string();
        events.push(EngineEvent::Commit(Commit {
            segment_id: self.segment_id,
            revision: self.revision,
            text: clean.to_string(),
            is_final,
            reason,
        }));
    }

    fn advance_segment(&mut self) {
        self.segment_id += 1;
        self.revision = 0;
        self.buf.clear();
        self.last_partial_sent.clear();
        let now = self.clock.now_ms();
        self.last_change_at = now;
        self.segment_start_at = now;
        tracing::debug!(segment = self.segment_id, "segment advanced");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn engine() -> (ClauseCommitEngine, ManualClock) {
        let clock = ManualClock::new();
        let engine = ClauseCommitEngine::with_clock(EngineConfig::default(), clock.clone())
            .expect("default config is valid");
        (engine, clock)
    }

    fn commits(events: &[EngineEvent]) -> Vec<&Commit> {
        events.iter().filter_map(EngineEvent::as_commit).collect()
    }

    fn partials(events: &[EngineEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::Partial { text } => Some(text.as_str()),
                EngineEvent::Commit(_) => None,
            })
            .collect()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = EngineConfig {
            vad_silence_ms: 0,
            ..Default::default()
        };
        assert!(ClauseCommitEngine::with_clock(cfg, ManualClock::new()).is_err());
    }

    #[test]
    fn whitespace_only_interim_is_noop() {
        let (mut engine, _clock) = engine();
        assert!(engine.feed_interim("  \u{3000} ").is_empty());
        assert_eq!(engine.buffered(), "");
    }

    #[test]
    fn unchanged_interim_emits_no_duplicate_partial() {
        let (mut engine, _clock) = engine();
        let first = engine.feed_interim("오늘 하나");
        assert_eq!(partials(&first), ["오늘 하나"]);

        assert!(engine.feed_interim("오늘 하나").is_empty());
        assert!(engine.feed_interim("오늘  하나").is_empty());

        let grown = engine.feed_interim("오늘 하나님은");
        assert_eq!(partials(&grown), ["오늘 하나님은"]);
    }

    #[test]
    fn short_interim_never_commits_prematurely() {
        let (mut engine, clock) = engine();
        engine.feed_interim("안녕");

        for _ in 0..40 {
            clock.advance(100);
            assert!(commits(&engine.tick()).is_empty());
        }
    }

    #[test]
    fn boundary_commit_splits_buffer_and_reannounces_tail() {
        let (mut engine, clock) = engine();
        engine.feed_interim("여러분 모두 환영합니다. 정말");

        clock.advance(100);
        let events = engine.tick();
        let cs = commits(&events);
        assert_eq!(cs.len(), 1);
        assert_eq!(cs[0].text, "여러분 모두 환영합니다.");
        assert_eq!(cs[0].reason, CommitReason::Punct);
        assert!(!cs[0].is_final);
        assert_eq!(cs[0].segment_id, 1);
        assert_eq!(cs[0].revision, 1);
        assert_eq!(engine.buffered(), "정말");

        // the recognizer re-sends the whole utterance; the committed prefix
        // strips and the grown tail is a fresh partial
        let events = engine.feed_interim("여러분 모두 환영합니다. 정말 감사하게 생각하고");
        assert_eq!(partials(&events), ["정말 감사하게 생각하고"]);
    }

    #[test]
    fn timeout_force_commits_whole_buffer() {
        let (mut engine, clock) = engine();
        engine.feed_interim("우리가 오늘 함께 나눌 이야기");

        clock.set(1300);
        assert!(commits(&engine.tick()).is_empty());

        clock.set(1500);
        let events = engine.tick();
        let cs = commits(&events);
        assert_eq!(cs.len(), 1);
        assert_eq!(cs[0].reason, CommitReason::Timeout);
        assert_eq!(cs[0].text, "우리가 오늘 함께 나눌 이야기");
        assert_eq!(engine.buffered(), "");
    }

    #[test]
    fn recent_change_suppresses_timeout_force() {
        let (mut engine, clock) = engine();
        engine.feed_interim("우리가 오늘 함께 나눌 이야기");

        // buffer is old enough, but it just changed — no pause yet
        clock.set(1500);
        engine.feed_interim("우리가 오늘 함께 나눌 이야기는 바로");
        clock.set(1700);
        assert!(commits(&engine.tick()).is_empty());

        clock.set(2000);
        assert_eq!(commits(&engine.tick()).len(), 1);
    }

    #[test]
    fn first_commit_needs_more_context() {
        let (mut engine, clock) = engine();
        // 13 chars: above min_chunk_chars, below min_first_commit_chars
        engine.feed_interim("우리가 오늘 같이 모였고");

        clock.set(2000);
        assert!(commits(&engine.tick()).is_empty());
    }

    #[test]
    fn later_commits_force_at_normal_length() {
        let (mut engine, clock) = engine();
        engine.feed_interim("여러분 모두 환영합니다. 정말");
        clock.set(100);
        assert_eq!(commits(&engine.tick()).len(), 1);

        // 12 chars is enough once the segment already has a commit
        engine.feed_interim("여러분 모두 환영합니다. 정말 감사하게 생각하고");
        clock.set(1700);
        let events = engine.tick();
        let cs = commits(&events);
        assert_eq!(cs.len(), 1);
        assert_eq!(cs[0].revision, 2);
        assert_eq!(cs[0].text, "정말 감사하게 생각하고");
    }

    #[test]
    fn connective_ending_holds_for_longer_window() {
        let (mut engine, clock) = engine();
        engine.feed_interim("우리가 다음 주에 다시 모이면");

        // past the normal force window, still inside the connective one
        clock.set(1500);
        assert!(commits(&engine.tick()).is_empty());
        clock.set(2200);
        assert!(commits(&engine.tick()).is_empty());

        clock.set(2300);
        let events = engine.tick();
        let cs = commits(&events);
        assert_eq!(cs.len(), 1);
        assert_eq!(cs[0].reason, CommitReason::TimeoutConnective);
        assert_eq!(cs[0].text, "우리가 다음 주에 다시 모이면");
    }

    #[test]
    fn particle_tail_vetoes_force_until_long_window() {
        let (mut engine, clock) = engine();
        engine.feed_interim("우리가 오늘 함께 읽을 성경 말씀은");

        clock.set(1500);
        assert!(commits(&engine.tick()).is_empty());

        clock.set(2400);
        let cs_events = engine.tick();
        let cs = commits(&cs_events);
        assert_eq!(cs.len(), 1);
        assert_eq!(cs[0].reason, CommitReason::Timeout);
    }

    #[test]
    fn adverb_tail_vetoes_force_until_long_window() {
        let (mut engine, clock) = engine();
        engine.feed_interim("오늘 우리에게 필요한 것은 정말");

        clock.set(1500);
        assert!(commits(&engine.tick()).is_empty());

        clock.set(2400);
        assert_eq!(commits(&engine.tick()).len(), 1);
    }

    #[test]
    fn short_stub_tail_vetoes_force_until_long_window() {
        let (mut engine, clock) = engine();
        engine.feed_interim("오늘 말씀을 통해 우리가 알 수");

        clock.set(1500);
        assert!(commits(&engine.tick()).is_empty());

        clock.set(2400);
        assert_eq!(commits(&engine.tick()).len(), 1);
    }

    #[test]
    fn final_always_commits_and_advances_segment() {
        let (mut engine, _clock) = engine();

        let events = engine.feed_final("짧다");
        let cs = commits(&events);
        assert_eq!(cs.len(), 1);
        assert!(cs[0].is_final);
        assert_eq!(cs[0].segment_id, 1);
        assert_eq!(cs[0].text, "짧다");
        assert_eq!(engine.segment_id(), 2);
        assert_eq!(engine.revision(), 0);

        let events = engine.feed_final("또 짧다");
        assert_eq!(commits(&events)[0].segment_id, 2);
        assert_eq!(engine.segment_id(), 3);
    }

    #[test]
    fn empty_final_advances_without_commit() {
        let (mut engine, _clock) = engine();
        assert!(engine.feed_final("").is_empty());
        assert_eq!(engine.segment_id(), 2);
    }

    #[test]
    fn dedup_across_partial_noise() {
        let (mut engine, clock) = engine();

        let mut all = Vec::new();
        all.extend(engine.feed_interim("오늘 하나"));
        clock.advance(200);
        all.extend(engine.tick());
        all.extend(engine.feed_interim("오늘 하나님은"));
        clock.advance(200);
        all.extend(engine.tick());
        all.extend(engine.feed_final("오늘 하나님은 사랑이십니다."));

        let cs = commits(&all);
        assert_eq!(cs.len(), 1);
        assert!(cs[0].is_final);
        assert_eq!(cs[0].text, "오늘 하나님은 사랑이십니다.");
        assert_eq!(
            partials(&all),
            ["오늘 하나", "오늘 하나님은", "오늘 하나님은 사랑이십니다."]
        );
    }

    #[test]
    fn duplicate_commit_text_is_suppressed() {
        let (mut engine, clock) = engine();
        engine.feed_interim("여러분 모두 환영합니다.");
        clock.advance(100);
        assert_eq!(commits(&engine.tick()).len(), 1);

        // recognizer re-renders the committed clause twice over
        engine.feed_interim("여러분 모두 환영합니다. 여러분 모두 환영합니다.");
        clock.advance(100);
        let events = engine.tick();
        assert!(commits(&events).is_empty());
        assert_eq!(engine.buffered(), "");
    }

    #[test]
    fn reset_preserves_cross_segment_dedup() {
        let (mut engine, clock) = engine();
        engine.feed_interim("여러분 모두 환영합니다.");
        clock.advance(100);
        assert_eq!(commits(&engine.tick()).len(), 1);

        engine.reset();
        assert_eq!(engine.revision(), 0);
        assert_eq!(engine.buffered(), "");

        // an identical resubmission strips to nothing: no partial, no commit
        assert!(engine.feed_interim("여러분 모두 환영합니다.").is_empty());
        clock.advance(5000);
        assert!(engine.tick().is_empty());
    }

    #[test]
    fn reset_clears_pending_buffer() {
        let (mut engine, clock) = engine();
        engine.feed_interim("우리가 오늘 함께 나눌 이야기");
        engine.reset();

        clock.advance(10_000);
        assert!(engine.tick().is_empty());
    }

    #[test]
    fn revisions_strictly_increase_within_segment() {
        let (mut engine, clock) = engine();
        let mut all = Vec::new();

        all.extend(engine.feed_interim("여러분 모두 환영합니다. 정말"));
        clock.advance(100);
        all.extend(engine.tick());
        all.extend(engine.feed_interim("여러분 모두 환영합니다. 정말 감사하게 생각하고"));
        clock.advance(1600);
        all.extend(engine.tick());
        all.extend(engine.feed_final("그리고 마치겠습니다."));

        let cs = commits(&all);
        assert_eq!(cs.len(), 3);
        assert!(cs.iter().all(|c| c.segment_id == 1));
        assert_eq!(
            cs.iter().map(|c| c.revision).collect::<Vec<_>>(),
            [1, 2, 3]
        );
        assert!(cs[2].is_final);
    }
}
