use crate::clock::{Clock, ManualClock};
use crate::engine::ClauseCommitEngine;
use crate::types::EngineEvent;

/// One recognizer update as recorded in a session fixture.
///
/// Successive `text` values may overlap, shrink, or repeat — the engine
/// tolerates all of it. `at_ms` is relative to session start.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, specta::Type)]
pub struct AsrEvent {
    pub text: String,
    #[serde(rename = "final")]
    pub is_final: bool,
    pub at_ms: u64,
}

/// Drive an engine through a recorded session, ticking every `tick_ms` of
/// simulated time between events (and for `trailing_ms` after the last one),
/// collecting everything the engine emits.
///
/// The engine must have been built with a clone of `clock`.
pub fn replay(
    engine: &mut ClauseCommitEngine,
    clock: &ManualClock,
    session: &[AsrEvent],
    tick_ms: u64,
    trailing_ms: u64,
) -> Vec<EngineEvent> {
    let mut out = Vec::new();

    for event in session {
        while clock.now_ms() + tick_ms <= event.at_ms {
            clock.advance(tick_ms);
            out.extend(engine.tick());
        }
        clock.set(event.at_ms);
        if event.is_final {
            out.extend(engine.feed_final(&event.text));
        } else {
            out.extend(engine.feed_interim(&event.text));
        }
    }

    let end = clock.now_ms() + trailing_ms;
    while clock.now_ms() + tick_ms <= end {
        clock.advance(tick_ms);
        out.extend(engine.tick());
    }

    out
}
