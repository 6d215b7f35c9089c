//! Recorded recognizer sessions used by the replay example and fixture tests.
//!
//! Each constant is a JSON array of `{text, final, at_ms}` events captured
//! from a live incremental recognizer, timestamped relative to session start.

pub mod korean_1 {
    pub const SERMON_JSON: &str = include_str!("../data/korean_1/sermon.json");
}
