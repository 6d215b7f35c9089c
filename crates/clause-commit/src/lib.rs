//! # Incremental clause-commit engine
//!
//! Turns a live, non-monotonic stream of partial recognizer text into a
//! sequence of ordered commit events suitable for translation and speech
//! synthesis. The recognizer may rewrite, shrink, or re-send its transcript;
//! the engine decides where a clause boundary lies, when enough silence
//! justifies forcing a commit without punctuation, and strips text that was
//! already committed so nothing is emitted twice.
//!
//! ## Two strategies
//!
//! - [`ClauseCommitEngine`] — clause-level granularity: boundary detection
//!   against lexical rule tables, timeout forcing with connective grace
//!   periods, and a segment/revision ledger for downstream ordering.
//! - [`SentenceBuffer`] — the simpler fallback: accumulate chunks, flush on
//!   terminal punctuation or after a silence deadline.
//!
//! Time is injected through the [`Clock`] trait so tests and replay tooling
//! drive the silence logic deterministically.

pub mod boundary;
pub mod clock;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod input;
pub mod normalize;
pub mod rules;
pub mod sentence;
pub mod types;

pub use boundary::{Boundary, find_boundary};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, SentenceBufferConfig};
pub use dedup::strip_committed_prefix;
pub use engine::ClauseCommitEngine;
pub use error::Error;
pub use input::{AsrEvent, replay};
pub use normalize::normalize;
pub use rules::RuleSet;
pub use sentence::SentenceBuffer;
pub use types::{Commit, CommitReason, EngineEvent};
