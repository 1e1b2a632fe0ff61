//! # prosody-rs
//!
//! A Rust library that checks and ranks lines of verse against formal
//! poetic constraints: syllable counts, rhyme schemes, and metre.
//!
//! ## Features
//!
//! - **Pronunciation resolution**: CMU-format dictionary lookup with a
//!   spelling-based heuristic fallback, cached per composition session
//! - **Graded checks**: signed syllable deltas, perfect/slant rhyme grading,
//!   and continuous metre fit scores instead of pass/fail booleans
//! - **Form catalogue**: haiku, limerick, Shakespearean sonnet, blank verse
//!   and free verse built in, with room for custom forms
//! - **Candidate ranking**: weighted composite scores for alternative lines
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! prosody-rs = "2026.10"
//! ```
//!
//! ```rust
//! use prosody_rs::Session;
//!
//! let session = Session::new();
//! let report = session.check(
//!     &["An old silent pond", "A frog jumps into the pond", "Splash! Silence again."],
//!     "haiku",
//! )?;
//! assert!(report.passed());
//! # Ok::<(), prosody_rs::ProsodyError>(())
//! ```

pub mod checker;
pub mod config;
pub mod error;
pub mod forms;
pub mod meter;
pub mod phoneme;
pub mod ranker;
pub mod resolver;
pub mod rhyme;
pub mod session;
pub mod strategies;
pub mod syllables;
pub mod text;

pub use checker::{Checker, Finding, FindingKind, LineAnalysis, Severity, ViolationReport};
pub use config::{EngineConfig, EngineConfigBuilder, RankWeights};
pub use error::ProsodyError;
pub use forms::{FormRegistry, FormSpec, FormSpecBuilder, LineCount};
pub use meter::{Foot, MeterFit, MeterTemplate, StressMark, StressSequence};
pub use phoneme::{Phoneme, Pronunciation, Provenance, Stress};
pub use ranker::{CandidateScore, RankedCandidate, Ranker};
pub use resolver::{PronunciationCache, Resolver};
pub use rhyme::{classify, RhymeKey, RhymeQuality};
pub use session::Session;
pub use syllables::SyllableCount;

/// A way of turning a normalized word into a pronunciation.
///
/// The [`Resolver`] tries its strategies in order and keeps the first
/// answer. Words arrive lowercased with punctuation stripped.
pub trait PronunciationStrategy: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Resolve `word`, or `None` if this strategy has nothing to say.
    fn lookup(&self, word: &str) -> Option<Pronunciation>;
}
