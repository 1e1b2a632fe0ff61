//! Pronunciation strategies.
//!
//! The resolver chains these in order:
//! - [`dictionary::Dictionary`] - exact lookup in a CMU Pronouncing
//!   Dictionary word list (a compact list is embedded, full files can be
//!   loaded at runtime)
//! - [`heuristic::Heuristic`] - spelling-based syllabification that always
//!   produces some pronunciation

pub mod dictionary;
pub mod heuristic;

pub use dictionary::Dictionary;
pub use heuristic::Heuristic;
