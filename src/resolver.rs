use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::phoneme::{Pronunciation, Provenance};
use crate::strategies::{Dictionary, Heuristic};
use crate::text;
use crate::PronunciationStrategy;

/// Per-session store of resolved pronunciations.
///
/// Entries live until [`PronunciationCache::clear`] is called, typically
/// when a new composition session starts. Reads vastly outnumber writes,
/// hence the `RwLock`.
#[derive(Debug, Default)]
pub struct PronunciationCache {
    entries: RwLock<HashMap<String, Arc<Pronunciation>>>,
}

impl PronunciationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, word: &str) -> Option<Arc<Pronunciation>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(word)
            .cloned()
    }

    /// Insert unless another thread got there first; returns the stored value.
    pub fn insert(&self, word: &str, pronunciation: Pronunciation) -> Arc<Pronunciation> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(word.to_string())
            .or_insert_with(|| Arc::new(pronunciation))
            .clone()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns words into pronunciations by trying strategies in order.
///
/// Resolution never fails: when every strategy declines, the word gets the
/// single-syllable placeholder. Results are cached per word.
pub struct Resolver {
    strategies: Vec<Arc<dyn PronunciationStrategy>>,
    cache: PronunciationCache,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Resolver {
    /// Resolver over an explicit strategy chain with an empty cache.
    pub fn new(strategies: Vec<Arc<dyn PronunciationStrategy>>) -> Self {
        Self {
            strategies,
            cache: PronunciationCache::new(),
        }
    }

    /// Dictionary lookup followed by the spelling heuristic.
    pub fn with_dictionary(dictionary: Dictionary) -> Self {
        Self::new(vec![Arc::new(dictionary), Arc::new(Heuristic)])
    }

    /// The embedded word list followed by the spelling heuristic.
    pub fn builtin() -> Self {
        Self::with_dictionary(Dictionary::builtin())
    }

    /// Resolve a raw word. Case and surrounding punctuation are ignored.
    pub fn resolve(&self, word: &str) -> Arc<Pronunciation> {
        let normalized = text::normalize_word(word);
        self.resolve_normalized(&normalized)
    }

    /// Resolve a word already normalized by [`text::words`].
    pub fn resolve_normalized(&self, word: &str) -> Arc<Pronunciation> {
        if word.is_empty() {
            return Arc::new(Pronunciation::empty());
        }
        if let Some(hit) = self.cache.get(word) {
            return hit;
        }

        log::debug!("Pronunciation cache miss for {word:?}");
        let pronunciation = self.lookup_uncached(word);
        match pronunciation.provenance() {
            Provenance::Dictionary => {}
            Provenance::Heuristic => log::debug!(
                "No dictionary entry for {word:?}; low-confidence heuristic {pronunciation}"
            ),
            Provenance::Fallback => log::warn!(
                "Cannot pronounce {word:?}; treating it as one unstressed syllable"
            ),
        }
        self.cache.insert(word, pronunciation)
    }

    /// Resolve every word of a line, in order.
    pub fn resolve_line(&self, line: &str) -> Vec<(String, Arc<Pronunciation>)> {
        text::words(line)
            .into_iter()
            .map(|word| {
                let pronunciation = self.resolve_normalized(&word);
                (word, pronunciation)
            })
            .collect()
    }

    fn lookup_uncached(&self, word: &str) -> Pronunciation {
        for strategy in &self.strategies {
            if let Some(pronunciation) = strategy.lookup(word) {
                log::trace!("{word:?} resolved by {}", strategy.name());
                return pronunciation;
            }
        }
        Pronunciation::placeholder()
    }

    pub fn cache(&self) -> &PronunciationCache {
        &self.cache
    }

    /// Forget everything resolved so far.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
