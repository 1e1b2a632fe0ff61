use std::path::Path;
use std::sync::Arc;

use crate::checker::{Checker, ViolationReport};
use crate::config::EngineConfig;
use crate::error::ProsodyError;
use crate::forms::FormRegistry;
use crate::ranker::{RankedCandidate, Ranker};
use crate::resolver::Resolver;
use crate::rhyme::{self, RhymeQuality, RhymeSuggestion, SuggestOptions};
use crate::strategies::{Dictionary, Heuristic};
use crate::PronunciationStrategy;

/// One composition session: a form catalogue, a pronunciation resolver
/// with its cache, and the engine thresholds.
///
/// The registry is shared and read-only; the cache belongs to this session
/// and lives until [`Session::reset`].
///
/// # Quick Start
///
/// ```rust
/// use prosody_rs::Session;
///
/// let session = Session::new();
/// let ranked = session.rank(
///     "shakespearean",
///     &["about again today away the day"],
///     2,
///     &["about again today away the door", "about again today away the play"],
/// )?;
/// assert_eq!(ranked[0].index, 1);
/// # Ok::<(), prosody_rs::ProsodyError>(())
/// ```
pub struct Session {
    registry: Arc<FormRegistry>,
    dictionary: Arc<Dictionary>,
    resolver: Resolver,
    config: EngineConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session over the built-in forms and word list with default settings.
    pub fn new() -> Self {
        Self::with_parts(
            Arc::new(FormRegistry::builtin()),
            Arc::new(Dictionary::builtin()),
            EngineConfig::default(),
        )
    }

    /// Session sharing an existing registry and dictionary.
    pub fn with_parts(
        registry: Arc<FormRegistry>,
        dictionary: Arc<Dictionary>,
        config: EngineConfig,
    ) -> Self {
        let strategies: Vec<Arc<dyn PronunciationStrategy>> =
            vec![dictionary.clone(), Arc::new(Heuristic)];
        let resolver = Resolver::new(strategies);
        Self {
            registry,
            dictionary,
            resolver,
            config,
        }
    }

    /// Session backed by a CMU-format dictionary file.
    pub fn with_dictionary_file(path: &Path) -> Result<Self, ProsodyError> {
        Ok(Self::with_parts(
            Arc::new(FormRegistry::builtin()),
            Arc::new(Dictionary::load(path)?),
            EngineConfig::default(),
        ))
    }

    /// Check a complete poem against the named form.
    pub fn check<S: AsRef<str>>(
        &self,
        poem: &[S],
        form: &str,
    ) -> Result<ViolationReport, ProsodyError> {
        let spec = self.registry.get(form)?;
        Ok(Checker::new(&self.resolver, &self.config).check(poem, spec))
    }

    /// Rank candidates for line `slot` of the named form.
    pub fn rank<S, C>(
        &self,
        form: &str,
        context: &[S],
        slot: usize,
        candidates: &[C],
    ) -> Result<Vec<RankedCandidate>, ProsodyError>
    where
        S: AsRef<str> + Sync,
        C: AsRef<str> + Sync,
    {
        let spec = self.registry.get(form)?;
        Ok(Ranker::new(&self.resolver, &self.config).rank(spec, context, slot, candidates))
    }

    /// Grade how well two words rhyme.
    pub fn rhyme(&self, a: &str, b: &str) -> RhymeQuality {
        rhyme::classify_words(&self.resolver, a, b)
    }

    /// Dictionary words that rhyme with `word`.
    pub fn suggest_rhymes(&self, word: &str, options: &SuggestOptions) -> Vec<RhymeSuggestion> {
        rhyme::suggest_rhymes(&self.resolver, &self.dictionary, word, options)
    }

    /// Start a fresh composition: forget cached pronunciations.
    pub fn reset(&self) {
        self.resolver.clear_cache();
    }

    pub fn registry(&self) -> &FormRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
