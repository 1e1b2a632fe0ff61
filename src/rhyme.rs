//! Rhyme keys and graded rhyme classification.
//!
//! A rhyme key runs from the last stressed (primary or secondary) vowel of
//! a word to its end. Keys are compared phoneme by phoneme with stress
//! digits ignored:
//!
//! | Quality | Condition |
//! |---|---|
//! | perfect | identical sounds from the stressed vowel on |
//! | slant | same tail, stressed vowels differ but share a broad class |
//! | slant | same stressed vowel, tails differ only by consonant voicing |
//! | none | anything else, or either key empty |
//!
//! Slant rhymes compare every phoneme after the stressed vowel, not just
//! the final consonant, so "day" and "mate" do not slant-rhyme.

use std::fmt;

use serde::Serialize;

use crate::phoneme::{Phoneme, Pronunciation};
use crate::resolver::Resolver;
use crate::strategies::Dictionary;

/// How well two words rhyme, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RhymeQuality {
    None,
    Slant,
    Perfect,
}

impl fmt::Display for RhymeQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RhymeQuality::None => "none",
            RhymeQuality::Slant => "slant",
            RhymeQuality::Perfect => "perfect",
        };
        f.write_str(label)
    }
}

/// Phonemes from the last stressed vowel to the end of a word.
///
/// Empty when the word has no stressed vowel; an empty key never rhymes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RhymeKey(Vec<Phoneme>);

impl RhymeKey {
    pub fn from_pronunciation(pronunciation: &Pronunciation) -> Self {
        let phonemes = pronunciation.phonemes();
        match phonemes
            .iter()
            .rposition(|p| p.is_vowel() && p.stress().is_stressed())
        {
            Some(start) => Self(phonemes[start..].to_vec()),
            None => Self::default(),
        }
    }

    /// Rhyme key of the last word of `line`.
    pub fn of_line(resolver: &Resolver, line: &str) -> Self {
        crate::text::last_word(line)
            .map(|word| Self::from_pronunciation(&resolver.resolve_normalized(&word)))
            .unwrap_or_default()
    }

    pub fn phonemes(&self) -> &[Phoneme] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn split_vowel(&self) -> Option<(&Phoneme, &[Phoneme])> {
        self.0.split_first()
    }
}

impl fmt::Display for RhymeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, phoneme) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{phoneme}")?;
        }
        Ok(())
    }
}

/// Grade the rhyme between two keys. Symmetric in its arguments.
pub fn classify(a: &RhymeKey, b: &RhymeKey) -> RhymeQuality {
    let (Some((vowel_a, tail_a)), Some((vowel_b, tail_b))) = (a.split_vowel(), b.split_vowel())
    else {
        return RhymeQuality::None;
    };

    let same_tail = sounds_equal(tail_a, tail_b);
    if vowel_a.same_sound(vowel_b) && same_tail {
        return RhymeQuality::Perfect;
    }

    if same_tail {
        let same_class = vowel_a.vowel_class().is_some()
            && vowel_a.vowel_class() == vowel_b.vowel_class();
        return if same_class {
            RhymeQuality::Slant
        } else {
            RhymeQuality::None
        };
    }

    if vowel_a.same_sound(vowel_b) && differ_by_voicing_only(tail_a, tail_b) {
        return RhymeQuality::Slant;
    }

    RhymeQuality::None
}

/// Grade the rhyme between two words.
pub fn classify_words(resolver: &Resolver, a: &str, b: &str) -> RhymeQuality {
    let key_a = RhymeKey::from_pronunciation(&resolver.resolve(a));
    let key_b = RhymeKey::from_pronunciation(&resolver.resolve(b));
    classify(&key_a, &key_b)
}

fn sounds_equal(a: &[Phoneme], b: &[Phoneme]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_sound(y))
}

fn differ_by_voicing_only(a: &[Phoneme], b: &[Phoneme]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.same_sound(y) || x.is_voicing_pair(y))
}

/// Group line indices by rhyme label, in order of first appearance.
///
/// `['A', 'B', 'A', 'B']` gives `[('A', [0, 2]), ('B', [1, 3])]`.
pub fn rhyme_groups(scheme: &[char]) -> Vec<(char, Vec<usize>)> {
    let mut groups: Vec<(char, Vec<usize>)> = Vec::new();
    for (idx, &label) in scheme.iter().enumerate() {
        match groups.iter_mut().find(|(l, _)| *l == label) {
            Some((_, lines)) => lines.push(idx),
            None => groups.push((label, vec![idx])),
        }
    }
    groups
}

/// Candidates that rhyme with `word`, perfect rhymes first, each group in
/// input order. Slant rhymes are included only when `include_slant` is set.
pub fn find_rhymes<S: AsRef<str>>(
    resolver: &Resolver,
    word: &str,
    candidates: &[S],
    include_slant: bool,
) -> Vec<(String, RhymeQuality)> {
    let target = RhymeKey::from_pronunciation(&resolver.resolve(word));
    let mut found: Vec<(String, RhymeQuality)> = candidates
        .iter()
        .filter_map(|candidate| {
            let candidate = candidate.as_ref();
            let key = RhymeKey::from_pronunciation(&resolver.resolve(candidate));
            match classify(&target, &key) {
                RhymeQuality::Perfect => Some((candidate.to_string(), RhymeQuality::Perfect)),
                RhymeQuality::Slant if include_slant => {
                    Some((candidate.to_string(), RhymeQuality::Slant))
                }
                _ => None,
            }
        })
        .collect();
    found.sort_by(|a, b| b.1.cmp(&a.1));
    found
}

/// Filters for [`suggest_rhymes`].
#[derive(Debug, Clone)]
pub struct SuggestOptions {
    pub max_results: usize,
    pub min_syllables: Option<usize>,
    pub max_syllables: Option<usize>,
    pub include_slant: bool,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            max_results: 20,
            min_syllables: None,
            max_syllables: None,
            include_slant: true,
        }
    }
}

/// A dictionary word offered as a rhyme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RhymeSuggestion {
    pub word: String,
    pub quality: RhymeQuality,
    pub syllables: usize,
}

/// Scan `dictionary` for words rhyming with `word`.
///
/// Sorted perfect first, then by syllable count, then alphabetically. The
/// word itself and entries containing non-letters are skipped.
pub fn suggest_rhymes(
    resolver: &Resolver,
    dictionary: &Dictionary,
    word: &str,
    options: &SuggestOptions,
) -> Vec<RhymeSuggestion> {
    let target_pronunciation = resolver.resolve(word);
    let target = RhymeKey::from_pronunciation(&target_pronunciation);
    if target.is_empty() {
        return Vec::new();
    }
    let own = crate::text::normalize_word(word);

    let mut suggestions: Vec<RhymeSuggestion> = dictionary
        .iter()
        .filter(|(candidate, _)| *candidate != own && candidate.chars().all(char::is_alphabetic))
        .filter_map(|(candidate, phonemes)| {
            let syllables = phonemes.iter().filter(|p| p.is_vowel()).count();
            if options.min_syllables.is_some_and(|min| syllables < min)
                || options.max_syllables.is_some_and(|max| syllables > max)
            {
                return None;
            }
            let key = RhymeKey::from_pronunciation(&Pronunciation::new(
                phonemes.to_vec(),
                crate::phoneme::Provenance::Dictionary,
            ));
            let quality = classify(&target, &key);
            let wanted = quality == RhymeQuality::Perfect
                || (options.include_slant && quality == RhymeQuality::Slant);
            wanted.then(|| RhymeSuggestion {
                word: candidate.to_string(),
                quality,
                syllables,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.quality
            .cmp(&a.quality)
            .then(a.syllables.cmp(&b.syllables))
            .then_with(|| a.word.cmp(&b.word))
    });
    suggestions.truncate(options.max_results);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::{
        classify, classify_words, find_rhymes, rhyme_groups, suggest_rhymes, RhymeKey,
        RhymeQuality, SuggestOptions,
    };
    use crate::phoneme::{Phoneme, Pronunciation, Provenance};
    use crate::resolver::Resolver;
    use crate::strategies::Dictionary;

    fn key(cmu: &str) -> RhymeKey {
        let phonemes = cmu.split_whitespace().filter_map(Phoneme::parse).collect();
        RhymeKey::from_pronunciation(&Pronunciation::new(phonemes, Provenance::Dictionary))
    }

    #[test]
    fn key_starts_at_last_stressed_vowel() {
        assert_eq!(key("D EY1 L AY2 T").to_string(), "AY2 T");
        assert_eq!(key("B IH0 L AO1 NG").to_string(), "AO1 NG");
        assert_eq!(key("S AH1 M ER0").to_string(), "AH1 M ER0");
        assert!(key("DH AH0").is_empty());
    }

    #[test]
    fn grades_perfect_slant_and_none() {
        assert_eq!(classify(&key("D EY1"), &key("P L EY1")), RhymeQuality::Perfect);
        // same class (front), same empty tail
        assert_eq!(classify(&key("D EY1"), &key("T R IY1")), RhymeQuality::Slant);
        // same vowel, T/D voicing
        assert_eq!(classify(&key("B AE1 T"), &key("B AE1 D")), RhymeQuality::Slant);
        assert_eq!(classify(&key("D EY1"), &key("D AO1 R")), RhymeQuality::None);
        assert_eq!(classify(&key("K AE1 T"), &key("K AE1 P")), RhymeQuality::None);
    }

    #[test]
    fn slant_needs_the_whole_tail() {
        assert_eq!(classify(&key("D EY1"), &key("M EY1 T")), RhymeQuality::None);
        assert_eq!(classify(&key("D EY1 T"), &key("M IY1 T")), RhymeQuality::Slant);
        assert_eq!(classify(&key("L AE1 S T"), &key("L AE1 S D")), RhymeQuality::Slant);
    }

    #[test]
    fn stress_digits_do_not_matter() {
        assert_eq!(classify(&key("T AY1 M"), &key("R AY2 M")), RhymeQuality::Perfect);
    }

    #[test]
    fn empty_keys_never_rhyme() {
        let empty = RhymeKey::default();
        assert_eq!(classify(&empty, &empty), RhymeQuality::None);
        assert_eq!(classify(&empty, &key("D EY1")), RhymeQuality::None);
    }

    #[test]
    fn classification_is_symmetric_and_reflexive() {
        let keys: Vec<RhymeKey> = [
            "D EY1", "P L EY1", "D AO1 R", "B AE1 T", "B AE1 D", "T R IY1", "S AY1 L AH0 N S",
            "K AE1 B", "M UW1 V", "L AH1 V", "DH AH0",
        ]
        .iter()
        .map(|cmu| key(cmu))
        .collect();

        for a in &keys {
            if !a.is_empty() {
                assert_eq!(classify(a, a), RhymeQuality::Perfect, "{a}");
            }
            for b in &keys {
                assert_eq!(classify(a, b), classify(b, a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn scenario_day_play_grey_door() {
        let resolver = Resolver::builtin();
        assert_eq!(classify_words(&resolver, "day", "play"), RhymeQuality::Perfect);
        assert!(classify_words(&resolver, "day", "grey") >= RhymeQuality::Slant);
        assert_eq!(classify_words(&resolver, "day", "door"), RhymeQuality::None);
    }

    #[test]
    fn groups_scheme_labels() {
        let groups = rhyme_groups(&['A', 'A', 'B', 'B', 'A']);
        assert_eq!(groups, vec![('A', vec![0, 1, 4]), ('B', vec![2, 3])]);
        assert!(rhyme_groups(&[]).is_empty());
    }

    #[test]
    fn finds_rhymes_perfect_first() {
        let resolver = Resolver::builtin();
        let found = find_rhymes(&resolver, "day", &["tree", "play", "door", "grey"], true);
        assert_eq!(
            found,
            vec![
                ("play".to_string(), RhymeQuality::Perfect),
                ("grey".to_string(), RhymeQuality::Perfect),
                ("tree".to_string(), RhymeQuality::Slant),
            ]
        );

        let perfect_only = find_rhymes(&resolver, "day", &["tree", "play"], false);
        assert_eq!(perfect_only.len(), 1);
    }

    #[test]
    fn suggests_dictionary_rhymes() {
        let resolver = Resolver::builtin();
        let dictionary = Dictionary::builtin();
        let options = SuggestOptions {
            max_results: 50,
            include_slant: false,
            ..Default::default()
        };
        let suggestions = suggest_rhymes(&resolver, &dictionary, "day", &options);
        let words: Vec<&str> = suggestions.iter().map(|s| s.word.as_str()).collect();
        assert!(words.contains(&"play"));
        assert!(words.contains(&"away"));
        assert!(!words.contains(&"day"));
        assert!(suggestions.iter().all(|s| s.quality == RhymeQuality::Perfect));
        assert!(suggestions.windows(2).all(|w| w[0].syllables <= w[1].syllables));

        let two_plus = SuggestOptions {
            min_syllables: Some(2),
            include_slant: false,
            ..Default::default()
        };
        assert!(suggest_rhymes(&resolver, &dictionary, "day", &two_plus)
            .iter()
            .all(|s| s.syllables >= 2));
    }
}
