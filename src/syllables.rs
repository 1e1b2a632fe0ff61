//! Syllable counting over resolved pronunciations.

use std::iter::Sum;
use std::ops::Add;

use serde::Serialize;

use crate::phoneme::{Pronunciation, Provenance};
use crate::resolver::Resolver;

/// A syllable count and how trustworthy it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyllableCount {
    pub count: usize,
    /// Weakest provenance among the counted words.
    pub provenance: Provenance,
}

impl SyllableCount {
    pub fn zero() -> Self {
        Self {
            count: 0,
            provenance: Provenance::Dictionary,
        }
    }

    /// Signed distance from `target`: positive means too many syllables.
    pub fn delta(&self, target: usize) -> isize {
        self.count as isize - target as isize
    }
}

impl Add for SyllableCount {
    type Output = SyllableCount;

    fn add(self, other: SyllableCount) -> Self {
        Self {
            count: self.count + other.count,
            provenance: self.provenance.min(other.provenance),
        }
    }
}

impl Sum for SyllableCount {
    fn sum<I: Iterator<Item = SyllableCount>>(iter: I) -> Self {
        iter.fold(SyllableCount::zero(), Add::add)
    }
}

/// Vowel-phoneme count of one pronunciation.
pub fn count_pronunciation(pronunciation: &Pronunciation) -> SyllableCount {
    SyllableCount {
        count: pronunciation.vowel_count(),
        provenance: pronunciation.provenance(),
    }
}

/// Syllables in a single word.
pub fn count_word(resolver: &Resolver, word: &str) -> SyllableCount {
    count_pronunciation(&resolver.resolve(word))
}

/// Syllables in a full line; hyphenated compounds are split and summed.
///
/// An empty line counts zero syllables.
pub fn count_line(resolver: &Resolver, line: &str) -> SyllableCount {
    resolver
        .resolve_line(line)
        .iter()
        .map(|(_, pronunciation)| count_pronunciation(pronunciation))
        .sum()
}
