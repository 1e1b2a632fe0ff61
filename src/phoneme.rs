use std::fmt;

use serde::{Serialize, Serializer};

/// ARPAbet vowel symbols. Only these carry stress digits.
pub const VOWELS: &[&str] = &[
    "AA", "AE", "AH", "AO", "AW", "AY", "EH", "ER", "EY", "IH", "IY", "OW", "OY", "UH", "UW",
];

/// ARPAbet consonant symbols.
pub const CONSONANTS: &[&str] = &[
    "B", "CH", "D", "DH", "F", "G", "HH", "JH", "K", "L", "M", "N", "NG", "P", "R", "S", "SH",
    "T", "TH", "V", "W", "Y", "Z", "ZH",
];

/// Voiceless/voiced consonant pairs. Rhymes differing only along these
/// pairs count as slant.
const VOICING_PAIRS: &[(&str, &str)] = &[
    ("P", "B"),
    ("T", "D"),
    ("K", "G"),
    ("F", "V"),
    ("TH", "DH"),
    ("S", "Z"),
    ("SH", "ZH"),
    ("CH", "JH"),
];

/// Stress level attached to a phoneme.
///
/// Consonants always carry [`Stress::None`]. A vowel carrying `None` has no
/// usable stress information (the placeholder for unresolvable tokens).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stress {
    Primary,
    Secondary,
    Unstressed,
    None,
}

impl Stress {
    fn digit(self) -> Option<char> {
        match self {
            Stress::Primary => Some('1'),
            Stress::Secondary => Some('2'),
            Stress::Unstressed => Some('0'),
            Stress::None => None,
        }
    }

    /// Primary or secondary stress.
    pub fn is_stressed(self) -> bool {
        matches!(self, Stress::Primary | Stress::Secondary)
    }
}

/// Broad articulatory class of a vowel, used to grade slant rhymes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VowelClass {
    Front,
    Central,
    Back,
    Diphthong,
}

/// Where a pronunciation came from, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// No vowel letters at all (numerals, abbreviations): a one-syllable
    /// placeholder without stress.
    Fallback,
    /// Derived from spelling rules.
    Heuristic,
    /// Exact pronunciation dictionary entry.
    Dictionary,
}

impl Provenance {
    /// True for anything that did not come from the dictionary.
    pub fn is_heuristic(self) -> bool {
        self != Provenance::Dictionary
    }
}

/// A single ARPAbet phoneme with its stress marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Phoneme {
    symbol: &'static str,
    stress: Stress,
}

impl Phoneme {
    /// Build a phoneme from a bare ARPAbet symbol. Returns `None` for
    /// unknown symbols or when a consonant is given a stress level.
    pub fn new(symbol: &str, stress: Stress) -> Option<Self> {
        if let Some(&vowel) = VOWELS.iter().find(|v| **v == symbol) {
            return Some(Self {
                symbol: vowel,
                stress,
            });
        }
        let &consonant = CONSONANTS.iter().find(|c| **c == symbol)?;
        if stress != Stress::None {
            return None;
        }
        Some(Self {
            symbol: consonant,
            stress,
        })
    }

    /// Parse CMU notation such as `"EY1"` or `"K"`.
    ///
    /// A vowel written without a digit is treated as unstressed.
    pub fn parse(token: &str) -> Option<Self> {
        let (base, stress) = match token.chars().last()? {
            '0' => (&token[..token.len() - 1], Stress::Unstressed),
            '1' => (&token[..token.len() - 1], Stress::Primary),
            '2' => (&token[..token.len() - 1], Stress::Secondary),
            _ if VOWELS.contains(&token) => (token, Stress::Unstressed),
            _ => (token, Stress::None),
        };
        Self::new(base, stress)
    }

    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub fn stress(&self) -> Stress {
        self.stress
    }

    pub fn is_vowel(&self) -> bool {
        VOWELS.contains(&self.symbol)
    }

    /// Same sound regardless of stress.
    pub fn same_sound(&self, other: &Phoneme) -> bool {
        self.symbol == other.symbol
    }

    /// Consonants that differ only in voicing (`T`/`D`, `S`/`Z`, ...).
    pub fn is_voicing_pair(&self, other: &Phoneme) -> bool {
        VOICING_PAIRS.iter().any(|&(voiceless, voiced)| {
            (self.symbol == voiceless && other.symbol == voiced)
                || (self.symbol == voiced && other.symbol == voiceless)
        })
    }

    pub fn vowel_class(&self) -> Option<VowelClass> {
        let class = match self.symbol {
            "IY" | "IH" | "EY" | "EH" | "AE" => VowelClass::Front,
            "AH" | "ER" => VowelClass::Central,
            "UW" | "UH" | "OW" | "AO" | "AA" => VowelClass::Back,
            "AY" | "AW" | "OY" => VowelClass::Diphthong,
            _ => return None,
        };
        Some(class)
    }
}

impl fmt::Display for Phoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)?;
        if self.is_vowel() {
            if let Some(digit) = self.stress.digit() {
                write!(f, "{digit}")?;
            }
        }
        Ok(())
    }
}

impl Serialize for Phoneme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Immutable pronunciation of one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pronunciation {
    phonemes: Vec<Phoneme>,
    provenance: Provenance,
}

impl Pronunciation {
    pub fn new(phonemes: Vec<Phoneme>, provenance: Provenance) -> Self {
        Self {
            phonemes,
            provenance,
        }
    }

    /// Pronunciation of a token with nothing pronounceable in it.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Provenance::Fallback)
    }

    /// A single schwa with no stress information, used for tokens with no
    /// vowel letters.
    pub fn placeholder() -> Self {
        let schwa = Phoneme {
            symbol: "AH",
            stress: Stress::None,
        };
        Self::new(vec![schwa], Provenance::Fallback)
    }

    pub fn phonemes(&self) -> &[Phoneme] {
        &self.phonemes
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Number of vowel phonemes.
    pub fn vowel_count(&self) -> usize {
        self.phonemes.iter().filter(|p| p.is_vowel()).count()
    }

    /// Stress levels of the vowels, in order.
    pub fn vowel_stresses(&self) -> impl Iterator<Item = Stress> + '_ {
        self.phonemes
            .iter()
            .filter(|p| p.is_vowel())
            .map(|p| p.stress())
    }
}

impl fmt::Display for Pronunciation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, phoneme) in self.phonemes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{phoneme}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Phoneme, Pronunciation, Provenance, Stress, VowelClass};

    #[test]
    fn parses_cmu_tokens() {
        let vowel = Phoneme::parse("EY1").unwrap();
        assert_eq!(vowel.symbol(), "EY");
        assert_eq!(vowel.stress(), Stress::Primary);
        assert!(vowel.is_vowel());

        let consonant = Phoneme::parse("NG").unwrap();
        assert_eq!(consonant.stress(), Stress::None);
        assert!(!consonant.is_vowel());

        assert_eq!(Phoneme::parse("AH").unwrap().stress(), Stress::Unstressed);
    }

    #[test]
    fn rejects_unknown_and_stressed_consonants() {
        assert!(Phoneme::parse("QX").is_none());
        assert!(Phoneme::parse("K1").is_none());
        assert!(Phoneme::parse("").is_none());
    }

    #[test]
    fn displays_in_cmu_notation() {
        let p = Pronunciation::new(
            ["D", "EY1"].iter().filter_map(|t| Phoneme::parse(t)).collect(),
            Provenance::Dictionary,
        );
        assert_eq!(p.to_string(), "D EY1");
        assert_eq!(p.vowel_count(), 1);
    }

    #[test]
    fn classifies_vowels_and_voicing() {
        let ey = Phoneme::parse("EY1").unwrap();
        let ao = Phoneme::parse("AO1").unwrap();
        assert_eq!(ey.vowel_class(), Some(VowelClass::Front));
        assert_eq!(ao.vowel_class(), Some(VowelClass::Back));

        let t = Phoneme::parse("T").unwrap();
        let d = Phoneme::parse("D").unwrap();
        assert!(t.is_voicing_pair(&d));
        assert!(d.is_voicing_pair(&t));
        assert!(!t.is_voicing_pair(&t));
    }

    #[test]
    fn placeholder_has_one_unstressable_vowel() {
        let p = Pronunciation::placeholder();
        assert_eq!(p.vowel_count(), 1);
        assert_eq!(p.provenance(), Provenance::Fallback);
        assert!(p.vowel_stresses().all(|s| s == Stress::None));
        assert!(Provenance::Fallback < Provenance::Heuristic);
        assert!(Provenance::Heuristic < Provenance::Dictionary);
    }
}
