use std::collections::HashMap;
use std::path::Path;

use crate::error::ProsodyError;
use crate::phoneme::{Phoneme, Pronunciation, Provenance};
use crate::PronunciationStrategy;

/// Compact word list in CMU Pronouncing Dictionary format, compiled in.
const BUILTIN_WORDS: &str = include_str!("../../data/cmudict-mini.txt");

/// In-memory pronunciation dictionary keyed by lowercase word.
///
/// Every alternate pronunciation is kept in file order; lookups always use
/// the first one, so ambiguous words such as "record" resolve the same way
/// every time.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<String, Vec<Vec<Phoneme>>>,
}

impl Dictionary {
    /// Load a dictionary from a CMU-format text file.
    pub fn load(path: &Path) -> Result<Self, ProsodyError> {
        let content = std::fs::read_to_string(path)?;
        let dictionary = Self::parse(&content)?;
        log::info!(
            "Loaded {} dictionary words from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    /// The embedded word list.
    ///
    /// Small enough to ship in the binary; load a full CMU dictionary with
    /// [`Dictionary::load`] for broader coverage.
    pub fn builtin() -> Self {
        match Self::parse(BUILTIN_WORDS) {
            Ok(dictionary) => dictionary,
            Err(e) => {
                log::error!("Embedded dictionary is malformed: {e}");
                Self::default()
            }
        }
    }

    /// Parse CMU-format text.
    ///
    /// Lines look like `WORD  PH1 PH2 ...`; alternates are written
    /// `WORD(2)`, and lines starting with `;;;` are comments.
    pub fn parse(content: &str) -> Result<Self, ProsodyError> {
        let mut entries: HashMap<String, Vec<Vec<Phoneme>>> = HashMap::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(head) = parts.next() else {
                continue;
            };
            let word = strip_alternate_suffix(head).to_lowercase();

            let phonemes = parts
                .map(|token| {
                    Phoneme::parse(token).ok_or_else(|| ProsodyError::DictionaryParse {
                        line: idx + 1,
                        reason: format!("unknown phoneme {token:?} for {head:?}"),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if phonemes.is_empty() {
                return Err(ProsodyError::DictionaryParse {
                    line: idx + 1,
                    reason: format!("no phonemes for {head:?}"),
                });
            }

            entries.entry(word).or_default().push(phonemes);
        }

        Ok(Self { entries })
    }

    /// All pronunciations of `word`, in file order.
    pub fn pronunciations(&self, word: &str) -> Option<&[Vec<Phoneme>]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    /// First listed pronunciation of `word`.
    pub fn first(&self, word: &str) -> Option<&[Phoneme]> {
        self.entries
            .get(word)
            .and_then(|alternates| alternates.first())
            .map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Iterate over words and their first pronunciation, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Phoneme])> {
        self.entries.iter().filter_map(|(word, alternates)| {
            alternates
                .first()
                .map(|phonemes| (word.as_str(), phonemes.as_slice()))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PronunciationStrategy for Dictionary {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn lookup(&self, word: &str) -> Option<Pronunciation> {
        self.first(word)
            .map(|phonemes| Pronunciation::new(phonemes.to_vec(), Provenance::Dictionary))
    }
}

/// `RECORD(2)` -> `RECORD`
fn strip_alternate_suffix(head: &str) -> &str {
    if let Some(open) = head.rfind('(') {
        let inner = &head[open + 1..];
        if inner.len() > 1
            && inner.ends_with(')')
            && inner[..inner.len() - 1].chars().all(|c| c.is_ascii_digit())
        {
            return &head[..open];
        }
    }
    head
}

#[cfg(test)]
mod tests {
    use super::{strip_alternate_suffix, Dictionary};
    use crate::error::ProsodyError;
    use crate::phoneme::Provenance;
    use crate::PronunciationStrategy;

    #[test]
    fn strips_alternate_markers() {
        assert_eq!(strip_alternate_suffix("RECORD(2)"), "RECORD");
        assert_eq!(strip_alternate_suffix("RECORD"), "RECORD");
        assert_eq!(strip_alternate_suffix("(PAREN"), "(PAREN");
        assert_eq!(strip_alternate_suffix("WORD()"), "WORD()");
    }

    #[test]
    fn parses_comments_and_alternates() {
        let dict = Dictionary::parse(
            ";;; a comment\n\
             RECORD  R EH1 K ER0 D\n\
             RECORD(2)  R IH0 K AO1 R D\n\
             \n\
             DAY  D EY1\n",
        )
        .unwrap();

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.pronunciations("record").unwrap().len(), 2);
        let first: Vec<String> = dict
            .first("record")
            .unwrap()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(first, ["R", "EH1", "K", "ER0", "D"]);
    }

    #[test]
    fn reports_line_of_bad_phoneme() {
        let err = Dictionary::parse("DAY  D EY1\nBAD  B QQ1 D\n").unwrap_err();
        match err {
            ProsodyError::DictionaryParse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_entries_without_phonemes() {
        assert!(Dictionary::parse("LONELY\n").is_err());
    }

    #[test]
    fn builtin_list_covers_common_words() {
        let dict = Dictionary::builtin();
        assert!(dict.len() > 200);
        for word in ["day", "play", "grey", "door", "pond", "silence"] {
            assert!(dict.contains(word), "missing {word}");
        }
    }

    #[test]
    fn lookup_uses_first_listed_pronunciation() {
        let dict = Dictionary::builtin();
        let record = dict.lookup("record").unwrap();
        assert_eq!(record.to_string(), "R EH1 K ER0 D");
        assert_eq!(record.provenance(), Provenance::Dictionary);
        assert!(dict.lookup("blorpish").is_none());
    }
}
