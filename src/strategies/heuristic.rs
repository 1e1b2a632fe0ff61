use crate::phoneme::{Phoneme, Pronunciation, Provenance, Stress};
use crate::PronunciationStrategy;

/// Spelling-based fallback for words missing from the dictionary.
///
/// Syllables are vowel-letter clusters, minus a silent trailing `e` (and
/// silent `-ed`/`-es`), plus one for each hiatus such as the `io` in
/// "lion". The count never drops below one. Primary stress always lands on
/// the first syllable, which is a known-imprecise default.
///
/// Alongside the count an approximate ARPAbet sequence is produced so the
/// word still has a rhyme key and a stress pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heuristic;

impl PronunciationStrategy for Heuristic {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn lookup(&self, word: &str) -> Option<Pronunciation> {
        if word.is_empty() {
            return None;
        }
        Some(pronounce(word))
    }
}

/// Heuristic syllable count straight from spelling.
pub fn syllable_count(word: &str) -> usize {
    pronounce(word).vowel_count()
}

/// Build a heuristic pronunciation for `word`.
///
/// Words without any vowel letters (numerals, abbreviations such as
/// "nth") get the single-syllable placeholder with no stress.
pub fn pronounce(word: &str) -> Pronunciation {
    let letters: Vec<u8> = word
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_lowercase())
        .collect();

    if letters.is_empty() {
        return if word.is_empty() {
            Pronunciation::empty()
        } else {
            Pronunciation::placeholder()
        };
    }

    let pieces = split_pieces(&letters);
    let nuclei: Vec<(usize, usize)> = pieces
        .iter()
        .filter_map(|piece| match *piece {
            Piece::Nucleus(start, end) => Some((start, end)),
            Piece::Consonants(..) => None,
        })
        .collect();

    if nuclei.is_empty() {
        return Pronunciation::placeholder();
    }

    let silent = silent_final_nucleus(&letters, &nuclei);
    let magic_e = silent.is_some_and(|(start, _)| start == letters.len() - 1);

    let mut phonemes = Vec::new();
    let mut skip_r_at = None;
    let mut stressed = false;

    for (idx, piece) in pieces.iter().enumerate() {
        match *piece {
            Piece::Consonants(start, end) => {
                emit_consonants(&letters, start, end, skip_r_at, &mut phonemes);
            }
            Piece::Nucleus(start, end) => {
                if silent == Some((start, end)) {
                    continue;
                }
                // Long vowel when only a single consonant separates this
                // nucleus from a silent final e ("snoke", "glade").
                let lengthened = magic_e
                    && end - start == 1
                    && matches!(pieces.get(idx + 1), Some(Piece::Consonants(s, e)) if e - s == 1)
                    && matches!(pieces.get(idx + 2), Some(Piece::Nucleus(s, _)) if *s == letters.len() - 1);
                let (symbol, r_colored) = vowel_sound(&letters, start, end, lengthened);
                skip_r_at = r_colored.then_some(end);
                let stress = if stressed {
                    Stress::Unstressed
                } else {
                    stressed = true;
                    Stress::Primary
                };
                push(&mut phonemes, symbol, stress);
            }
        }
    }

    Pronunciation::new(phonemes, Provenance::Heuristic)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece {
    Consonants(usize, usize),
    Nucleus(usize, usize),
}

fn is_plain_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

fn is_vowel_letter(letters: &[u8], i: usize) -> bool {
    let next_is_vowel = letters.get(i + 1).is_some_and(|&b| is_plain_vowel(b));
    match letters[i] {
        b if is_plain_vowel(b) => true,
        // "day", "myth" but not "yes", "beyond"
        b'y' => !next_is_vowel,
        // "snow", "dawn" but not "power"
        b'w' => i > 0 && matches!(letters[i - 1], b'a' | b'e' | b'o') && !next_is_vowel,
        _ => false,
    }
}

/// Split letters into consonant runs and syllable nuclei, breaking vowel
/// runs at hiatus pairs.
fn split_pieces(letters: &[u8]) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut i = 0;
    while i < letters.len() {
        let vowel = is_vowel_letter(letters, i);
        let start = i;
        while i < letters.len() && is_vowel_letter(letters, i) == vowel {
            i += 1;
        }
        if !vowel {
            pieces.push(Piece::Consonants(start, i));
            continue;
        }
        let mut nucleus_start = start;
        for k in start..i - 1 {
            if is_hiatus(letters, k) {
                pieces.push(Piece::Nucleus(nucleus_start, k + 1));
                nucleus_start = k + 1;
            }
        }
        pieces.push(Piece::Nucleus(nucleus_start, i));
    }
    pieces
}

/// Two adjacent vowel letters at `k`, `k + 1` pronounced as separate
/// syllables ("lion", "video", "duo").
fn is_hiatus(letters: &[u8], k: usize) -> bool {
    let before = k.checked_sub(1).map(|j| letters[j]);
    match (letters[k], letters[k + 1]) {
        // "-tion", "-cial", "-sion", "-xious", "-gion" stay single
        (b'i', b'a' | b'o' | b'u') => !matches!(before, Some(b'c' | b's' | b't' | b'x' | b'g')),
        (b'e', b'o') => true,
        // "quality", "guard" stay single
        (b'u', b'a' | b'o') => !matches!(before, Some(b'q' | b'g')),
        _ => false,
    }
}

/// The final nucleus if it is a silent lone `e`, as long as another
/// syllable remains.
fn silent_final_nucleus(letters: &[u8], nuclei: &[(usize, usize)]) -> Option<(usize, usize)> {
    let &(start, end) = nuclei.last()?;
    if nuclei.len() < 2 || end - start != 1 || letters[start] != b'e' {
        return None;
    }

    let n = letters.len();

    let silent = if start == n - 1 {
        // consonant + "le" keeps its syllable ("table")
        n > 2 && !(letters.ends_with(b"le") && !is_vowel_letter(letters, n - 3))
    } else if start == n - 2 && n > 3 && letters.ends_with(b"ed") {
        !matches!(letters[n - 3], b't' | b'd')
    } else if start == n - 2 && n > 3 && letters.ends_with(b"es") {
        let sibilant = matches!(letters[n - 3], b's' | b'x' | b'z' | b'c' | b'g')
            || letters.ends_with(b"shes")
            || letters.ends_with(b"ches");
        !sibilant
    } else {
        false
    };

    silent.then_some((start, end))
}

/// ARPAbet vowel for the nucleus `letters[start..end]`, plus whether it
/// absorbed a following `r` ("blur", "fern").
fn vowel_sound(letters: &[u8], start: usize, end: usize, lengthened: bool) -> (&'static str, bool) {
    let spelling = &letters[start..end];
    let at_end = end == letters.len();

    if spelling.len() == 1 {
        let c = spelling[0];
        if lengthened {
            let symbol = match c {
                b'a' => "EY",
                b'e' => "IY",
                b'i' | b'y' => "AY",
                b'o' => "OW",
                _ => "UW",
            };
            return (symbol, false);
        }

        let r_follows = letters.get(end) == Some(&b'r')
            && !letters.get(end + 1).is_some_and(|&b| is_plain_vowel(b));
        if r_follows && matches!(c, b'e' | b'i' | b'u') {
            return ("ER", true);
        }

        let symbol = match c {
            b'a' => "AE",
            b'e' if at_end => "IY",
            b'e' => "EH",
            b'i' => "IH",
            b'o' if at_end => "OW",
            b'o' => "AA",
            b'u' => "AH",
            b'y' if at_end => "IY",
            _ => "IH",
        };
        return (symbol, false);
    }

    if spelling.len() >= 3 && spelling.ends_with(b"ou") {
        return ("AH", false);
    }

    let symbol = match &spelling[..2] {
        b"ai" | b"ay" | b"ei" | b"ey" | b"ae" => "EY",
        b"ee" | b"ea" | b"ie" => "IY",
        b"oa" | b"oe" => "OW",
        b"oo" => "UW",
        b"ou" | b"ow" => "AW",
        b"oi" | b"oy" => "OY",
        b"au" | b"aw" => "AO",
        b"ue" | b"ew" | b"eu" | b"ui" => "UW",
        _ => return vowel_sound(letters, start, start + 1, false),
    };
    (symbol, false)
}

fn emit_consonants(
    letters: &[u8],
    start: usize,
    end: usize,
    skip_r_at: Option<usize>,
    out: &mut Vec<Phoneme>,
) {
    let mut i = start;
    while i < end {
        let c = letters[i];
        let next = (i + 1 < end).then(|| letters[i + 1]);

        if skip_r_at == Some(i) && c == b'r' {
            i += 1;
            continue;
        }
        // doubled letters sound once
        if next == Some(c) {
            i += 1;
            continue;
        }
        // silent initial k/w/g: "knot", "wrist", "gnaw"
        if i == 0 && matches!((c, next), (b'k', Some(b'n')) | (b'w', Some(b'r')) | (b'g', Some(b'n'))) {
            i += 1;
            continue;
        }

        let digraph = match (c, next) {
            (b's', Some(b'h')) => Some(Some("SH")),
            (b'c', Some(b'h')) => Some(Some("CH")),
            (b't', Some(b'h')) => Some(Some("TH")),
            (b'p', Some(b'h')) => Some(Some("F")),
            (b'w', Some(b'h')) => Some(Some("W")),
            (b'c', Some(b'k')) => Some(Some("K")),
            (b'n', Some(b'g')) => Some(Some("NG")),
            (b'g', Some(b'h')) => Some(None),
            _ => None,
        };
        if let Some(symbol) = digraph {
            if let Some(symbol) = symbol {
                push(out, symbol, Stress::None);
            }
            i += 2;
            continue;
        }

        let soft = letters
            .get(i + 1)
            .is_some_and(|&b| matches!(b, b'e' | b'i' | b'y'));
        match c {
            b'c' if soft => push(out, "S", Stress::None),
            b'c' | b'k' | b'q' => push(out, "K", Stress::None),
            b'g' if soft && i + 2 == letters.len() => push(out, "JH", Stress::None),
            b'x' => {
                push(out, "K", Stress::None);
                push(out, "S", Stress::None);
            }
            b'h' => push(out, "HH", Stress::None),
            b'j' => push(out, "JH", Stress::None),
            b'y' => push(out, "Y", Stress::None),
            b'b' => push(out, "B", Stress::None),
            b'd' => push(out, "D", Stress::None),
            b'f' => push(out, "F", Stress::None),
            b'g' => push(out, "G", Stress::None),
            b'l' => push(out, "L", Stress::None),
            b'm' => push(out, "M", Stress::None),
            b'n' => push(out, "N", Stress::None),
            b'p' => push(out, "P", Stress::None),
            b'r' => push(out, "R", Stress::None),
            b's' => push(out, "S", Stress::None),
            b't' => push(out, "T", Stress::None),
            b'v' => push(out, "V", Stress::None),
            b'w' => push(out, "W", Stress::None),
            b'z' => push(out, "Z", Stress::None),
            _ => {}
        }
        i += 1;
    }
}

fn push(out: &mut Vec<Phoneme>, symbol: &str, stress: Stress) {
    if let Some(phoneme) = Phoneme::new(symbol, stress) {
        out.push(phoneme);
    }
}
