//! Line tokenization and word normalization.
//!
//! Words are lowercased, surrounding punctuation is dropped, and compound
//! tokens are split on hyphens and dashes so each part is resolved on its
//! own ("well-worn" counts as "well" + "worn").

/// Split a line into normalized words.
///
/// Apostrophes inside a word are kept ("summer's", "o'er"); digit groups
/// joined by `.` or `,` stay one token ("1,000").
pub fn words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    for (idx, ch) in line.char_indices() {
        if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
            continue;
        }
        if is_apostrophe(ch) {
            current.push('\'');
            continue;
        }
        if joins_digits(line, idx, ch) {
            current.push(ch);
            continue;
        }
        flush_word(&mut words, &mut current);
    }

    flush_word(&mut words, &mut current);
    words
}

/// Normalize a single word the way [`words`] would, or return an empty
/// string when nothing pronounceable remains.
///
/// A raw token that contains a hyphen yields its first component only;
/// use [`words`] to split compounds.
pub fn normalize_word(raw: &str) -> String {
    words(raw).into_iter().next().unwrap_or_default()
}

/// The last word of a line, which carries its rhyme.
pub fn last_word(line: &str) -> Option<String> {
    words(line).pop()
}

fn flush_word(words: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim_matches('\'');
    if !trimmed.is_empty() {
        words.push(trimmed.to_string());
    }
    current.clear();
}

fn is_apostrophe(ch: char) -> bool {
    matches!(ch, '\'' | '\u{2019}')
}

/// A `.` or `,` at byte `idx` sitting between two digits, as in "1,000".
fn joins_digits(line: &str, idx: usize, ch: char) -> bool {
    if ch != '.' && ch != ',' {
        return false;
    }
    let before = line[..idx].chars().next_back();
    let after = line[idx + ch.len_utf8()..].chars().next();
    before.is_some_and(|c| c.is_ascii_digit()) && after.is_some_and(|c| c.is_ascii_digit())
}
