//! Metrical scansion.
//!
//! A line is flattened into a [`StressSequence`] (one mark per syllable)
//! and compared position by position against a foot pattern tiled to the
//! expected length. The fit is continuous: near misses score just below
//! 1.0, wild mismatches near 0.0.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::phoneme::{Pronunciation, Stress};
use crate::resolver::Resolver;

/// Stress of one syllable position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StressMark {
    Unstressed,
    Stressed,
    /// Syllable of an unresolvable token. Matches no template position.
    Unknown,
}

impl StressMark {
    fn symbol(self) -> char {
        match self {
            StressMark::Unstressed => 'u',
            StressMark::Stressed => '/',
            StressMark::Unknown => '?',
        }
    }
}

impl From<Stress> for StressMark {
    fn from(stress: Stress) -> Self {
        match stress {
            Stress::Primary | Stress::Secondary => StressMark::Stressed,
            Stress::Unstressed => StressMark::Unstressed,
            Stress::None => StressMark::Unknown,
        }
    }
}

/// Linear stress marks of a line, one per syllable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StressSequence(Vec<StressMark>);

impl StressSequence {
    pub fn new(marks: Vec<StressMark>) -> Self {
        Self(marks)
    }

    /// Concatenate the vowel stresses of each word.
    pub fn from_pronunciations<'a, I>(pronunciations: I) -> Self
    where
        I: IntoIterator<Item = &'a Pronunciation>,
    {
        Self(
            pronunciations
                .into_iter()
                .flat_map(|p| p.vowel_stresses().map(StressMark::from))
                .collect(),
        )
    }

    /// Scan a line of text.
    pub fn of_line(resolver: &Resolver, line: &str) -> Self {
        let resolved = resolver.resolve_line(line);
        Self::from_pronunciations(resolved.iter().map(|(_, p)| p.as_ref()))
    }

    /// Parse `u` / `/` / `?` notation, ignoring anything else.
    pub fn parse(notation: &str) -> Self {
        Self(
            notation
                .chars()
                .filter_map(|c| match c {
                    'u' | 'x' => Some(StressMark::Unstressed),
                    '/' => Some(StressMark::Stressed),
                    '?' => Some(StressMark::Unknown),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn marks(&self) -> &[StressMark] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StressSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|m| write!(f, "{}", m.symbol()))
    }
}

/// A metrical foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Foot {
    /// da-DUM
    Iambic,
    /// DUM-da
    Trochaic,
    /// da-da-DUM
    Anapestic,
    /// DUM-da-da
    Dactylic,
    /// DUM-DUM
    Spondaic,
}

impl Foot {
    pub fn pattern(self) -> &'static [StressMark] {
        use StressMark::{Stressed as S, Unstressed as U};
        match self {
            Foot::Iambic => &[U, S],
            Foot::Trochaic => &[S, U],
            Foot::Anapestic => &[U, U, S],
            Foot::Dactylic => &[S, U, U],
            Foot::Spondaic => &[S, S],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Foot::Iambic => "iambic",
            Foot::Trochaic => "trochaic",
            Foot::Anapestic => "anapestic",
            Foot::Dactylic => "dactylic",
            Foot::Spondaic => "spondaic",
        }
    }
}

/// Most syllable positions a template may fix.
pub const MAX_POSITIONS: usize = 64;

/// A repeating foot, optionally with a fixed number of feet per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeterTemplate {
    pub foot: Foot,
    /// `Some(5)` for pentameter; `None` lets the line length decide.
    #[serde(default)]
    pub feet: Option<usize>,
}

impl MeterTemplate {
    pub fn new(foot: Foot, feet: Option<usize>) -> Self {
        Self { foot, feet }
    }

    pub fn iambic_pentameter() -> Self {
        Self::new(Foot::Iambic, Some(5))
    }

    /// Number of syllable positions the template fixes, if any.
    ///
    /// `None` also when the foot count is too large to represent.
    pub fn positions(&self) -> Option<usize> {
        self.feet
            .and_then(|feet| feet.checked_mul(self.foot.pattern().len()))
    }

    /// Reject foot counts a real line could never have.
    pub fn validate(&self) -> Result<(), String> {
        match self.feet {
            Some(0) => Err("a meter needs at least one foot".to_string()),
            Some(feet) => match self.positions() {
                Some(positions) if positions <= MAX_POSITIONS => Ok(()),
                _ => Err(format!(
                    "{feet} {} feet exceed {MAX_POSITIONS} syllable positions",
                    self.foot.name()
                )),
            },
            None => Ok(()),
        }
    }

    /// The foot pattern tiled to `len` positions, truncating the last foot.
    pub fn tile(&self, len: usize) -> StressSequence {
        StressSequence(self.foot.pattern().iter().copied().cycle().take(len).collect())
    }

    /// "iambic pentameter", "anapestic", "trochaic 9-meter".
    pub fn describe(&self) -> String {
        let Some(feet) = self.feet else {
            return self.foot.name().to_string();
        };
        let length = match feet {
            1 => "monometer".to_string(),
            2 => "dimeter".to_string(),
            3 => "trimeter".to_string(),
            4 => "tetrameter".to_string(),
            5 => "pentameter".to_string(),
            6 => "hexameter".to_string(),
            7 => "heptameter".to_string(),
            8 => "octameter".to_string(),
            n => format!("{n}-meter"),
        };
        format!("{} {length}", self.foot.name())
    }
}

/// How well a stress sequence fits a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterFit {
    /// 1 - deviating / compared positions, in `[0, 1]`.
    pub score: f64,
    /// Positions that break the pattern, including positions missing from
    /// or in excess of the template's fixed length.
    pub deviations: Vec<usize>,
    pub expected: StressSequence,
}

/// Compare `actual` against `template`.
///
/// Without a fixed foot count the pattern is tiled to the actual length.
/// With one, length mismatches add deviating positions instead of failing
/// outright. An empty sequence scores 0. Templates that fail
/// [`MeterTemplate::validate`] are capped at [`MAX_POSITIONS`] positions
/// (or the actual length, if longer).
pub fn fit(actual: &StressSequence, template: &MeterTemplate) -> MeterFit {
    let expected_len = match template.feet {
        Some(_) => template
            .positions()
            .unwrap_or(usize::MAX)
            .min(MAX_POSITIONS.max(actual.len())),
        None => actual.len(),
    };
    let expected = template.tile(expected_len);

    if actual.is_empty() {
        return MeterFit {
            score: 0.0,
            deviations: (0..expected_len).collect(),
            expected,
        };
    }

    let total = actual.len().max(expected_len);
    let deviations: Vec<usize> = (0..total)
        .filter(|&i| match (actual.0.get(i), expected.0.get(i)) {
            (Some(a), Some(e)) => a != e,
            _ => true,
        })
        .collect();

    let score = 1.0 - deviations.len() as f64 / total as f64;
    MeterFit {
        score: score.clamp(0.0, 1.0),
        deviations,
        expected,
    }
}

/// Scan a line and fit it against `template`.
pub fn fit_line(resolver: &Resolver, line: &str, template: &MeterTemplate) -> MeterFit {
    fit(&StressSequence::of_line(resolver, line), template)
}
