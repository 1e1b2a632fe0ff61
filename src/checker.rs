//! Checks whole poems against a form and reports findings as data.
//!
//! Nothing here fails: a poem that breaks every rule still produces a
//! report, with one [`Finding`] per broken rule.

use std::fmt;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::forms::FormSpec;
use crate::meter::{self, MeterFit, MeterTemplate, StressSequence};
use crate::phoneme::Provenance;
use crate::resolver::Resolver;
use crate::rhyme::{self, RhymeKey, RhymeQuality};
use crate::syllables::{count_pronunciation, SyllableCount};

/// How serious a finding is. Only violations fail a poem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Violation,
}

/// What a finding is about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
    LineCount {
        expected: usize,
        actual: usize,
    },
    Syllables {
        expected: usize,
        actual: usize,
        delta: isize,
        provenance: Provenance,
    },
    /// A pair of lines sharing a scheme label that do not rhyme perfectly.
    Rhyme {
        label: char,
        first: usize,
        second: usize,
        quality: RhymeQuality,
    },
    Meter {
        score: f64,
        deviations: Vec<usize>,
        template: MeterTemplate,
    },
}

/// One reported problem. `line` is a 0-based index, `None` for the poem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub line: Option<usize>,
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: FindingKind,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Violation => "violation",
        };
        write!(f, "[{severity}] ")?;
        if let Some(line) = self.line {
            write!(f, "line {}: ", line + 1)?;
        }
        match &self.kind {
            FindingKind::LineCount { expected, actual } => {
                write!(f, "expected {expected} lines, found {actual}")
            }
            FindingKind::Syllables {
                expected,
                actual,
                delta,
                provenance,
            } => {
                write!(f, "{actual} syllables, expected {expected} ({delta:+})")?;
                if provenance.is_heuristic() {
                    f.write_str(" [estimated]")?;
                }
                Ok(())
            }
            FindingKind::Rhyme {
                label,
                first,
                second,
                quality,
            } => write!(
                f,
                "lines {} and {} should rhyme ({label}), rhyme is {quality}",
                first + 1,
                second + 1
            ),
            FindingKind::Meter {
                score,
                deviations,
                template,
            } => {
                let positions: Vec<String> =
                    deviations.iter().map(|p| (p + 1).to_string()).collect();
                write!(
                    f,
                    "{} fit {score:.2}, off at syllables {}",
                    template.describe(),
                    positions.join(", ")
                )
            }
        }
    }
}

/// Everything measured about a single line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineAnalysis {
    pub index: usize,
    pub text: String,
    pub syllables: SyllableCount,
    /// Syllable target of this line's slot, if the form sets one.
    pub target: Option<usize>,
    pub stress: StressSequence,
    pub rhyme_word: Option<String>,
    pub rhyme_key: RhymeKey,
    /// Fit against the form's template, if it has one.
    pub meter: Option<MeterFit>,
    /// Words that fell to the placeholder pronunciation.
    pub unresolved_words: usize,
}

/// Result of checking a poem against a form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationReport {
    pub form: String,
    pub lines: Vec<LineAnalysis>,
    pub findings: Vec<Finding>,
    score: f64,
}

impl ViolationReport {
    /// True when there are no hard violations. Warnings do not fail a poem.
    pub fn passed(&self) -> bool {
        self.hard_violations().next().is_none()
    }

    pub fn hard_violations(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Violation)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// Mean of the individual check scores, 1.0 when nothing was checked.
    pub fn overall_score(&self) -> f64 {
        self.score
    }
}

impl fmt::Display for ViolationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed() { "PASS" } else { "FAIL" };
        writeln!(f, "{}: {verdict} (score {:.2})", self.form, self.score)?;
        for line in &self.lines {
            write!(f, "  {:>2}. {}", line.index + 1, line.syllables.count)?;
            if let Some(target) = line.target {
                write!(f, "/{target}")?;
            }
            f.write_str(" syl")?;
            if let Some(fit) = &line.meter {
                write!(f, ", meter {:.2} {}", fit.score, line.stress)?;
            }
            writeln!(f, "  {}", line.text)?;
        }
        for finding in &self.findings {
            writeln!(f, "  {finding}")?;
        }
        Ok(())
    }
}

/// Sub-score for a line `deviation` syllables away from its target.
pub(crate) fn syllable_score(deviation: usize, penalty: f64) -> f64 {
    (1.0 - penalty * deviation as f64).max(0.0)
}

pub(crate) fn rhyme_score(quality: RhymeQuality, slant_credit: f64) -> f64 {
    match quality {
        RhymeQuality::Perfect => 1.0,
        RhymeQuality::Slant => slant_credit,
        RhymeQuality::None => 0.0,
    }
}

/// Runs syllable, rhyme and meter checks over a poem.
pub struct Checker<'a> {
    resolver: &'a Resolver,
    config: &'a EngineConfig,
}

impl<'a> Checker<'a> {
    pub fn new(resolver: &'a Resolver, config: &'a EngineConfig) -> Self {
        Self { resolver, config }
    }

    /// Measure one line as line `index` of `form`.
    pub fn analyze_line(&self, index: usize, text: &str, form: &FormSpec) -> LineAnalysis {
        let resolved = self.resolver.resolve_line(text);

        let syllables: SyllableCount = resolved
            .iter()
            .map(|(_, pronunciation)| count_pronunciation(pronunciation))
            .sum();
        let stress = StressSequence::from_pronunciations(resolved.iter().map(|(_, p)| p.as_ref()));
        let unresolved_words = resolved
            .iter()
            .filter(|(_, p)| p.provenance() == Provenance::Fallback)
            .count();
        let (rhyme_word, rhyme_key) = match resolved.last() {
            Some((word, pronunciation)) => (
                Some(word.clone()),
                RhymeKey::from_pronunciation(pronunciation),
            ),
            None => (None, RhymeKey::default()),
        };
        let meter = form.meter.map(|template| meter::fit(&stress, &template));

        LineAnalysis {
            index,
            text: text.to_string(),
            syllables,
            target: form.syllable_target(index),
            stress,
            rhyme_word,
            rhyme_key,
            meter,
            unresolved_words,
        }
    }

    /// Check `poem` against `form`.
    ///
    /// A wrong line count is one poem-level violation; the lines present
    /// (up to the form's count) are still checked.
    pub fn check<S: AsRef<str>>(&self, poem: &[S], form: &FormSpec) -> ViolationReport {
        let mut findings = Vec::new();
        let mut scores = Vec::new();

        let checked = match form.line_count() {
            Some(expected) => {
                if expected == poem.len() {
                    scores.push(1.0);
                } else {
                    scores.push(0.0);
                    findings.push(Finding {
                        line: None,
                        severity: Severity::Violation,
                        kind: FindingKind::LineCount {
                            expected,
                            actual: poem.len(),
                        },
                    });
                }
                expected.min(poem.len())
            }
            None => poem.len(),
        };

        let lines: Vec<LineAnalysis> = poem[..checked]
            .iter()
            .enumerate()
            .map(|(idx, line)| self.analyze_line(idx, line.as_ref(), form))
            .collect();

        for line in &lines {
            self.check_syllables(line, &mut findings, &mut scores);
            self.check_meter(line, form, &mut findings, &mut scores);
        }
        if let Some(scheme) = &form.rhyme_scheme {
            let scheme = &scheme[..checked.min(scheme.len())];
            self.check_rhymes(scheme, &lines, &mut findings, &mut scores);
        }

        let score = if scores.is_empty() {
            1.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        let report = ViolationReport {
            form: form.key.clone(),
            lines,
            findings,
            score,
        };
        log::debug!(
            "Checked {} lines against '{}': {} violations, {} warnings, score {:.2}",
            report.lines.len(),
            report.form,
            report.hard_violations().count(),
            report.warnings().count(),
            report.score
        );
        report
    }

    fn check_syllables(&self, line: &LineAnalysis, findings: &mut Vec<Finding>, scores: &mut Vec<f64>) {
        let Some(expected) = line.target else {
            return;
        };
        let delta = line.syllables.delta(expected);
        scores.push(syllable_score(
            delta.unsigned_abs(),
            self.config.syllable_penalty,
        ));
        if delta == 0 {
            return;
        }

        let tolerated = delta.unsigned_abs() <= self.config.heuristic_tolerance
            && line.syllables.provenance.is_heuristic();
        findings.push(Finding {
            line: Some(line.index),
            severity: if tolerated {
                Severity::Warning
            } else {
                Severity::Violation
            },
            kind: FindingKind::Syllables {
                expected,
                actual: line.syllables.count,
                delta,
                provenance: line.syllables.provenance,
            },
        });
    }

    fn check_meter(
        &self,
        line: &LineAnalysis,
        form: &FormSpec,
        findings: &mut Vec<Finding>,
        scores: &mut Vec<f64>,
    ) {
        let (Some(fit), Some(template)) = (&line.meter, form.meter) else {
            return;
        };
        scores.push(fit.score);
        if fit.score < self.config.meter_threshold {
            findings.push(Finding {
                line: Some(line.index),
                severity: Severity::Violation,
                kind: FindingKind::Meter {
                    score: fit.score,
                    deviations: fit.deviations.clone(),
                    template,
                },
            });
        }
    }

    fn check_rhymes(
        &self,
        scheme: &[char],
        lines: &[LineAnalysis],
        findings: &mut Vec<Finding>,
        scores: &mut Vec<f64>,
    ) {
        for (label, members) in rhyme::rhyme_groups(scheme) {
            for (pos, &first) in members.iter().enumerate() {
                for &second in &members[pos + 1..] {
                    let quality = rhyme::classify(&lines[first].rhyme_key, &lines[second].rhyme_key);
                    scores.push(rhyme_score(quality, self.config.slant_credit));
                    let severity = match quality {
                        RhymeQuality::Perfect => continue,
                        RhymeQuality::Slant => Severity::Warning,
                        RhymeQuality::None => Severity::Violation,
                    };
                    findings.push(Finding {
                        line: Some(second),
                        severity,
                        kind: FindingKind::Rhyme {
                            label,
                            first,
                            second,
                            quality,
                        },
                    });
                }
            }
        }
    }
}
