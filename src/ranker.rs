//! Scores and orders alternative candidates for one line of a poem.

use serde::Serialize;

use crate::checker::{rhyme_score, syllable_score, Checker, LineAnalysis};
use crate::config::EngineConfig;
use crate::forms::FormSpec;
use crate::resolver::Resolver;
use crate::rhyme::{self, RhymeQuality};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Sub-scores of one candidate. A sub-score is `None` when the form places
/// no such constraint on the slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub analysis: LineAnalysis,
    pub syllable: Option<f64>,
    pub rhyme: Option<f64>,
    pub meter: Option<f64>,
    /// Rhyme quality against each context line sharing the slot's label.
    pub rhymes_with: Vec<(usize, RhymeQuality)>,
    /// Weighted mean of the applicable sub-scores.
    pub composite: f64,
}

/// A scored candidate in ranked order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    /// 1-based position in the ranking.
    pub rank: usize,
    /// Position in the submitted candidate list.
    pub index: usize,
    pub text: String,
    pub score: CandidateScore,
}

/// Orders candidate lines for a slot by weighted constraint satisfaction.
pub struct Ranker<'a> {
    resolver: &'a Resolver,
    config: &'a EngineConfig,
}

impl<'a> Ranker<'a> {
    pub fn new(resolver: &'a Resolver, config: &'a EngineConfig) -> Self {
        Self { resolver, config }
    }

    /// Score one candidate as line `slot` of `form`.
    ///
    /// `context` holds the poem's lines by index; the slot's own entry, if
    /// present, is ignored. Words that cannot be pronounced each count as
    /// one extra syllable of deviation.
    pub fn score<S: AsRef<str>>(
        &self,
        form: &FormSpec,
        context: &[S],
        slot: usize,
        candidate: &str,
    ) -> CandidateScore {
        let analysis = Checker::new(self.resolver, self.config).analyze_line(slot, candidate, form);

        let syllable = analysis.target.map(|target| {
            let deviation = analysis.syllables.delta(target).unsigned_abs() + analysis.unresolved_words;
            syllable_score(deviation, self.config.syllable_penalty)
        });

        let rhymes_with: Vec<(usize, RhymeQuality)> = match form.rhyme_label(slot) {
            Some(label) => context
                .iter()
                .enumerate()
                .filter(|&(idx, _)| idx != slot && form.rhyme_label(idx) == Some(label))
                .map(|(idx, line)| {
                    let partner = rhyme::RhymeKey::of_line(self.resolver, line.as_ref());
                    (idx, rhyme::classify(&analysis.rhyme_key, &partner))
                })
                .collect(),
            None => Vec::new(),
        };
        let rhyme = if rhymes_with.is_empty() {
            None
        } else {
            let total: f64 = rhymes_with
                .iter()
                .map(|&(_, quality)| rhyme_score(quality, self.config.slant_credit))
                .sum();
            Some(total / rhymes_with.len() as f64)
        };

        let meter = analysis.meter.as_ref().map(|fit| fit.score);

        let weights = &self.config.weights;
        let applicable = [
            (syllable, weights.syllable),
            (rhyme, weights.rhyme),
            (meter, weights.meter),
        ];
        let (weighted, weight_sum) = applicable
            .iter()
            .filter_map(|&(score, weight)| score.map(|s| (s * weight, weight)))
            .fold((0.0, 0.0), |(acc, total), (s, w)| (acc + s, total + w));
        let composite = if weight_sum > 0.0 {
            weighted / weight_sum
        } else {
            1.0
        };

        CandidateScore {
            analysis,
            syllable,
            rhyme,
            meter,
            rhymes_with,
            composite,
        }
    }

    /// Score every candidate and sort by composite score, best first.
    ///
    /// The output is a permutation of the input; ties keep submission order.
    pub fn rank<S, C>(
        &self,
        form: &FormSpec,
        context: &[S],
        slot: usize,
        candidates: &[C],
    ) -> Vec<RankedCandidate>
    where
        S: AsRef<str> + Sync,
        C: AsRef<str> + Sync,
    {
        let score_one = |(index, candidate): (usize, &C)| {
            let text = candidate.as_ref();
            RankedCandidate {
                rank: 0,
                index,
                text: text.to_string(),
                score: self.score(form, context, slot, text),
            }
        };

        #[cfg(feature = "parallel")]
        let mut ranked: Vec<RankedCandidate> =
            candidates.par_iter().enumerate().map(score_one).collect();
        #[cfg(not(feature = "parallel"))]
        let mut ranked: Vec<RankedCandidate> =
            candidates.iter().enumerate().map(score_one).collect();

        ranked.sort_by(|a, b| b.score.composite.total_cmp(&a.score.composite));
        for (pos, candidate) in ranked.iter_mut().enumerate() {
            candidate.rank = pos + 1;
        }

        if let Some(top) = ranked.first() {
            log::debug!(
                "Ranked {} candidates for line {} of '{}'; best #{} at {:.2}",
                ranked.len(),
                slot + 1,
                form.key,
                top.index,
                top.score.composite
            );
        }
        ranked
    }

    /// The highest-ranked candidate, if any were given.
    pub fn best<S, C>(
        &self,
        form: &FormSpec,
        context: &[S],
        slot: usize,
        candidates: &[C],
    ) -> Option<RankedCandidate>
    where
        S: AsRef<str> + Sync,
        C: AsRef<str> + Sync,
    {
        self.rank(form, context, slot, candidates).into_iter().next()
    }
}
