use crate::error::Result;
use crate::herd::IndividualStore;

use super::pedigree::{CancelToken, PedigreeService};

/// Default depth for [`LineageScorer::score`].
pub const DEFAULT_SCORE_GENERATIONS: u32 = 3;

/// How fully an individual's ancestry is documented over a requested depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageScore {
    /// `round(known / max * 100)`; 0 when max is 0.
    pub completeness_percent: u32,
    /// Largest `g` such that every generation `1..=g` is fully documented
    /// (2^gen distinct ancestors); stops at the first gap.
    pub generations_complete: u32,
    pub known_ancestors: usize,
    /// `sum of 2^gen for gen in 1..=generations`: a full binary pedigree.
    pub max_possible_ancestors: usize,
    pub recommendation: &'static str,
}

fn recommendation_for(percent: u32) -> &'static str {
    if percent >= 90 {
        "Excellent documentation; the pedigree is essentially complete."
    } else if percent >= 75 {
        "Good documentation; fill the remaining ancestor gaps when records \
         allow."
    } else if percent >= 50 {
        "Moderate documentation; several ancestor lines are missing."
    } else if percent >= 25 {
        "Sparse documentation; seek breeder or hatchery records for the \
         missing lines."
    } else {
        "Minimal documentation; ancestry is largely unrecorded."
    }
}

/// Rates pedigree completeness using the ancestor-collection primitive.
pub struct LineageScorer<'a> {
    pedigree: PedigreeService<'a>,
}

impl<'a> LineageScorer<'a> {
    pub fn new(store: &'a dyn IndividualStore) -> Self {
        Self {
            pedigree: PedigreeService::new(store),
        }
    }

    /// Attach a cancellation token shared with the caller.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.pedigree = self.pedigree.with_cancel_token(token);
        self
    }

    /// Score how fully `id`'s ancestry is documented over `generations`.
    ///
    /// Counts are over *distinct* ancestors: in an inbred pedigree the same
    /// bird filling two slots counts once, so a generation can read as
    /// incomplete even when every paper slot is filled.
    pub fn score(&self, id: &str, generations: u32) -> Result<LineageScore> {
        let ancestors = self.pedigree.collect_ancestors(id, generations)?;

        let known_ancestors = ancestors.len();
        let max_possible_ancestors: usize = (1..=generations)
            .map(|gen| 2_usize.pow(gen))
            .sum();

        let completeness_percent = if max_possible_ancestors == 0 {
            0
        } else {
            ((known_ancestors as f64 / max_possible_ancestors as f64) * 100.0)
                .round() as u32
        };

        let mut generations_complete = 0;
        for gen in 1..=generations {
            let at_gen =
                ancestors.iter().filter(|(_, d)| *d == gen).count();
            if at_gen == 2_usize.pow(gen) {
                generations_complete = gen;
            } else {
                break;
            }
        }

        Ok(LineageScore {
            completeness_percent,
            generations_complete,
            known_ancestors,
            max_possible_ancestors,
            recommendation: recommendation_for(completeness_percent),
        })
    }
}
