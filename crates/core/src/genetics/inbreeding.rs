use std::fmt;

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::error::{BreedingError, Result};
use crate::herd::IndividualStore;
use crate::types::{IndividualId, Scalar};

use super::pedigree::CancelToken;

/// Default search depth for [`InbreedingCalculator::coefficient`].
pub const DEFAULT_COEFFICIENT_DEPTH: u32 = 6;

/// Default search depth for [`InbreedingCalculator::pairing_analysis`].
pub const DEFAULT_PAIRING_DEPTH: u32 = 5;

/// Map from ancestor id to the *nearest* generation distance at which the
/// id was reached from a given root. The root itself is recorded at
/// distance 0.
///
/// Ids keep discovery order, so downstream counts and reports are
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct AncestorMap {
    distances: IndexMap<IndividualId, u32>,
}

impl AncestorMap {
    /// Build the map rooted at `root_id`: the root at distance 0, its
    /// parents at 1, and so on up to `max_depth`.
    ///
    /// A revisited id only re-recurses when reached by a strictly shorter
    /// path. That keeps every recorded distance minimal and terminates on
    /// cyclic parent data, since a loop can only come back at a greater
    /// distance.
    pub fn build(
        store: &dyn IndividualStore,
        root_id: &str,
        max_depth: u32,
        cancel: &CancelToken,
    ) -> Result<Self> {
        let mut map = Self::default();
        map.record(store, root_id, 0, max_depth, cancel)?;
        Ok(map)
    }

    fn record(
        &mut self,
        store: &dyn IndividualStore,
        id: &str,
        distance: u32,
        max_depth: u32,
        cancel: &CancelToken,
    ) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(BreedingError::Cancelled);
        }

        match self.distances.entry(id.to_string()) {
            Entry::Occupied(mut entry) => {
                if distance < *entry.get() {
                    *entry.get_mut() = distance;
                } else {
                    return Ok(());
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(distance);
            }
        }

        if distance >= max_depth {
            return Ok(());
        }
        // The id is recorded even when the individual itself is
        // undocumented; only recursion needs the record.
        let Some(individual) = store.individual(id) else {
            return Ok(());
        };
        if let Some(sire_id) = individual.sire_id.as_deref() {
            self.record(store, sire_id, distance + 1, max_depth, cancel)?;
        }
        if let Some(dam_id) = individual.dam_id.as_deref() {
            self.record(store, dam_id, distance + 1, max_depth, cancel)?;
        }
        Ok(())
    }

    /// Recorded distance for `id`, if the id was reached.
    pub fn distance(&self, id: &str) -> Option<u32> {
        self.distances.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Iterate `(id, distance)` in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.distances.iter().map(|(id, d)| (id.as_str(), *d))
    }
}

/// Risk banding for a prospective pairing. Bands are exact and
/// non-overlapping: a coefficient sitting on a boundary falls into the
/// higher-risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskCategory {
    Excellent,
    Good,
    Caution,
    Warning,
    Avoid,
}

impl RiskCategory {
    pub fn from_coefficient(coefficient: Scalar) -> Self {
        if coefficient == 0.0 {
            RiskCategory::Excellent
        } else if coefficient < 0.0625 {
            RiskCategory::Good
        } else if coefficient < 0.125 {
            RiskCategory::Caution
        } else if coefficient < 0.25 {
            RiskCategory::Warning
        } else {
            RiskCategory::Avoid
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Excellent => "EXCELLENT",
            RiskCategory::Good => "GOOD",
            RiskCategory::Caution => "CAUTION",
            RiskCategory::Warning => "WARNING",
            RiskCategory::Avoid => "AVOID",
        }
    }

    fn advice(&self) -> &'static str {
        match self {
            RiskCategory::Excellent => {
                "No common ancestry within the searched depth; an outcross \
                 pairing."
            }
            RiskCategory::Good => {
                "Distant common ancestry; acceptable for most breeding goals."
            }
            RiskCategory::Caution => {
                "Moderate relatedness; watch hatch rates and vigour in the \
                 offspring."
            }
            RiskCategory::Warning => {
                "Closely related pair; expect measurable inbreeding \
                 depression."
            }
            RiskCategory::Avoid => {
                "Sibling-level relatedness or closer; this pairing is not \
                 recommended."
            }
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a prospective-mate analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct PairingAnalysis {
    /// Projected inbreeding coefficient of the offspring, in `[0, 1]`.
    pub coefficient: Scalar,
    /// Number of distinct ancestors the candidates share within depth.
    pub shared_ancestors: usize,
    pub risk: RiskCategory,
    pub message: String,
}

/// Wright's path-counting sum over the ids present in both maps:
/// `F = sum 0.5^(n1 + n2 + 1)`.
///
/// Assumes every shared ancestor's own inbreeding is zero: a documented
/// simplification, not full relationship-matrix genetics.
fn path_coefficient(a: &AncestorMap, b: &AncestorMap) -> Scalar {
    a.iter()
        .filter_map(|(id, n1)| {
            b.distance(id)
                .map(|n2| 0.5_f64.powi((n1 + n2 + 1) as i32))
        })
        .sum()
}

fn shared_count(a: &AncestorMap, b: &AncestorMap) -> usize {
    a.iter().filter(|(id, _)| b.distance(id).is_some()).count()
}

/// Relatedness analysis over an injected [`IndividualStore`].
pub struct InbreedingCalculator<'a> {
    store: &'a dyn IndividualStore,
    cancel: CancelToken,
}

impl<'a> InbreedingCalculator<'a> {
    pub fn new(store: &'a dyn IndividualStore) -> Self {
        Self {
            store,
            cancel: CancelToken::new(),
        }
    }

    /// Attach a cancellation token shared with the caller.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Inbreeding coefficient of `id`: the path-counting sum over
    /// ancestors shared between the sire line and the dam line, clamped to
    /// `[0, 1]`.
    ///
    /// `0.0` whenever the individual, its sire link, or its dam link is
    /// unknown; an undocumented pedigree reads as non-inbred.
    pub fn coefficient(&self, id: &str, max_depth: u32) -> Result<Scalar> {
        let Some(subject) = self.store.individual(id) else {
            return Ok(0.0);
        };
        let (Some(sire_id), Some(dam_id)) = (subject.sire_id, subject.dam_id)
        else {
            return Ok(0.0);
        };

        let sire_map =
            AncestorMap::build(self.store, &sire_id, max_depth, &self.cancel)?;
        let dam_map =
            AncestorMap::build(self.store, &dam_id, max_depth, &self.cancel)?;

        Ok(path_coefficient(&sire_map, &dam_map).clamp(0.0, 1.0))
    }

    /// Analyse a prospective mating: the projected offspring coefficient,
    /// the shared-ancestor count, a risk band, and a report line.
    ///
    /// Each candidate's map includes the candidate itself at distance 0,
    /// so mating a bird to its own parent or sibling is scored correctly.
    pub fn pairing_analysis(
        &self,
        male_id: &str,
        female_id: &str,
        max_depth: u32,
    ) -> Result<PairingAnalysis> {
        let male_map =
            AncestorMap::build(self.store, male_id, max_depth, &self.cancel)?;
        let female_map =
            AncestorMap::build(self.store, female_id, max_depth, &self.cancel)?;

        let coefficient =
            path_coefficient(&male_map, &female_map).clamp(0.0, 1.0);
        let shared_ancestors = shared_count(&male_map, &female_map);
        let risk = RiskCategory::from_coefficient(coefficient);
        let message = format!(
            "Projected inbreeding coefficient {:.2}% from {} shared \
             ancestor(s) [{}]. {}",
            coefficient * 100.0,
            shared_ancestors,
            risk.label(),
            risk.advice()
        );

        Ok(PairingAnalysis {
            coefficient,
            shared_ancestors,
            risk,
            message,
        })
    }
}
