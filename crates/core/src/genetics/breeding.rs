use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::genotype::{Allele, AllelePair, Genotype};

/// One Monte-Carlo offspring produced by [`simulate_offspring`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedOffspring {
    pub id: String,
    pub genotype: Genotype,
}

/// Draw one allele uniformly from each parent's pair.
fn draw_pair<A: Allele, R: Rng + ?Sized>(
    sire: &AllelePair<A>,
    dam: &AllelePair<A>,
    rng: &mut R,
) -> AllelePair<A> {
    let (s0, s1) = sire.alleles();
    let (d0, d1) = dam.alleles();
    let from_sire = if rng.gen_bool(0.5) { s0 } else { s1 };
    let from_dam = if rng.gen_bool(0.5) { d0 } else { d1 };
    AllelePair::new(from_sire, from_dam)
}

/// Simulate a single offspring genotype by independent per-locus Mendelian
/// segregation: at each of the 8 loci, one allele is drawn uniformly at
/// random from the sire's pair and one from the dam's pair. Loci assort
/// independently; no linkage is modelled.
///
/// The random source is injected so callers (and tests) control the draws.
pub fn simulate_offspring<R: Rng + ?Sized>(
    sire: &Genotype,
    dam: &Genotype,
    offspring_id: impl Into<String>,
    rng: &mut R,
) -> SimulatedOffspring {
    SimulatedOffspring {
        id: offspring_id.into(),
        genotype: Genotype {
            base_color: draw_pair(&sire.base_color, &dam.base_color, rng),
            silver: draw_pair(&sire.silver, &dam.silver, rng),
            barring: draw_pair(&sire.barring, &dam.barring, rng),
            columbian: draw_pair(&sire.columbian, &dam.columbian, rng),
            pattern: draw_pair(&sire.pattern, &dam.pattern, rng),
            melanotic: draw_pair(&sire.melanotic, &dam.melanotic, rng),
            mottling: draw_pair(&sire.mottling, &dam.mottling, rng),
            dilution: draw_pair(&sire.dilution, &dam.dilution, rng),
        },
    }
}

/// Simulate a whole clutch in parallel.
///
/// Each chick gets its own `StdRng` seeded from `base_seed` plus its index,
/// so a given seed fully determines the clutch regardless of how rayon
/// schedules the work. Ids are `{prefix}-1` through `{prefix}-{count}`.
pub fn simulate_clutch(
    sire: &Genotype,
    dam: &Genotype,
    id_prefix: &str,
    count: usize,
    base_seed: u64,
) -> Vec<SimulatedOffspring> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i as u64));
            simulate_offspring(
                sire,
                dam,
                format!("{}-{}", id_prefix, i + 1),
                &mut rng,
            )
        })
        .collect()
}
