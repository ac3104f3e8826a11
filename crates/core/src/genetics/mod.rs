// Genetics module: genotype model, Mendelian simulation, phenotype
// resolution, pedigree traversal, inbreeding, and lineage scoring.

pub mod breeding;
pub mod genotype;
pub mod inbreeding;
pub mod lineage;
pub mod pedigree;
pub mod phenotype;

pub use breeding::{simulate_clutch, simulate_offspring, SimulatedOffspring};
pub use genotype::{Allele, AllelePair, Genotype, Locus};
pub use inbreeding::{
    AncestorMap, InbreedingCalculator, PairingAnalysis, RiskCategory,
    DEFAULT_COEFFICIENT_DEPTH, DEFAULT_PAIRING_DEPTH,
};
pub use lineage::{LineageScore, LineageScorer, DEFAULT_SCORE_GENERATIONS};
pub use pedigree::{CancelToken, PedigreeNode, PedigreeService};
pub use phenotype::{resolve_appearance, Appearance, PlumageStage};
