//! Integration test: relatedness analysis over a small herd, validated
//! against Wright's path-counting coefficient.
//!
//! Herd (7 birds, 4 founders):
//!   S1, 0, 0   (base sire)
//!   D1, 0, 0   (base dam)
//!   D2, 0, 0   (base dam)
//!   U,  0, 0   (unrelated hen)
//!   F1, S1, D1
//!   F2, S1, D1  (full sibling of F1)
//!   H1, S1, D2  (half sibling of F1)
//!
//! Expected pairing coefficients:
//!   F1 x F2 (full siblings): two shared ancestors at distance (1, 1)
//!     F = 2 * 0.5^(1+1+1) = 0.25  -> AVOID
//!   F1 x H1 (half siblings): one shared ancestor at distance (1, 1)
//!     F = 0.5^3 = 0.125           -> WARNING
//!   F1 x U: no shared ancestry    -> 0.0, EXCELLENT

use approx::assert_relative_eq;

use openroost_core::genetics::{
    InbreedingCalculator, PedigreeService, RiskCategory,
};
use openroost_core::herd::{HerdRegistry, Individual};

fn herd() -> HerdRegistry {
    let mut herd = HerdRegistry::new();
    for id in ["S1", "D1", "D2", "U"] {
        herd.add(Individual::founder(id)).unwrap();
    }
    herd.add(Individual::with_parents("F1", Some("S1"), Some("D1")))
        .unwrap();
    herd.add(Individual::with_parents("F2", Some("S1"), Some("D1")))
        .unwrap();
    herd.add(Individual::with_parents("H1", Some("S1"), Some("D2")))
        .unwrap();
    herd.validate().unwrap();
    herd
}

#[test]
fn full_sibling_pairing_is_avoid() {
    let herd = herd();
    let calc = InbreedingCalculator::new(&herd);

    let analysis = calc.pairing_analysis("F1", "F2", 5).unwrap();
    assert_relative_eq!(analysis.coefficient, 0.25);
    assert_eq!(analysis.shared_ancestors, 2);
    assert_eq!(analysis.risk, RiskCategory::Avoid);
    assert!(analysis.message.contains("25.00%"), "{}", analysis.message);
}

#[test]
fn half_sibling_pairing_is_warning() {
    let herd = herd();
    let calc = InbreedingCalculator::new(&herd);

    let analysis = calc.pairing_analysis("F1", "H1", 5).unwrap();
    assert_relative_eq!(analysis.coefficient, 0.125);
    assert_eq!(analysis.shared_ancestors, 1);
    assert_eq!(analysis.risk, RiskCategory::Warning);
    assert!(analysis.message.contains("12.50%"), "{}", analysis.message);
}

#[test]
fn unrelated_pairing_is_excellent() {
    let herd = herd();
    let calc = InbreedingCalculator::new(&herd);

    let analysis = calc.pairing_analysis("F1", "U", 5).unwrap();
    assert_eq!(analysis.coefficient, 0.0);
    assert_eq!(analysis.risk, RiskCategory::Excellent);
}

#[test]
fn end_to_end_founder_offspring() {
    // Individual C with founder parents A and B: the ancestor walk sees
    // exactly the two parents, and C itself is not inbred.
    let mut herd = HerdRegistry::new();
    herd.add(Individual::founder("A")).unwrap();
    herd.add(Individual::founder("B")).unwrap();
    herd.add(Individual::with_parents("C", Some("A"), Some("B")))
        .unwrap();

    let service = PedigreeService::new(&herd);
    let ancestors = service.collect_ancestors("C", 5).unwrap();
    let listed: Vec<(&str, u32)> = ancestors
        .iter()
        .map(|(ind, d)| (ind.id.as_str(), *d))
        .collect();
    assert_eq!(listed, vec![("A", 1), ("B", 1)]);

    let calc = InbreedingCalculator::new(&herd);
    assert_eq!(calc.coefficient("C", 6).unwrap(), 0.0);
}

#[test]
fn coefficient_matches_pairing_projection() {
    // The coefficient of an existing bird equals the projected coefficient
    // of the pairing that produced it.
    let mut herd = herd();
    herd.add(Individual::with_parents("X", Some("F1"), Some("F2")))
        .unwrap();

    let calc = InbreedingCalculator::new(&herd);
    let projected = calc.pairing_analysis("F1", "F2", 5).unwrap().coefficient;
    let realised = calc.coefficient("X", 6).unwrap();
    assert_relative_eq!(projected, realised);
}
