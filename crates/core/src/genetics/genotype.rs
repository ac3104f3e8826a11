use std::fmt;
use std::str::FromStr;

use crate::error::{BreedingError, Result};

/// One variant value at a heredity locus.
///
/// Every allele carries a fixed dominance rank; within a heterozygous pair
/// the higher rank is the one expressed. Ranks are only comparable within a
/// single locus.
pub trait Allele: Copy + Eq + fmt::Debug {
    /// Dominance rank. Higher wins when heterozygous.
    fn dominance(&self) -> u8;

    /// Conventional symbol, e.g. `E`, `s`, `Co`.
    fn symbol(&self) -> &'static str;

    /// Parse a conventional symbol back into an allele.
    fn from_symbol(s: &str) -> Option<Self>
    where
        Self: Sized;
}

/// Alleles at the base colour locus. The expressed allele selects one of
/// four mutually exclusive body templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseColorAllele {
    /// `E`: solid black over the whole body.
    ExtendedBlack,
    /// `ER`: black body with contrasting hackle accents.
    Birchen,
    /// `eWh`: warm wheaten body, dark tail.
    Wheaten,
    /// `eb`: red-brown patterned body, dark tail.
    Partridge,
}

impl Allele for BaseColorAllele {
    fn dominance(&self) -> u8 {
        match self {
            BaseColorAllele::ExtendedBlack => 4,
            BaseColorAllele::Birchen => 3,
            BaseColorAllele::Wheaten => 2,
            BaseColorAllele::Partridge => 1,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            BaseColorAllele::ExtendedBlack => "E",
            BaseColorAllele::Birchen => "ER",
            BaseColorAllele::Wheaten => "eWh",
            BaseColorAllele::Partridge => "eb",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "E" => Some(BaseColorAllele::ExtendedBlack),
            "ER" => Some(BaseColorAllele::Birchen),
            "eWh" => Some(BaseColorAllele::Wheaten),
            "eb" => Some(BaseColorAllele::Partridge),
            _ => None,
        }
    }
}

/// Alleles at the silver/gold locus (sex-linked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SilverAllele {
    /// `S`: silver; converts gold/red regions to white/silver.
    Silver,
    /// `s`: gold.
    Gold,
}

impl Allele for SilverAllele {
    fn dominance(&self) -> u8 {
        match self {
            SilverAllele::Silver => 2,
            SilverAllele::Gold => 1,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            SilverAllele::Silver => "S",
            SilverAllele::Gold => "s",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "S" => Some(SilverAllele::Silver),
            "s" => Some(SilverAllele::Gold),
            _ => None,
        }
    }
}

/// Alleles at the barring locus (sex-linked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarringAllele {
    /// `B`: alternating light/dark stripes across every feather.
    Barred,
    /// `b`: no barring.
    NotBarred,
}

impl Allele for BarringAllele {
    fn dominance(&self) -> u8 {
        match self {
            BarringAllele::Barred => 2,
            BarringAllele::NotBarred => 1,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            BarringAllele::Barred => "B",
            BarringAllele::NotBarred => "b",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "B" => Some(BarringAllele::Barred),
            "b" => Some(BarringAllele::NotBarred),
            _ => None,
        }
    }
}

/// Alleles at the columbian restriction locus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumbianAllele {
    /// `Co`: restricts dark pigment to hackle and tail.
    Columbian,
    /// `co`: no restriction.
    NotRestricted,
}

impl Allele for ColumbianAllele {
    fn dominance(&self) -> u8 {
        match self {
            ColumbianAllele::Columbian => 2,
            ColumbianAllele::NotRestricted => 1,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            ColumbianAllele::Columbian => "Co",
            ColumbianAllele::NotRestricted => "co",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "Co" => Some(ColumbianAllele::Columbian),
            "co" => Some(ColumbianAllele::NotRestricted),
            _ => None,
        }
    }
}

/// Alleles at the pattern locus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternAllele {
    /// `Pg`: pattern gene; visible only together with melanotic.
    Patterned,
    /// `pg`: no pattern.
    NotPatterned,
}

impl Allele for PatternAllele {
    fn dominance(&self) -> u8 {
        match self {
            PatternAllele::Patterned => 2,
            PatternAllele::NotPatterned => 1,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            PatternAllele::Patterned => "Pg",
            PatternAllele::NotPatterned => "pg",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "Pg" => Some(PatternAllele::Patterned),
            "pg" => Some(PatternAllele::NotPatterned),
            _ => None,
        }
    }
}

/// Alleles at the melanotic locus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MelanoticAllele {
    /// `Ml`: melanotic; intensifies pattern-gene markings.
    Melanotic,
    /// `ml`: no melanisation.
    NotMelanotic,
}

impl Allele for MelanoticAllele {
    fn dominance(&self) -> u8 {
        match self {
            MelanoticAllele::Melanotic => 2,
            MelanoticAllele::NotMelanotic => 1,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            MelanoticAllele::Melanotic => "Ml",
            MelanoticAllele::NotMelanotic => "ml",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "Ml" => Some(MelanoticAllele::Melanotic),
            "ml" => Some(MelanoticAllele::NotMelanotic),
            _ => None,
        }
    }
}

/// Alleles at the mottling locus. Mottling is recessive: only `mo/mo`
/// shows white flecking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MottlingAllele {
    /// `Mo`: wild type, no flecking.
    NotMottled,
    /// `mo`: mottled (recessive).
    Mottled,
}

impl Allele for MottlingAllele {
    fn dominance(&self) -> u8 {
        match self {
            MottlingAllele::NotMottled => 2,
            MottlingAllele::Mottled => 1,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            MottlingAllele::NotMottled => "Mo",
            MottlingAllele::Mottled => "mo",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "Mo" => Some(MottlingAllele::NotMottled),
            "mo" => Some(MottlingAllele::Mottled),
            _ => None,
        }
    }
}

/// Alleles at the blue dilution locus. Incompletely dominant: one `Bl` copy
/// dilutes black to blue-grey, two copies give a splash bird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DilutionAllele {
    /// `Bl`: blue dilution.
    Blue,
    /// `bl`: no dilution.
    NotDiluted,
}

impl Allele for DilutionAllele {
    fn dominance(&self) -> u8 {
        match self {
            DilutionAllele::Blue => 2,
            DilutionAllele::NotDiluted => 1,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            DilutionAllele::Blue => "Bl",
            DilutionAllele::NotDiluted => "bl",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "Bl" => Some(DilutionAllele::Blue),
            "bl" => Some(DilutionAllele::NotDiluted),
            _ => None,
        }
    }
}

/// An unordered diploid pair of alleles at one locus.
///
/// The pair is canonicalised on construction (higher dominance first), so
/// derived equality treats `(a, b)` and `(b, a)` as the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllelePair<A: Allele> {
    first: A,
    second: A,
}

impl<A: Allele> AllelePair<A> {
    pub fn new(a: A, b: A) -> Self {
        if b.dominance() > a.dominance() {
            Self { first: b, second: a }
        } else {
            Self { first: a, second: b }
        }
    }

    pub fn homozygous(a: A) -> Self {
        Self { first: a, second: a }
    }

    /// Both alleles, dominant first.
    pub fn alleles(&self) -> (A, A) {
        (self.first, self.second)
    }

    /// The expressed allele: the higher dominance rank of the pair.
    pub fn dominant(&self) -> A {
        self.first
    }

    pub fn contains(&self, allele: A) -> bool {
        self.first == allele || self.second == allele
    }

    /// Number of copies of `allele` in the pair (0, 1, or 2).
    pub fn count_of(&self, allele: A) -> u8 {
        (self.first == allele) as u8 + (self.second == allele) as u8
    }

    pub fn is_homozygous(&self) -> bool {
        self.first == self.second
    }
}

impl<A: Allele> fmt::Display for AllelePair<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first.symbol(), self.second.symbol())
    }
}

/// The 8 heredity loci tracked by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locus {
    BaseColor,
    Silver,
    Barring,
    Columbian,
    Pattern,
    Melanotic,
    Mottling,
    Dilution,
}

impl Locus {
    /// All loci, in the fixed order used by the genotype notation.
    pub const ALL: [Locus; 8] = [
        Locus::BaseColor,
        Locus::Silver,
        Locus::Barring,
        Locus::Columbian,
        Locus::Pattern,
        Locus::Melanotic,
        Locus::Mottling,
        Locus::Dilution,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Locus::BaseColor => "base-color",
            Locus::Silver => "silver",
            Locus::Barring => "barring",
            Locus::Columbian => "columbian",
            Locus::Pattern => "pattern",
            Locus::Melanotic => "melanotic",
            Locus::Mottling => "mottling",
            Locus::Dilution => "dilution",
        }
    }

    /// Whether inheritance at this locus rides on the sex chromosome.
    /// Carried as metadata; the simulator treats every locus as an
    /// independent pair draw.
    pub fn is_sex_linked(&self) -> bool {
        matches!(self, Locus::Silver | Locus::Barring)
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complete genotype: one diploid pair at each of the 8 loci.
///
/// Each pair is typed to its locus, so a pair can never hold alleles from a
/// foreign allele set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genotype {
    pub base_color: AllelePair<BaseColorAllele>,
    pub silver: AllelePair<SilverAllele>,
    pub barring: AllelePair<BarringAllele>,
    pub columbian: AllelePair<ColumbianAllele>,
    pub pattern: AllelePair<PatternAllele>,
    pub melanotic: AllelePair<MelanoticAllele>,
    pub mottling: AllelePair<MottlingAllele>,
    pub dilution: AllelePair<DilutionAllele>,
}

impl Genotype {
    /// The all-recessive-template genotype: partridge base, gold, no
    /// barring, no restriction, no pattern, no melanisation, no mottling,
    /// no dilution.
    pub fn wild_type() -> Self {
        Self {
            base_color: AllelePair::homozygous(BaseColorAllele::Partridge),
            silver: AllelePair::homozygous(SilverAllele::Gold),
            barring: AllelePair::homozygous(BarringAllele::NotBarred),
            columbian: AllelePair::homozygous(ColumbianAllele::NotRestricted),
            pattern: AllelePair::homozygous(PatternAllele::NotPatterned),
            melanotic: AllelePair::homozygous(MelanoticAllele::NotMelanotic),
            mottling: AllelePair::homozygous(MottlingAllele::NotMottled),
            dilution: AllelePair::homozygous(DilutionAllele::NotDiluted),
        }
    }
}

impl fmt::Display for Genotype {
    /// Compact notation: 8 slash pairs in [`Locus::ALL`] order, e.g.
    /// `E/eb S/s b/b co/co pg/pg ml/ml Mo/mo Bl/bl`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {}",
            self.base_color,
            self.silver,
            self.barring,
            self.columbian,
            self.pattern,
            self.melanotic,
            self.mottling,
            self.dilution
        )
    }
}

fn parse_pair<A: Allele>(token: &str, locus: Locus) -> Result<AllelePair<A>> {
    let (a, b) = token.split_once('/').ok_or_else(|| {
        BreedingError::Genotype(format!(
            "Expected an 'x/y' pair at the {} locus, got '{}'",
            locus, token
        ))
    })?;
    let parse_one = |s: &str| {
        A::from_symbol(s.trim()).ok_or_else(|| {
            BreedingError::Genotype(format!(
                "Unknown {} allele symbol '{}'",
                locus, s
            ))
        })
    };
    Ok(AllelePair::new(parse_one(a)?, parse_one(b)?))
}

impl FromStr for Genotype {
    type Err = BreedingError;

    /// Parse the compact notation produced by [`Genotype::fmt`]: exactly 8
    /// whitespace-separated `x/y` tokens in [`Locus::ALL`] order.
    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != 8 {
            return Err(BreedingError::Genotype(format!(
                "Expected 8 locus pairs ({} order), got {}",
                Locus::ALL
                    .iter()
                    .map(Locus::name)
                    .collect::<Vec<_>>()
                    .join(", "),
                tokens.len()
            )));
        }

        Ok(Genotype {
            base_color: parse_pair(tokens[0], Locus::BaseColor)?,
            silver: parse_pair(tokens[1], Locus::Silver)?,
            barring: parse_pair(tokens[2], Locus::Barring)?,
            columbian: parse_pair(tokens[3], Locus::Columbian)?,
            pattern: parse_pair(tokens[4], Locus::Pattern)?,
            melanotic: parse_pair(tokens[5], Locus::Melanotic)?,
            mottling: parse_pair(tokens[6], Locus::Mottling)?,
            dilution: parse_pair(tokens[7], Locus::Dilution)?,
        })
    }
}
