use std::fmt;

use super::genotype::{
    BarringAllele, BaseColorAllele, ColumbianAllele, DilutionAllele, Genotype,
    MelanoticAllele, MottlingAllele, PatternAllele, SilverAllele,
};

/// A plumage shade for one body region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shade {
    Black,
    BlueGray,
    White,
    Silver,
    Gold,
    Buff,
    Wheaten,
    RedBrown,
}

impl Shade {
    /// The silver-family replacement for a gold-family shade. Shades
    /// outside the gold family pass through.
    fn silvered(self) -> Shade {
        match self {
            Shade::Gold | Shade::RedBrown => Shade::Silver,
            Shade::Wheaten => Shade::White,
            other => other,
        }
    }

    /// Blue dilution of black pigment. Shades other than black pass
    /// through.
    fn diluted(self) -> Shade {
        match self {
            Shade::Black => Shade::BlueGray,
            other => other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shade::Black => "black",
            Shade::BlueGray => "blue-gray",
            Shade::White => "white",
            Shade::Silver => "silver",
            Shade::Gold => "gold",
            Shade::Buff => "buff",
            Shade::Wheaten => "wheaten",
            Shade::RedBrown => "red-brown",
        }
    }
}

impl fmt::Display for Shade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Feather marking produced by the pattern/melanotic/barring interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marking {
    None,
    /// Single lacing: a dark rim around each feather.
    Laced { rim: Shade, center: Shade },
    /// Double lacing: two concentric dark rims.
    DoubleLaced { rim: Shade, center: Shade },
    /// Alternating light/dark stripes across every feather.
    Barred,
}

/// Tail carriage; barring shortens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailCarriage {
    Full,
    Short,
}

/// Degree of blue dilution expressed by the dilution locus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DilutionEffect {
    None,
    /// One copy: black regions become blue-grey.
    Blue,
    /// Two copies: white body with blue/black splash speckling.
    Splash,
}

/// Plumage stage derived from age; descriptive only, no colour rule
/// consults it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlumageStage {
    ChickDown,
    Juvenile,
    Adult,
}

impl PlumageStage {
    pub fn from_age_weeks(age_weeks: u32) -> Self {
        match age_weeks {
            0..=7 => PlumageStage::ChickDown,
            8..=19 => PlumageStage::Juvenile,
            _ => PlumageStage::Adult,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlumageStage::ChickDown => "chick down",
            PlumageStage::Juvenile => "juvenile plumage",
            PlumageStage::Adult => "adult plumage",
        }
    }
}

/// The resolved visual description of one bird.
///
/// Built by an ordered rule pipeline; every rule consumes the previous
/// value and returns an updated whole, so intermediate states stay
/// inspectable in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub body: Shade,
    pub hackle: Shade,
    pub tail: Shade,
    pub marking: Marking,
    pub tail_carriage: TailCarriage,
    /// White flecking from homozygous mottling.
    pub flecked: bool,
    pub dilution: DilutionEffect,
    pub stage: PlumageStage,
}

impl Appearance {
    /// Human-readable one-line summary, deterministic for identical input.
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        parts.push(format!("{} body", self.body));
        if self.hackle != self.body {
            parts.push(format!("{} hackle", self.hackle));
        }
        if self.tail != self.body {
            parts.push(format!("{} tail", self.tail));
        }
        match self.marking {
            Marking::None => {}
            Marking::Laced { rim, center } => {
                parts.push(format!("laced ({} rim on {})", rim, center))
            }
            Marking::DoubleLaced { rim, center } => {
                parts.push(format!("double-laced ({} rim on {})", rim, center))
            }
            Marking::Barred => parts.push("barred black/white".to_string()),
        }
        if self.tail_carriage == TailCarriage::Short {
            parts.push("short tail".to_string());
        }
        if self.flecked {
            parts.push("white flecking".to_string());
        }
        match self.dilution {
            DilutionEffect::None => {}
            DilutionEffect::Blue => parts.push("blue-diluted".to_string()),
            DilutionEffect::Splash => {
                parts.push("blue/black splash speckling".to_string())
            }
        }
        format!("{}: {}", self.stage.name(), parts.join(", "))
    }
}

/// Rule 1: the base template selected by the highest-dominance base-colour
/// allele present.
fn base_template(genotype: &Genotype, stage: PlumageStage) -> Appearance {
    let (body, hackle, tail) = match genotype.base_color.dominant() {
        BaseColorAllele::ExtendedBlack => (Shade::Black, Shade::Black, Shade::Black),
        BaseColorAllele::Birchen => (Shade::Black, Shade::Gold, Shade::Black),
        BaseColorAllele::Wheaten => (Shade::Wheaten, Shade::Gold, Shade::Black),
        BaseColorAllele::Partridge => (Shade::RedBrown, Shade::Gold, Shade::Black),
    };
    Appearance {
        body,
        hackle,
        tail,
        marking: Marking::None,
        tail_carriage: TailCarriage::Full,
        flecked: false,
        dilution: DilutionEffect::None,
        stage,
    }
}

/// Rule 2: silver overlay (sex-linked locus). Any silver copy converts
/// gold-family regions to white/silver. On the birchen template silver
/// recolours only the hackle accent, leaving the body.
fn overlay_silver(app: Appearance, genotype: &Genotype) -> Appearance {
    if !genotype.silver.contains(SilverAllele::Silver) {
        return app;
    }
    if genotype.base_color.dominant() == BaseColorAllele::Birchen {
        return Appearance {
            hackle: Shade::Silver,
            ..app
        };
    }
    Appearance {
        body: app.body.silvered(),
        hackle: app.hackle.silvered(),
        tail: app.tail.silvered(),
        ..app
    }
}

/// Rule 3: columbian restriction. Either copy restricts dark pigment to
/// hackle and tail; the body becomes white when silvered, buff otherwise.
fn restrict_columbian(app: Appearance, genotype: &Genotype) -> Appearance {
    if !genotype.columbian.contains(ColumbianAllele::Columbian) {
        return app;
    }
    let body = if genotype.silver.contains(SilverAllele::Silver) {
        Shade::White
    } else {
        Shade::Buff
    };
    Appearance {
        body,
        hackle: Shade::Black,
        tail: Shade::Black,
        ..app
    }
}

/// Rule 4: pattern x melanotic interaction. Copies at the two loci count
/// independently; both present gives lacing, whose form depends on whether
/// columbian restriction is in play. Pattern without melanotic shows
/// nothing.
fn apply_pattern(app: Appearance, genotype: &Genotype) -> Appearance {
    let patterned = genotype.pattern.count_of(PatternAllele::Patterned);
    let melanotic = genotype.melanotic.count_of(MelanoticAllele::Melanotic);
    if patterned == 0 || melanotic == 0 {
        return app;
    }
    let marking = if genotype.columbian.contains(ColumbianAllele::Columbian) {
        Marking::Laced {
            rim: Shade::Black,
            center: app.body,
        }
    } else {
        Marking::DoubleLaced {
            rim: Shade::Black,
            center: app.body,
        }
    };
    Appearance { marking, ..app }
}

/// Rule 5: barring (sex-linked locus). Any copy overrides the marking with
/// black/white stripes and shortens the tail.
fn apply_barring(app: Appearance, genotype: &Genotype) -> Appearance {
    if !genotype.barring.contains(BarringAllele::Barred) {
        return app;
    }
    Appearance {
        marking: Marking::Barred,
        tail_carriage: TailCarriage::Short,
        ..app
    }
}

/// Rule 6: mottling. Only the homozygous recessive genotype flecks the
/// plumage white; one copy is invisible.
fn apply_mottling(app: Appearance, genotype: &Genotype) -> Appearance {
    if genotype.mottling.count_of(MottlingAllele::Mottled) < 2 {
        return app;
    }
    Appearance {
        flecked: true,
        ..app
    }
}

/// Rule 7: blue dilution. One copy turns every black region blue-grey
/// (marking rims included); two copies give a white splash body, which also
/// suppresses rule 6's flecking.
fn apply_dilution(app: Appearance, genotype: &Genotype) -> Appearance {
    match genotype.dilution.count_of(DilutionAllele::Blue) {
        0 => app,
        1 => {
            let marking = match app.marking {
                Marking::Laced { rim, center } => Marking::Laced {
                    rim: rim.diluted(),
                    center: center.diluted(),
                },
                Marking::DoubleLaced { rim, center } => Marking::DoubleLaced {
                    rim: rim.diluted(),
                    center: center.diluted(),
                },
                other => other,
            };
            Appearance {
                body: app.body.diluted(),
                hackle: app.hackle.diluted(),
                tail: app.tail.diluted(),
                marking,
                dilution: DilutionEffect::Blue,
                ..app
            }
        }
        _ => Appearance {
            body: Shade::White,
            flecked: false,
            dilution: DilutionEffect::Splash,
            ..app
        },
    }
}

/// Resolve the visual appearance of a bird from its genotype and age.
///
/// Pure and deterministic: identical inputs always produce an identical
/// [`Appearance`]. The rules run in a fixed, non-commutative order; later
/// rules override or restrict earlier ones, and each rule only touches the
/// fields it owns.
pub fn resolve_appearance(genotype: &Genotype, age_weeks: u32) -> Appearance {
    let stage = PlumageStage::from_age_weeks(age_weeks);
    let app = base_template(genotype, stage);
    let app = overlay_silver(app, genotype);
    let app = restrict_columbian(app, genotype);
    let app = apply_pattern(app, genotype);
    let app = apply_barring(app, genotype);
    let app = apply_mottling(app, genotype);
    apply_dilution(app, genotype)
}
