use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use openroost_core::genetics::{
    resolve_appearance, simulate_clutch, Genotype, InbreedingCalculator,
    LineageScorer, PedigreeNode, PedigreeService,
};
use openroost_core::herd::HerdRegistry;

#[derive(Parser)]
#[command(name = "openroost")]
#[command(version)]
#[command(about = "Pedigree, inbreeding, and plumage-heredity toolkit for poultry breeders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ancestor tree of one bird
    Tree {
        /// Path to herd CSV (columns: id, sire, dam[, sex, hatched])
        #[arg(short = 'H', long)]
        herd: String,

        /// Id of the subject bird
        #[arg(short, long)]
        id: String,

        /// Maximum generations above the subject
        #[arg(short, long, default_value = "4")]
        generations: u32,
    },

    /// Compute the inbreeding coefficient of one bird
    Inbreeding {
        /// Path to herd CSV
        #[arg(short = 'H', long)]
        herd: String,

        /// Id of the subject bird
        #[arg(short, long)]
        id: String,

        /// Ancestor search depth
        #[arg(short, long, default_value = "6")]
        depth: u32,
    },

    /// Analyse a prospective mating for relatedness risk
    Pairing {
        /// Path to herd CSV
        #[arg(short = 'H', long)]
        herd: String,

        /// Id of the candidate sire
        #[arg(short, long)]
        sire: String,

        /// Id of the candidate dam
        #[arg(short, long)]
        dam: String,

        /// Ancestor search depth
        #[arg(long, default_value = "5")]
        depth: u32,
    },

    /// Rate how fully a bird's ancestry is documented
    Score {
        /// Path to herd CSV
        #[arg(short = 'H', long)]
        herd: String,

        /// Id of the subject bird
        #[arg(short, long)]
        id: String,

        /// Generations the rating covers
        #[arg(short, long, default_value = "3")]
        generations: u32,
    },

    /// Simulate a clutch from two parent genotypes
    Mate {
        /// Sire genotype, e.g. "E/eb S/s B/b Co/co Pg/pg Ml/ml Mo/mo Bl/bl"
        #[arg(short, long)]
        sire: String,

        /// Dam genotype, same notation
        #[arg(short, long)]
        dam: String,

        /// Number of chicks to simulate
        #[arg(short, long, default_value = "6")]
        count: usize,

        /// Seed for reproducible previews
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Id prefix for the simulated chicks
        #[arg(long, default_value = "chick")]
        prefix: String,
    },

    /// Resolve the visual appearance of one genotype
    Appearance {
        /// Genotype in the same notation as `mate`
        #[arg(short, long)]
        genotype: String,

        /// Age in weeks (selects down/juvenile/adult plumage)
        #[arg(short, long, default_value = "30")]
        age_weeks: u32,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Tree {
            herd,
            id,
            generations,
        } => cmd_tree(&herd, &id, generations),
        Commands::Inbreeding { herd, id, depth } => {
            cmd_inbreeding(&herd, &id, depth)
        }
        Commands::Pairing {
            herd,
            sire,
            dam,
            depth,
        } => cmd_pairing(&herd, &sire, &dam, depth),
        Commands::Score {
            herd,
            id,
            generations,
        } => cmd_score(&herd, &id, generations),
        Commands::Mate {
            sire,
            dam,
            count,
            seed,
            prefix,
        } => cmd_mate(&sire, &dam, count, seed, &prefix),
        Commands::Appearance {
            genotype,
            age_weeks,
        } => cmd_appearance(&genotype, age_weeks),
    }
}

fn load_herd(path: &str) -> Result<HerdRegistry> {
    let herd = HerdRegistry::from_csv(path)
        .with_context(|| format!("Failed to load herd from '{}'", path))?;
    herd.validate()
        .with_context(|| format!("Herd '{}' failed validation", path))?;
    eprintln!("Loaded {} birds from '{}'", herd.len(), path);
    Ok(herd)
}

fn cmd_tree(herd_path: &str, id: &str, generations: u32) -> Result<()> {
    let herd = load_herd(herd_path)?;
    let service = PedigreeService::new(&herd);

    let tree = service
        .build_tree(id, generations)?
        .ok_or_else(|| anyhow!("No bird with id '{}' in the herd", id))?;

    print_node(&tree, "", "");
    println!("\n{} known relatives within {} generations", tree.count(), generations);
    Ok(())
}

fn print_node(node: &PedigreeNode, label: &str, indent: &str) {
    let sex = match node.individual.sex {
        Some(s) => format!(" ({:?})", s).to_lowercase(),
        None => String::new(),
    };
    println!("{}{}{}{}", indent, label, node.individual.id, sex);

    let child_indent = format!("{}   ", indent);
    if let Some(sire) = &node.sire {
        print_node(sire, "sire: ", &child_indent);
    }
    if let Some(dam) = &node.dam {
        print_node(dam, "dam:  ", &child_indent);
    }
}

fn cmd_inbreeding(herd_path: &str, id: &str, depth: u32) -> Result<()> {
    let herd = load_herd(herd_path)?;
    let calc = InbreedingCalculator::new(&herd);

    let f = calc.coefficient(id, depth)?;
    println!("Inbreeding coefficient of '{}': {:.4} ({:.2}%)", id, f, f * 100.0);
    Ok(())
}

fn cmd_pairing(herd_path: &str, sire: &str, dam: &str, depth: u32) -> Result<()> {
    let herd = load_herd(herd_path)?;
    let calc = InbreedingCalculator::new(&herd);

    let analysis = calc.pairing_analysis(sire, dam, depth)?;
    println!("=== Pairing analysis: {} x {} ===", sire, dam);
    println!("Coefficient:      {:.4}", analysis.coefficient);
    println!("Shared ancestors: {}", analysis.shared_ancestors);
    println!("Risk:             {}", analysis.risk);
    println!("{}", analysis.message);
    Ok(())
}

fn cmd_score(herd_path: &str, id: &str, generations: u32) -> Result<()> {
    let herd = load_herd(herd_path)?;
    let scorer = LineageScorer::new(&herd);

    let score = scorer.score(id, generations)?;
    println!("=== Lineage completeness: {} ===", id);
    println!(
        "Documented ancestors:  {} of {}",
        score.known_ancestors, score.max_possible_ancestors
    );
    println!("Completeness:          {}%", score.completeness_percent);
    println!("Complete generations:  {}", score.generations_complete);
    println!("{}", score.recommendation);
    Ok(())
}

fn cmd_mate(
    sire: &str,
    dam: &str,
    count: usize,
    seed: u64,
    prefix: &str,
) -> Result<()> {
    let sire: Genotype = sire
        .parse()
        .context("Failed to parse the sire genotype")?;
    let dam: Genotype = dam.parse().context("Failed to parse the dam genotype")?;

    println!("=== Simulated clutch (seed {}) ===", seed);
    for chick in simulate_clutch(&sire, &dam, prefix, count, seed) {
        let appearance = resolve_appearance(&chick.genotype, 30);
        println!("{:<10} {}", chick.id, chick.genotype);
        println!("{:<10}   {}", "", appearance.describe());
    }
    Ok(())
}

fn cmd_appearance(genotype: &str, age_weeks: u32) -> Result<()> {
    let genotype: Genotype =
        genotype.parse().context("Failed to parse the genotype")?;
    let appearance = resolve_appearance(&genotype, age_weeks);
    println!("{}", appearance.describe());
    Ok(())
}
