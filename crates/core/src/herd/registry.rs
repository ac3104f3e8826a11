use std::path::Path;

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::error::{BreedingError, Result};

use super::individual::{Individual, IndividualStore, Sex};

/// In-memory herd registry, the reference [`IndividualStore`] implementation
/// used by tests and the CLI.
///
/// Records keep insertion order. Parent links are stored as entered; a link
/// to an id that was never registered simply resolves to an unknown ancestor
/// during traversal. Call [`HerdRegistry::validate`] after building to check
/// the link structure for corruption (self-parenting, cycles).
#[derive(Debug, Clone, Default)]
pub struct HerdRegistry {
    records: IndexMap<String, Individual>,
}

impl HerdRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }

    /// Number of registered individuals.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate registered individuals in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.records.values()
    }

    /// Register an individual.
    ///
    /// Parents do not have to be registered first, or at all.
    ///
    /// # Errors
    /// Returns an error if the id is already registered.
    pub fn add(&mut self, individual: Individual) -> Result<()> {
        if self.records.contains_key(&individual.id) {
            return Err(BreedingError::Herd(format!(
                "Duplicate individual id: '{}'",
                individual.id
            )));
        }
        self.records.insert(individual.id.clone(), individual);
        Ok(())
    }

    /// Read a registry from a CSV file.
    ///
    /// Required columns (header required): `id`, `sire`, `dam`. Optional
    /// columns: `sex` (`m`/`f`), `hatched` (ISO date, `YYYY-MM-DD`).
    /// Unknown parents are coded as `"0"`, `""`, or `"NA"`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, required columns are
    /// missing, a date fails to parse, or duplicate ids are found.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        let col = |name: &str| headers.iter().position(|h| h == name);

        let id_col = col("id").ok_or_else(|| {
            BreedingError::Herd("CSV missing 'id' column".to_string())
        })?;
        let sire_col = col("sire").ok_or_else(|| {
            BreedingError::Herd("CSV missing 'sire' column".to_string())
        })?;
        let dam_col = col("dam").ok_or_else(|| {
            BreedingError::Herd("CSV missing 'dam' column".to_string())
        })?;
        let sex_col = col("sex");
        let hatched_col = col("hatched");

        let mut registry = Self::new();

        for result in reader.records() {
            let record = result?;

            let field = |idx: usize| {
                record.get(idx).ok_or_else(|| {
                    BreedingError::Herd("Short row in registry CSV".to_string())
                })
            };

            let id = field(id_col)?.to_string();
            if id.is_empty() {
                return Err(BreedingError::Herd(
                    "Empty id in registry CSV".to_string(),
                ));
            }

            let sire_id = parse_parent(field(sire_col)?);
            let dam_id = parse_parent(field(dam_col)?);

            let sex = match sex_col {
                Some(c) => Sex::parse(field(c)?),
                None => None,
            };

            let hatched = match hatched_col {
                Some(c) => parse_hatched(field(c)?)?,
                None => None,
            };

            registry.add(Individual {
                id,
                sex,
                sire_id,
                dam_id,
                hatched,
            })?;
        }

        Ok(registry)
    }

    /// Validate the link structure for corruption.
    ///
    /// Checks:
    /// - No individual is its own sire or dam.
    /// - No individual is its own transitive ancestor (cycle detection via
    ///   Kahn's algorithm over parent -> offspring edges).
    ///
    /// Links to unregistered ids are allowed: an undocumented parent is
    /// normal, not corruption.
    ///
    /// # Errors
    /// Returns an error describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        for bird in self.records.values() {
            if bird.sire_id.as_deref() == Some(bird.id.as_str()) {
                return Err(BreedingError::Herd(format!(
                    "Individual '{}' is listed as its own sire",
                    bird.id
                )));
            }
            if bird.dam_id.as_deref() == Some(bird.id.as_str()) {
                return Err(BreedingError::Herd(format!(
                    "Individual '{}' is listed as its own dam",
                    bird.id
                )));
            }
        }

        // Cycle detection. Direction: parent -> offspring. If we cannot
        // process all registered nodes, a cycle exists. Links to
        // unregistered parents contribute no edges.
        let n = self.records.len();
        let index_of = |id: &str| self.records.get_index_of(id);

        let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_degree = vec![0u32; n];

        for (i, bird) in self.records.values().enumerate() {
            for parent in [&bird.sire_id, &bird.dam_id].into_iter().flatten() {
                if let Some(p) = index_of(parent) {
                    children_of[p].push(i);
                    in_degree[i] += 1;
                }
            }
        }

        let mut queue: Vec<usize> =
            (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut visited = 0usize;

        while let Some(node) = queue.pop() {
            visited += 1;
            for &child in &children_of[node] {
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    queue.push(child);
                }
            }
        }

        if visited != n {
            return Err(BreedingError::Herd(
                "Herd registry contains a parent-link cycle".to_string(),
            ));
        }

        Ok(())
    }
}

impl IndividualStore for HerdRegistry {
    fn individual(&self, id: &str) -> Option<Individual> {
        self.records.get(id).cloned()
    }

    fn offspring_of(&self, id: &str) -> Vec<Individual> {
        self.records
            .values()
            .filter(|bird| {
                bird.sire_id.as_deref() == Some(id)
                    || bird.dam_id.as_deref() == Some(id)
            })
            .cloned()
            .collect()
    }
}

/// Parse a parent field, returning `None` for unknown parents.
///
/// Unknown parents are coded as `"0"`, `""`, `"NA"`, or `"na"`.
fn parse_parent(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "0" || trimmed.eq_ignore_ascii_case("na") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an optional hatch date field (ISO `YYYY-MM-DD`; empty means none).
fn parse_hatched(s: &str) -> Result<Option<NaiveDate>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| {
            BreedingError::Herd(format!("Bad hatch date '{}': {}", trimmed, e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    /// Helper: write CSV content to a temporary file and return the path.
    fn write_temp_csv(content: &str) -> String {
        let dir = std::env::temp_dir();
        let id = COUNTER.fetch_add(1, Ordering::Relaxed);
        let file_name = format!("test_registry_{}_{}.csv", std::process::id(), id);
        let path = dir.join(file_name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_add_and_lookup() {
        let mut herd = HerdRegistry::new();
        herd.add(Individual::founder("S1")).unwrap();
        herd.add(Individual::founder("D1")).unwrap();
        herd.add(Individual::with_parents("O1", Some("S1"), Some("D1")))
            .unwrap();

        assert_eq!(herd.len(), 3);
        let o1 = herd.individual("O1").unwrap();
        assert_eq!(o1.sire_id.as_deref(), Some("S1"));
        assert_eq!(o1.dam_id.as_deref(), Some("D1"));
        assert!(herd.individual("missing").is_none());
    }

    #[test]
    fn test_add_duplicate_errors() {
        let mut herd = HerdRegistry::new();
        herd.add(Individual::founder("A")).unwrap();
        let result = herd.add(Individual::founder("A"));
        assert!(result.is_err());
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("Duplicate"), "Error was: {}", msg);
    }

    #[test]
    fn test_offspring_lookup() {
        let mut herd = HerdRegistry::new();
        herd.add(Individual::founder("S1")).unwrap();
        herd.add(Individual::founder("D1")).unwrap();
        herd.add(Individual::with_parents("O1", Some("S1"), Some("D1")))
            .unwrap();
        herd.add(Individual::with_parents("O2", Some("S1"), None))
            .unwrap();

        let of_sire = herd.offspring_of("S1");
        assert_eq!(of_sire.len(), 2);
        let of_dam = herd.offspring_of("D1");
        assert_eq!(of_dam.len(), 1);
        assert_eq!(of_dam[0].id, "O1");
        assert!(herd.offspring_of("O2").is_empty());
    }

    #[test]
    fn test_from_csv_basic() {
        let csv = "id,sire,dam\n1,0,0\n2,0,0\n3,1,2\n";
        let path = write_temp_csv(csv);
        let herd = HerdRegistry::from_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(herd.len(), 3);
        let three = herd.individual("3").unwrap();
        assert_eq!(three.sire_id.as_deref(), Some("1"));
        assert_eq!(three.dam_id.as_deref(), Some("2"));
        assert!(herd.individual("1").unwrap().sire_id.is_none());
    }

    #[test]
    fn test_from_csv_optional_columns() {
        let csv = "id,sire,dam,sex,hatched\n\
                   A,NA,NA,m,2023-05-14\n\
                   B,NA,NA,f,\n\
                   C,A,B,,2024-02-01\n";
        let path = write_temp_csv(csv);
        let herd = HerdRegistry::from_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let a = herd.individual("A").unwrap();
        assert_eq!(a.sex, Some(Sex::Male));
        assert_eq!(
            a.hatched,
            Some(NaiveDate::from_ymd_opt(2023, 5, 14).unwrap())
        );

        let b = herd.individual("B").unwrap();
        assert_eq!(b.sex, Some(Sex::Female));
        assert!(b.hatched.is_none());

        let c = herd.individual("C").unwrap();
        assert!(c.sex.is_none());
        assert_eq!(c.sire_id.as_deref(), Some("A"));
    }

    #[test]
    fn test_from_csv_bad_date_errors() {
        let csv = "id,sire,dam,hatched\nA,0,0,last-spring\n";
        let path = write_temp_csv(csv);
        let result = HerdRegistry::from_csv(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_csv_missing_column_errors() {
        let csv = "id,father,mother\nA,0,0\n";
        let path = write_temp_csv(csv);
        let result = HerdRegistry::from_csv(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_ok_with_unregistered_parents() {
        let mut herd = HerdRegistry::new();
        herd.add(Individual::with_parents("A", Some("ghost"), None))
            .unwrap();
        assert!(herd.validate().is_ok());
    }

    #[test]
    fn test_validate_detects_self_parent() {
        let mut herd = HerdRegistry::new();
        herd.add(Individual::with_parents("A", Some("A"), None))
            .unwrap();
        let result = herd.validate();
        assert!(result.is_err());
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("own sire"), "Error was: {}", msg);
    }

    #[test]
    fn test_validate_detects_cycle() {
        let mut herd = HerdRegistry::new();
        herd.add(Individual::with_parents("A", Some("B"), None))
            .unwrap();
        herd.add(Individual::with_parents("B", Some("A"), None))
            .unwrap();
        let result = herd.validate();
        assert!(result.is_err());
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("cycle"), "Error was: {}", msg);
    }

    #[test]
    fn test_parse_parent_variants() {
        assert_eq!(parse_parent("0"), None);
        assert_eq!(parse_parent(""), None);
        assert_eq!(parse_parent("  "), None);
        assert_eq!(parse_parent("NA"), None);
        assert_eq!(parse_parent("na"), None);
        assert_eq!(parse_parent("RIR-12"), Some("RIR-12".to_string()));
    }
}
