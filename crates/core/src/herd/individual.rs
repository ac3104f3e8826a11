use chrono::NaiveDate;

/// Biological sex of an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Parse a sex value from registry input. Accepts `m`/`male` and
    /// `f`/`female` in any case; anything else is unknown.
    pub fn parse(s: &str) -> Option<Sex> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Some(Sex::Male),
            "f" | "female" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// A single bird in the herd: identity plus optional sex, parent links, and
/// hatch date.
///
/// Individuals are owned by the surrounding application (its storage layer);
/// this crate only reads them. Parent links are plain ids and are not
/// guaranteed to resolve: an unknown parent is a normal terminal case for
/// every traversal, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    pub id: String,
    pub sex: Option<Sex>,
    pub sire_id: Option<String>,
    pub dam_id: Option<String>,
    pub hatched: Option<NaiveDate>,
}

impl Individual {
    /// A founder: no recorded parents.
    pub fn founder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sex: None,
            sire_id: None,
            dam_id: None,
            hatched: None,
        }
    }

    /// An individual with the given parent links.
    pub fn with_parents(
        id: impl Into<String>,
        sire_id: Option<&str>,
        dam_id: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            sex: None,
            sire_id: sire_id.map(str::to_string),
            dam_id: dam_id.map(str::to_string),
            hatched: None,
        }
    }

    /// Builder-style sex assignment.
    pub fn sexed(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    /// Builder-style hatch date assignment.
    pub fn hatched_on(mut self, date: NaiveDate) -> Self {
        self.hatched = Some(date);
        self
    }

    /// Age in whole weeks on the given date, if the hatch date is recorded
    /// and not in the future.
    pub fn age_weeks_on(&self, date: NaiveDate) -> Option<u32> {
        let hatched = self.hatched?;
        let days = (date - hatched).num_days();
        if days < 0 {
            return None;
        }
        Some((days / 7) as u32)
    }
}

/// The lookup contract this core consumes. Implemented by the application's
/// storage layer; an in-memory implementation lives in
/// [`crate::herd::HerdRegistry`].
///
/// Both methods are total: a missing id yields `None` or an empty list,
/// never an error.
pub trait IndividualStore {
    /// Fetch one individual by id, or `None` if unknown.
    fn individual(&self, id: &str) -> Option<Individual>;

    /// All individuals whose sire id or dam id equals `id`. Empty if none.
    fn offspring_of(&self, id: &str) -> Vec<Individual>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_parse_variants() {
        assert_eq!(Sex::parse("m"), Some(Sex::Male));
        assert_eq!(Sex::parse("Male"), Some(Sex::Male));
        assert_eq!(Sex::parse(" F "), Some(Sex::Female));
        assert_eq!(Sex::parse("female"), Some(Sex::Female));
        assert_eq!(Sex::parse("hen"), None);
        assert_eq!(Sex::parse(""), None);
    }

    #[test]
    fn test_founder_has_no_links() {
        let bird = Individual::founder("RIR-001");
        assert_eq!(bird.id, "RIR-001");
        assert!(bird.sire_id.is_none());
        assert!(bird.dam_id.is_none());
        assert!(bird.sex.is_none());
    }

    #[test]
    fn test_age_weeks() {
        let hatched = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bird = Individual::founder("X").hatched_on(hatched);

        let on = NaiveDate::from_ymd_opt(2024, 4, 26).unwrap();
        assert_eq!(bird.age_weeks_on(on), Some(8));

        // Before hatch: no age.
        let early = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(bird.age_weeks_on(early), None);

        // No hatch date recorded.
        assert_eq!(Individual::founder("Y").age_weeks_on(on), None);
    }
}
