use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{BreedingError, Result};
use crate::herd::{Individual, IndividualStore};

/// Cooperative cancellation signal for long traversals.
///
/// Cheap to clone; all clones share the flag. Traversals check it between
/// recursive levels and abandon the walk with [`BreedingError::Cancelled`];
/// partial results are discarded, never returned.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One node of a bounded-depth pedigree tree.
///
/// Generation 0 is the subject; each subtree's generation is its child's
/// generation plus one. A node has no subtrees once the depth bound is
/// reached or the respective parent is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PedigreeNode {
    pub individual: Individual,
    pub generation: u32,
    pub sire: Option<Box<PedigreeNode>>,
    pub dam: Option<Box<PedigreeNode>>,
}

impl PedigreeNode {
    /// Total number of nodes in this subtree, subject included.
    pub fn count(&self) -> usize {
        1 + self.sire.as_ref().map_or(0, |n| n.count())
            + self.dam.as_ref().map_or(0, |n| n.count())
    }
}

/// Recursive pedigree views over an injected [`IndividualStore`].
///
/// Every walk is bounded by a caller-supplied generation limit and guarded
/// against malformed cyclic parent links; an unknown ancestor is a normal
/// terminal, not an error.
pub struct PedigreeService<'a> {
    store: &'a dyn IndividualStore,
    cancel: CancelToken,
}

impl<'a> PedigreeService<'a> {
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

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(BreedingError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Build the ancestor tree for `id`, up to `max_generations` above the
    /// subject. Returns `Ok(None)` if the root individual is unknown.
    ///
    /// Ancestors shared between the sire and dam lines appear in both
    /// subtrees (a tree view duplicates on purpose); a cycle along a single
    /// line of descent is cut at the repeated id.
    pub fn build_tree(
        &self,
        id: &str,
        max_generations: u32,
    ) -> Result<Option<PedigreeNode>> {
        let Some(root) = self.store.individual(id) else {
            return Ok(None);
        };
        let mut path = HashSet::new();
        self.build_node(root, 0, max_generations, &mut path)
            .map(Some)
    }

    fn build_node(
        &self,
        individual: Individual,
        generation: u32,
        max_generations: u32,
        path: &mut HashSet<String>,
    ) -> Result<PedigreeNode> {
        self.check_cancelled()?;

        let mut node = PedigreeNode {
            individual,
            generation,
            sire: None,
            dam: None,
        };
        if generation >= max_generations {
            return Ok(node);
        }

        // Ids on the current line of descent; a parent already present
        // means the data is cyclic and that branch is cut.
        path.insert(node.individual.id.clone());

        node.sire = self.build_parent(
            node.individual.sire_id.as_deref(),
            generation,
            max_generations,
            path,
        )?;
        node.dam = self.build_parent(
            node.individual.dam_id.as_deref(),
            generation,
            max_generations,
            path,
        )?;

        path.remove(&node.individual.id);
        Ok(node)
    }

    fn build_parent(
        &self,
        parent_id: Option<&str>,
        generation: u32,
        max_generations: u32,
        path: &mut HashSet<String>,
    ) -> Result<Option<Box<PedigreeNode>>> {
        let Some(parent_id) = parent_id else {
            return Ok(None);
        };
        if path.contains(parent_id) {
            log::warn!(
                "Cyclic parent link at '{}'; cutting the pedigree branch",
                parent_id
            );
            return Ok(None);
        }
        let Some(parent) = self.store.individual(parent_id) else {
            return Ok(None);
        };
        let node =
            self.build_node(parent, generation + 1, max_generations, path)?;
        Ok(Some(Box::new(node)))
    }

    /// Collect all known ancestors of `id` within `max_generations`,
    /// depth-first, with 1-based generation distances (parents = 1).
    ///
    /// The visited set is seeded with the subject before recursion begins,
    /// so no id (the subject included) ever appears twice in one walk,
    /// which also terminates malformed cyclic data.
    pub fn collect_ancestors(
        &self,
        id: &str,
        max_generations: u32,
    ) -> Result<Vec<(Individual, u32)>> {
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(id.to_string());
        let mut out = Vec::new();

        if let Some(root) = self.store.individual(id) {
            self.walk_ancestors(&root, 1, max_generations, &mut visited, &mut out)?;
        }
        Ok(out)
    }

    fn walk_ancestors(
        &self,
        individual: &Individual,
        distance: u32,
        max_generations: u32,
        visited: &mut HashSet<String>,
        out: &mut Vec<(Individual, u32)>,
    ) -> Result<()> {
        self.check_cancelled()?;
        if distance > max_generations {
            return Ok(());
        }

        for parent_id in [
            individual.sire_id.as_deref(),
            individual.dam_id.as_deref(),
        ]
        .into_iter()
        .flatten()
        {
            if !visited.insert(parent_id.to_string()) {
                continue;
            }
            let Some(parent) = self.store.individual(parent_id) else {
                continue;
            };
            self.walk_ancestors(&parent, distance + 1, max_generations, visited, out)?;
            out.push((parent, distance));
        }
        Ok(())
    }

    /// Collect all known descendants of `id` within `max_generations`,
    /// using the store's reverse offspring index. Mirrors
    /// [`PedigreeService::collect_ancestors`]: 1-based distances, one entry
    /// per id, cycle-safe.
    pub fn collect_descendants(
        &self,
        id: &str,
        max_generations: u32,
    ) -> Result<Vec<(Individual, u32)>> {
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(id.to_string());
        let mut out = Vec::new();
        self.walk_descendants(id, 1, max_generations, &mut visited, &mut out)?;
        Ok(out)
    }

    fn walk_descendants(
        &self,
        id: &str,
        distance: u32,
        max_generations: u32,
        visited: &mut HashSet<String>,
        out: &mut Vec<(Individual, u32)>,
    ) -> Result<()> {
        self.check_cancelled()?;
        if distance > max_generations {
            return Ok(());
        }

        for child in self.store.offspring_of(id) {
            if !visited.insert(child.id.clone()) {
                continue;
            }
            self.walk_descendants(
                &child.id,
                distance + 1,
                max_generations,
                visited,
                out,
            )?;
            out.push((child, distance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::herd::HerdRegistry;

    /// Three-generation herd:
    ///
    ///   GS x GD -> S
    ///   S  x D  -> C1, C2
    fn sample_herd() -> HerdRegistry {
        let mut herd = HerdRegistry::new();
        herd.add(Individual::founder("GS")).unwrap();
        herd.add(Individual::founder("GD")).unwrap();
        herd.add(Individual::with_parents("S", Some("GS"), Some("GD")))
            .unwrap();
        herd.add(Individual::founder("D")).unwrap();
        herd.add(Individual::with_parents("C1", Some("S"), Some("D")))
            .unwrap();
        herd.add(Individual::with_parents("C2", Some("S"), Some("D")))
            .unwrap();
        herd
    }

    #[test]
    fn test_build_tree_unknown_root() {
        let herd = sample_herd();
        let service = PedigreeService::new(&herd);
        assert_eq!(service.build_tree("nobody", 3).unwrap(), None);
    }

    #[test]
    fn test_build_tree_generations() {
        let herd = sample_herd();
        let service = PedigreeService::new(&herd);

        let tree = service.build_tree("C1", 3).unwrap().unwrap();
        assert_eq!(tree.generation, 0);
        assert_eq!(tree.individual.id, "C1");

        let sire = tree.sire.as_ref().unwrap();
        assert_eq!(sire.individual.id, "S");
        assert_eq!(sire.generation, 1);

        let grandsire = sire.sire.as_ref().unwrap();
        assert_eq!(grandsire.individual.id, "GS");
        assert_eq!(grandsire.generation, 2);
        assert!(grandsire.sire.is_none());

        // D is a founder: dam subtree stops immediately.
        let dam = tree.dam.as_ref().unwrap();
        assert!(dam.sire.is_none());
        assert!(dam.dam.is_none());

        // 5 known relatives: C1, S, D, GS, GD.
        assert_eq!(tree.count(), 5);
    }

    #[test]
    fn test_build_tree_depth_bound() {
        let herd = sample_herd();
        let service = PedigreeService::new(&herd);

        let tree = service.build_tree("C1", 1).unwrap().unwrap();
        let sire = tree.sire.as_ref().unwrap();
        // Depth 1: parents are present but carry no subtrees.
        assert!(sire.sire.is_none());
        assert!(sire.dam.is_none());

        let stub = service.build_tree("C1", 0).unwrap().unwrap();
        assert!(stub.sire.is_none());
        assert!(stub.dam.is_none());
    }

    #[test]
    fn test_build_tree_duplicates_shared_ancestors_across_lines() {
        // Full siblings mated: their offspring's tree shows S and D on
        // both the sire and dam side.
        let mut herd = sample_herd();
        herd.add(Individual::with_parents("X", Some("C1"), Some("C2")))
            .unwrap();
        let service = PedigreeService::new(&herd);

        let tree = service.build_tree("X", 2).unwrap().unwrap();
        let via_sire = tree.sire.as_ref().unwrap().sire.as_ref().unwrap();
        let via_dam = tree.dam.as_ref().unwrap().sire.as_ref().unwrap();
        assert_eq!(via_sire.individual.id, "S");
        assert_eq!(via_dam.individual.id, "S");
    }

    #[test]
    fn test_build_tree_cuts_cycles() {
        let mut herd = HerdRegistry::new();
        herd.add(Individual::with_parents("A", Some("B"), None))
            .unwrap();
        herd.add(Individual::with_parents("B", Some("A"), None))
            .unwrap();
        let service = PedigreeService::new(&herd);

        let tree = service.build_tree("A", 10).unwrap().unwrap();
        let sire = tree.sire.as_ref().unwrap();
        assert_eq!(sire.individual.id, "B");
        // The walk terminates instead of looping: B's sire link back to A
        // is cut.
        assert!(sire.sire.is_none());
    }

    #[test]
    fn test_collect_ancestors_distances() {
        let herd = sample_herd();
        let service = PedigreeService::new(&herd);

        let ancestors = service.collect_ancestors("C1", 5).unwrap();
        let mut by_id: Vec<(String, u32)> = ancestors
            .iter()
            .map(|(ind, d)| (ind.id.clone(), *d))
            .collect();
        by_id.sort();
        assert_eq!(
            by_id,
            vec![
                ("D".to_string(), 1),
                ("GD".to_string(), 2),
                ("GS".to_string(), 2),
                ("S".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_collect_ancestors_depth_bound() {
        let herd = sample_herd();
        let service = PedigreeService::new(&herd);

        let ancestors = service.collect_ancestors("C1", 1).unwrap();
        assert_eq!(ancestors.len(), 2);
        assert!(ancestors.iter().all(|(_, d)| *d == 1));
    }

    #[test]
    fn test_collect_ancestors_never_repeats_an_id() {
        // C1 x C2 offspring: S and D reachable down both lines, reported once.
        let mut herd = sample_herd();
        herd.add(Individual::with_parents("X", Some("C1"), Some("C2")))
            .unwrap();
        let service = PedigreeService::new(&herd);

        let ancestors = service.collect_ancestors("X", 6).unwrap();
        let mut ids: Vec<&str> =
            ancestors.iter().map(|(ind, _)| ind.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["C1", "C2", "D", "GD", "GS", "S"]);
    }

    #[test]
    fn test_collect_ancestors_on_cyclic_data_terminates() {
        let mut herd = HerdRegistry::new();
        herd.add(Individual::with_parents("A", Some("B"), None))
            .unwrap();
        herd.add(Individual::with_parents("B", Some("A"), None))
            .unwrap();
        let service = PedigreeService::new(&herd);

        let ancestors = service.collect_ancestors("A", 50).unwrap();
        assert_eq!(ancestors.len(), 1);
        assert_eq!(ancestors[0].0.id, "B");
    }

    #[test]
    fn test_collect_descendants() {
        let herd = sample_herd();
        let service = PedigreeService::new(&herd);

        let descendants = service.collect_descendants("GS", 5).unwrap();
        let mut by_id: Vec<(String, u32)> = descendants
            .iter()
            .map(|(ind, d)| (ind.id.clone(), *d))
            .collect();
        by_id.sort();
        assert_eq!(
            by_id,
            vec![
                ("C1".to_string(), 2),
                ("C2".to_string(), 2),
                ("S".to_string(), 1),
            ]
        );

        assert!(service.collect_descendants("C1", 5).unwrap().is_empty());
    }

    #[test]
    fn test_collect_descendants_depth_bound() {
        let herd = sample_herd();
        let service = PedigreeService::new(&herd);
        let descendants = service.collect_descendants("GS", 1).unwrap();
        assert_eq!(descendants.len(), 1);
        assert_eq!(descendants[0].0.id, "S");
    }

    #[test]
    fn test_cancellation_discards_walk() {
        let herd = sample_herd();
        let token = CancelToken::new();
        let service =
            PedigreeService::new(&herd).with_cancel_token(token.clone());

        token.cancel();
        assert!(matches!(
            service.build_tree("C1", 3),
            Err(BreedingError::Cancelled)
        ));
        assert!(matches!(
            service.collect_ancestors("C1", 3),
            Err(BreedingError::Cancelled)
        ));
        assert!(matches!(
            service.collect_descendants("GS", 3),
            Err(BreedingError::Cancelled)
        ));
    }
}
