use super::atom::Atom;
use super::ids::AtomId;
use crate::core::utils::geometry::is_same_site;
use itertools::Itertools;
use nalgebra::Point3;
use slotmap::SlotMap;
use std::collections::BTreeMap;

/// Append-only arena owning the atoms of one orbit expansion.
///
/// Atoms are addressed by [`AtomId`] and iterated in insertion order. The order itself
/// carries no meaning beyond determinism; compare sets with
/// [`is_equivalent_to`](Self::is_equivalent_to).
#[derive(Debug, Clone, Default)]
pub struct AtomSet {
    atoms: SlotMap<AtomId, Atom>,
    order: Vec<AtomId>,
}

impl AtomSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, atom: Atom) -> AtomId {
        let id = self.atoms.insert(atom);
        self.order.push(id);
        id
    }

    pub fn get(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = AtomId> + '_ {
        self.order.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Atom> + Clone + '_ {
        self.order.iter().filter_map(|&id| self.atoms.get(id))
    }

    /// All unordered pairs of distinct atoms.
    pub fn pairs(&self) -> impl Iterator<Item = (&Atom, &Atom)> + '_ {
        self.iter().tuple_combinations()
    }

    pub fn count_for_site(&self, site: &str) -> usize {
        self.iter().filter(|atom| atom.site == site).count()
    }

    /// Atoms grouped by site name, each group in insertion order.
    pub fn by_site(&self) -> BTreeMap<&str, Vec<&Atom>> {
        let mut groups: BTreeMap<&str, Vec<&Atom>> = BTreeMap::new();
        for atom in self.iter() {
            groups.entry(atom.site.as_str()).or_default().push(atom);
        }
        groups
    }

    /// True if some atom already occupies `position` under the periodic metric.
    pub fn occupies(&self, position: &Point3<f64>) -> bool {
        self.iter()
            .any(|atom| is_same_site(&atom.position, position))
    }

    /// Set equality under periodic-distance matching of same-site atoms.
    pub fn is_equivalent_to(&self, other: &AtomSet) -> bool {
        let covers = |a: &AtomSet, b: &AtomSet| {
            a.iter().all(|atom| {
                b.iter().any(|candidate| {
                    candidate.site == atom.site && is_same_site(&candidate.position, &atom.position)
                })
            })
        };
        self.len() == other.len() && covers(self, other) && covers(other, self)
    }
}

impl FromIterator<Atom> for AtomSet {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        let mut set = Self::new();
        for atom in iter {
            set.insert(atom);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> AtomSet {
        [
            Atom::new("b", Point3::new(0.5, 0.5, 0.5)),
            Atom::new("e", Point3::new(0.1, 0.1, 0.1)),
            Atom::new("e", Point3::new(0.9, 0.9, 0.9)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn insert_assigns_ids_and_preserves_order() {
        let mut set = AtomSet::new();
        let first = set.insert(Atom::new("b", Point3::new(0.0, 0.0, 0.0)));
        let second = set.insert(Atom::new("c", Point3::new(0.5, 0.0, 0.0)));

        assert_eq!(set.len(), 2);
        assert_eq!(set.ids().collect::<Vec<_>>(), vec![first, second]);
        assert_eq!(set.get(second).unwrap().site, "c");
    }

    #[test]
    fn pairs_enumerates_each_unordered_pair_once() {
        let set = sample_set();
        assert_eq!(set.pairs().count(), 3);
        assert!(AtomSet::new().pairs().next().is_none());
    }

    #[test]
    fn grouping_and_counting_by_site() {
        let set = sample_set();
        assert_eq!(set.count_for_site("e"), 2);
        assert_eq!(set.count_for_site("c"), 0);

        let groups = set.by_site();
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["b", "e"]);
        assert_eq!(groups["e"].len(), 2);
    }

    #[test]
    fn occupies_uses_periodic_matching() {
        let set = sample_set();
        assert!(set.occupies(&Point3::new(1.1, -0.9, 0.1)));
        assert!(!set.occupies(&Point3::new(0.2, 0.1, 0.1)));
    }

    #[test]
    fn equivalence_ignores_order_and_integer_shifts() {
        let shuffled: AtomSet = [
            Atom::new("e", Point3::new(-0.1, 0.9, 1.9)),
            Atom::new("b", Point3::new(0.5, 0.5, 0.5)),
            Atom::new("e", Point3::new(1.1, 0.1, 0.1)),
        ]
        .into_iter()
        .collect();
        assert!(sample_set().is_equivalent_to(&shuffled));
    }

    #[test]
    fn equivalence_requires_matching_sites() {
        let relabelled: AtomSet = [
            Atom::new("c", Point3::new(0.5, 0.5, 0.5)),
            Atom::new("e", Point3::new(0.1, 0.1, 0.1)),
            Atom::new("e", Point3::new(0.9, 0.9, 0.9)),
        ]
        .into_iter()
        .collect();
        assert!(!sample_set().is_equivalent_to(&relabelled));
    }
}
