use crate::core::models::atom::Atom;
use crate::core::models::atom_set::AtomSet;
use crate::core::params::species::SpeciesTable;
use crate::core::utils::geometry::periodic_distance;
use crate::engine::error::EngineError;
use itertools::Itertools;

/// Interpenetration depth of two spheres whose centres are `distance` apart in fractional
/// units of a lattice with edge `scale`. Zero when the spheres do not touch.
#[inline]
pub fn pair_overlap(scale: f64, radius_a: f64, radius_b: f64, distance: f64) -> f64 {
    (radius_a + radius_b - scale * distance).max(0.0)
}

#[derive(Debug, Clone, Copy)]
pub struct OverlapScorer<'a> {
    species: &'a SpeciesTable,
}

impl<'a> OverlapScorer<'a> {
    pub fn new(species: &'a SpeciesTable) -> Self {
        Self { species }
    }

    fn radius(&self, atom: &Atom) -> Result<f64, EngineError> {
        self.species
            .radius(&atom.site)
            .ok_or_else(|| EngineError::MissingRadius {
                site: atom.site.clone(),
            })
    }

    pub fn overlap(&self, scale: f64, a: &Atom, b: &Atom) -> Result<f64, EngineError> {
        Ok(pair_overlap(
            scale,
            self.radius(a)?,
            self.radius(b)?,
            periodic_distance(&a.position, &b.position),
        ))
    }

    /// Largest overlap over all unordered pairs of distinct atoms; zero for fewer than two.
    ///
    /// Every atom's radius is resolved first, so a missing radius is reported even when the
    /// set holds a single atom.
    pub fn max_overlap(&self, scale: f64, atoms: &AtomSet) -> Result<f64, EngineError> {
        let entries = atoms
            .iter()
            .map(|atom| Ok((atom, self.radius(atom)?)))
            .collect::<Result<Vec<(&Atom, f64)>, EngineError>>()?;

        Ok(entries
            .iter()
            .tuple_combinations()
            .map(|(&(a, ra), &(b, rb))| {
                pair_overlap(scale, ra, rb, periodic_distance(&a.position, &b.position))
            })
            .fold(0.0, f64::max))
    }
}
