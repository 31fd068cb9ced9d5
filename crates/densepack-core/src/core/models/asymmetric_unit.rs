use super::atom::Atom;
use super::atom_set::AtomSet;
use super::constraint::Constraint;
use super::ids::AtomId;
use super::parameters::GenerationParameters;
use super::site::SiteModel;
use super::symmetry::SymmetryOperator;
use crate::core::utils::geometry::reduce;
use nalgebra::Point3;
use std::collections::{BTreeMap, VecDeque};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrbitError {
    #[error("Unknown Wyckoff site '{0}'")]
    UnknownSite(String),

    #[error("Site '{site}' takes {expected} free parameter(s) but {found} were supplied")]
    ParameterCountMismatch {
        site: String,
        expected: usize,
        found: usize,
    },

    #[error("Degenerate orbit: generated {found} atom(s), expected at least {expected}")]
    DegenerateOrbit { expected: usize, found: usize },
}

/// Everything known about one space group: the constraints bounding its canonical asymmetric
/// unit, its symmetry operators, and its Wyckoff sites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AsymmetricUnit {
    constraints: Vec<Constraint>,
    // Loaded alongside the constraints; orbit expansion does not consult them.
    reverse_symmetries: Vec<SymmetryOperator>,
    symmetries: Vec<SymmetryOperator>,
    sites: BTreeMap<String, SiteModel>,
}

impl AsymmetricUnit {
    pub fn new(
        constraints: Vec<Constraint>,
        reverse_symmetries: Vec<SymmetryOperator>,
        symmetries: Vec<SymmetryOperator>,
        sites: Vec<SiteModel>,
    ) -> Self {
        let sites = sites
            .into_iter()
            .map(|site| (site.name.clone(), site))
            .collect();
        Self {
            constraints,
            reverse_symmetries,
            symmetries,
            sites,
        }
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn reverse_symmetries(&self) -> &[SymmetryOperator] {
        &self.reverse_symmetries
    }

    pub fn symmetries(&self) -> &[SymmetryOperator] {
        &self.symmetries
    }

    pub fn site(&self, name: &str) -> Result<&SiteModel, OrbitError> {
        self.sites
            .get(name)
            .ok_or_else(|| OrbitError::UnknownSite(name.to_string()))
    }

    pub fn sites(&self) -> impl Iterator<Item = &SiteModel> {
        self.sites.values()
    }

    /// True if `position` lies inside every constraint half-space.
    pub fn check_constraints(&self, position: &Point3<f64>) -> bool {
        self.constraints.iter().all(|c| c.check(position))
    }

    /// Sum of the multiplicities of the sites named in `parameters`.
    pub fn expected_atom_count(&self, parameters: &GenerationParameters) -> Result<usize, OrbitError> {
        parameters
            .sites()
            .map(|name| self.site(name).map(|site| site.expected_atom_count))
            .sum()
    }

    /// Expands one seed per entry of `parameters` into the full set of symmetry-equivalent
    /// atoms.
    ///
    /// # Errors
    ///
    /// - [`OrbitError::UnknownSite`] / [`OrbitError::ParameterCountMismatch`] if the
    ///   parameters do not fit this group's sites.
    /// - [`OrbitError::DegenerateOrbit`] if `enforce_count` is set and fewer atoms than the
    ///   summed multiplicity were produced, which happens when a parameter value makes two
    ///   symmetry images coincide. Surplus atoms are accepted.
    pub fn generate_atoms(
        &self,
        parameters: &GenerationParameters,
        enforce_count: bool,
    ) -> Result<AtomSet, OrbitError> {
        let mut seeds = Vec::with_capacity(parameters.len());
        let mut expected = 0;
        for (name, values) in parameters.iter() {
            let site = self.site(name)?;
            seeds.push(Atom::new(name, site.position(values)?));
            expected += site.expected_atom_count;
        }

        let atoms = self.close_orbit(seeds);

        if enforce_count {
            if atoms.len() < expected {
                return Err(OrbitError::DegenerateOrbit {
                    expected,
                    found: atoms.len(),
                });
            }
            if atoms.len() > expected {
                trace!(
                    expected,
                    found = atoms.len(),
                    "Orbit produced more atoms than the summed multiplicity."
                );
            }
        }
        Ok(atoms)
    }

    /// Applies every symmetry operator to every atom, breadth first, until no operator yields
    /// a new position.
    ///
    /// Seeds are inserted as given. An image outside the constraint region is wrapped into the
    /// unit cell before the distinctness test.
    pub fn close_orbit<I>(&self, seeds: I) -> AtomSet
    where
        I: IntoIterator<Item = Atom>,
    {
        let mut atoms = AtomSet::new();
        let mut pending: VecDeque<AtomId> = seeds.into_iter().map(|a| atoms.insert(a)).collect();

        while let Some(id) = pending.pop_front() {
            let Some(origin) = atoms.get(id).cloned() else {
                continue;
            };
            for symmetry in &self.symmetries {
                let mut image = symmetry.apply(&origin.position);
                if !self.check_constraints(&image) {
                    image = reduce(&image);
                }
                if !atoms.occupies(&image) {
                    pending.push_back(atoms.insert(Atom::new(&origin.site, image)));
                }
            }
        }
        atoms
    }
}
