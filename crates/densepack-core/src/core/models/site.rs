use super::asymmetric_unit::OrbitError;
use nalgebra::{Point3, Vector3};

/// A Wyckoff position: a parametrized family of equivalent sites.
///
/// A concrete seed position is `base + Σ params[i] · guides[i]`, so the number of guide
/// vectors is the site's number of degrees of freedom.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteModel {
    /// Wyckoff letter or other identifier (e.g., "e").
    pub name: String,
    /// Site multiplicity: atoms one seed must expand to in the full unit cell.
    pub expected_atom_count: usize,
    /// Position at all-zero parameters, in fractional coordinates.
    pub base: Point3<f64>,
    /// One direction per free parameter, in fractional coordinates.
    pub guides: Vec<Vector3<f64>>,
}

impl SiteModel {
    pub fn new(
        name: &str,
        expected_atom_count: usize,
        base: Point3<f64>,
        guides: Vec<Vector3<f64>>,
    ) -> Self {
        Self {
            name: name.to_string(),
            expected_atom_count,
            base,
            guides,
        }
    }

    #[inline]
    pub fn degrees_of_freedom(&self) -> usize {
        self.guides.len()
    }

    pub fn guide(&self, index: usize) -> Option<&Vector3<f64>> {
        self.guides.get(index)
    }

    /// Maps free parameters to an absolute fractional position.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitError::ParameterCountMismatch`] unless exactly one value per degree of
    /// freedom is supplied.
    pub fn position(&self, params: &[f64]) -> Result<Point3<f64>, OrbitError> {
        if params.len() != self.degrees_of_freedom() {
            return Err(OrbitError::ParameterCountMismatch {
                site: self.name.clone(),
                expected: self.degrees_of_freedom(),
                found: params.len(),
            });
        }
        Ok(self
            .guides
            .iter()
            .zip(params)
            .fold(self.base, |pos, (guide, &value)| pos + guide * value))
    }
}
