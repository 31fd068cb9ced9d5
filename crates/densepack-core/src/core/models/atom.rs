use nalgebra::Point3;

/// A single sphere center produced by orbit expansion.
///
/// The position is fractional and is only wrapped into the unit cell when a symmetry image
/// falls outside the canonical asymmetric unit, so seed atoms and images accepted by the
/// constraints can carry coordinates outside `[0, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Name of the Wyckoff site this atom belongs to (e.g., "b", "e").
    pub site: String,
    /// Fractional coordinates within the unit cell.
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(site: &str, position: Point3<f64>) -> Self {
        Self {
            site: site.to_string(),
            position,
        }
    }
}
