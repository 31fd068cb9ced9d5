use nalgebra::{Point3, Vector3};

/// Half-space `coefficients · pos > bias` used to bound the canonical asymmetric unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub coefficients: Vector3<f64>,
    pub bias: f64,
}

impl Constraint {
    pub fn new(coefficients: Vector3<f64>, bias: f64) -> Self {
        Self { coefficients, bias }
    }

    /// Strict inequality: a position on the boundary plane fails the check.
    #[inline]
    pub fn check(&self, position: &Point3<f64>) -> bool {
        self.coefficients.dot(&position.coords) > self.bias
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_accepts_points_strictly_inside() {
        let constraint = Constraint::new(Vector3::new(1.0, 0.0, 0.0), 0.25);
        assert!(constraint.check(&Point3::new(0.3, 0.9, 0.9)));
    }

    #[test]
    fn check_rejects_points_outside() {
        let constraint = Constraint::new(Vector3::new(1.0, -1.0, 0.0), 0.0);
        assert!(!constraint.check(&Point3::new(0.2, 0.4, 0.0)));
    }

    #[test]
    fn check_excludes_the_boundary_plane() {
        let constraint = Constraint::new(Vector3::new(1.0, 1.0, 0.0), 0.5);
        assert!(!constraint.check(&Point3::new(0.25, 0.25, 0.7)));
    }
}
