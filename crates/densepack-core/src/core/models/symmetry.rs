use nalgebra::{Matrix3, Point3, Vector3};

/// Affine symmetry operator `pos -> linear · pos + translation` in fractional coordinates.
///
/// The linear part of every crystallographic operator handled here is a signed permutation
/// matrix (entries in `{-1, 0, 1}`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetryOperator {
    pub linear: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl SymmetryOperator {
    pub fn new(linear: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            linear,
            translation,
        }
    }

    /// Builds an operator from a three-letter scheme such as `"xyz"` or `"Yxz"`.
    ///
    /// Letter `i` of the scheme names the unit vector that becomes column `i` of the linear
    /// part: `x`, `y`, `z` map to `+e_x`, `+e_y`, `+e_z`, and an upper-case letter negates it.
    /// Returns `None` for anything that is not exactly three axis letters.
    pub fn from_scheme(scheme: &str, translation: Vector3<f64>) -> Option<Self> {
        let mut linear = Matrix3::zeros();
        let mut columns = 0;
        for (column, symbol) in scheme.chars().enumerate() {
            if column >= 3 {
                return None;
            }
            let axis = match symbol.to_ascii_lowercase() {
                'x' => 0,
                'y' => 1,
                'z' => 2,
                _ => return None,
            };
            linear[(axis, column)] = if symbol.is_ascii_uppercase() {
                -1.0
            } else {
                1.0
            };
            columns += 1;
        }
        (columns == 3).then(|| Self::new(linear, translation))
    }

    #[inline]
    pub fn apply(&self, position: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.linear * position.coords + self.translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::geometry::{periodic_distance, reduce};

    #[test]
    fn identity_leaves_positions_unchanged() {
        let p = Point3::new(0.1, 0.2, 0.3);
        let identity = SymmetryOperator::new(Matrix3::identity(), Vector3::zeros());
        assert_eq!(identity.apply(&p), p);
    }

    #[test]
    fn translation_shifts_positions() {
        let op = SymmetryOperator::new(Matrix3::identity(), Vector3::new(0.5, 0.0, 0.25));
        assert_eq!(
            op.apply(&Point3::new(0.125, 0.125, 0.125)),
            Point3::new(0.625, 0.125, 0.375)
        );
    }

    #[test]
    fn from_scheme_places_signed_unit_vectors_in_columns() {
        let op = SymmetryOperator::from_scheme("Yxz", Vector3::zeros()).unwrap();
        assert_eq!(
            op.linear,
            Matrix3::new(0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0)
        );
        assert_eq!(
            op.apply(&Point3::new(0.1, 0.2, 0.3)),
            Point3::new(0.2, -0.1, 0.3)
        );
    }

    #[test]
    fn from_scheme_cyclic_permutation() {
        let op = SymmetryOperator::from_scheme("yzx", Vector3::zeros()).unwrap();
        assert_eq!(
            op.apply(&Point3::new(0.1, 0.2, 0.3)),
            Point3::new(0.3, 0.1, 0.2)
        );
    }

    #[test]
    fn from_scheme_rejects_malformed_schemes() {
        assert!(SymmetryOperator::from_scheme("xy", Vector3::zeros()).is_none());
        assert!(SymmetryOperator::from_scheme("xyzx", Vector3::zeros()).is_none());
        assert!(SymmetryOperator::from_scheme("xwz", Vector3::zeros()).is_none());
        assert!(SymmetryOperator::from_scheme("", Vector3::zeros()).is_none());
    }

    #[test]
    fn reduced_images_coincide_with_themselves() {
        let ops = [
            SymmetryOperator::new(Matrix3::identity(), Vector3::zeros()),
            SymmetryOperator::from_scheme("ZXy", Vector3::new(0.25, 0.5, 0.75)).unwrap(),
            SymmetryOperator::from_scheme("xYZ", Vector3::new(-0.5, 0.0, 1.25)).unwrap(),
        ];
        let p = Point3::new(0.9, -0.3, 0.41);
        for op in ops {
            let image = reduce(&op.apply(&p));
            assert_eq!(periodic_distance(&image, &image), 0.0);
        }
    }
}
