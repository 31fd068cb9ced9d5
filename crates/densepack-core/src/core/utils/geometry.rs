use nalgebra::Point3;

/// Two fractional positions closer than this are the same lattice site.
pub const DISTINCT_EPSILON: f64 = 1e-6;

#[inline]
fn wrap_unit(value: f64) -> f64 {
    let wrapped = value.rem_euclid(1.0);
    // `rem_euclid` returns -0.0 for -0.0 and can round tiny negatives up to 1.0.
    if wrapped == 0.0 || wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Minimum-image distance between two fractional coordinates in a unit periodic cell.
///
/// Each axis separation is taken modulo 1 and replaced by its wrap-around complement when it
/// exceeds half a cell, so the result does not change when either argument is shifted by an
/// integer lattice vector.
pub fn periodic_distance(p: &Point3<f64>, q: &Point3<f64>) -> f64 {
    (p - q)
        .map(|d| {
            let d = d.abs().rem_euclid(1.0);
            if d > 0.5 { 1.0 - d } else { d }
        })
        .norm()
}

/// Wraps a fractional position into `[0, 1)³`.
pub fn reduce(p: &Point3<f64>) -> Point3<f64> {
    p.map(wrap_unit)
}

#[inline]
pub fn is_same_site(p: &Point3<f64>, q: &Point3<f64>) -> bool {
    periodic_distance(p, q) < DISTINCT_EPSILON
}
