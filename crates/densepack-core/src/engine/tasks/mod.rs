//! Computational steps of a packing run.
//!
//! [`overlap`] scores a fixed set of atoms at a given lattice scale, [`line_search`] walks one
//! free site parameter at a fixed scale, and [`bisection`] narrows the scale bracket by running
//! the line search at each midpoint.

pub mod bisection;
pub mod line_search;
pub mod overlap;
