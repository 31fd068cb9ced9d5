//! Data model of a space group's asymmetric unit and the atoms it generates.
//!
//! - [`site`] - Wyckoff positions as a base point plus free-parameter guide directions
//! - [`symmetry`] - Affine symmetry operators in fractional coordinates
//! - [`constraint`] - Half-space tests bounding the canonical asymmetric unit
//! - [`asymmetric_unit`] - The per-group aggregate and its orbit expansion
//! - [`atom`] and [`atom_set`] - Generated atoms and the arena that owns them
//! - [`parameters`] - Ordered per-site free-parameter assignments
//! - [`library`] - All asymmetric units loaded from one data file, keyed by group name

pub mod asymmetric_unit;
pub mod atom;
pub mod atom_set;
pub mod constraint;
pub mod ids;
pub mod library;
pub mod parameters;
pub mod site;
pub mod symmetry;
