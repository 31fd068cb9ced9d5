//! # Core Module
//!
//! Fundamental building blocks for crystallographic sphere packing.
//!
//! ## Architecture
//!
//! - **Crystal Representation** ([`models`]) - Atoms, Wyckoff site models, symmetry
//!   operators, asymmetric-unit constraints and the orbit expansion that turns a handful of
//!   parametrized seeds into a full unit cell
//! - **Geometry** ([`utils`]) - Minimum-image distance and position reduction in fractional
//!   coordinates
//! - **Species Parameters** ([`params`]) - Radius tables with element labels and built-in
//!   scenario presets
//! - **File I/O** ([`io`]) - The space-group data file reader and the packing result writer
//!
//! Nothing in this module performs optimization; it is pure data and pure functions that the
//! [`crate::engine`] drives.

pub mod io;
pub mod models;
pub mod params;
pub mod utils;
