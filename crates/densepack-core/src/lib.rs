//! # DensePack Core Library
//!
//! Densest non-overlapping sphere packings on the symmetry-expanded Wyckoff positions of a
//! cubic space group.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AsymmetricUnit`, `SiteModel`,
//!   `SymmetryOperator`), the symmetry-orbit expansion, periodic geometry, species tables and
//!   data-file I/O.
//!
//! - **[`engine`]: The Logic Core.** Configuration, progress reporting and the two numeric
//!   searches: the inner line search over a free site coordinate and the outer bisection over
//!   the lattice scale.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that validate inputs, drive the
//!   engine and hand back a [`workflows::pack::PackingResult`].

pub mod core;
pub mod engine;
pub mod workflows;
