//! # Engine Module
//!
//! This module implements the packing optimizer: the search for the smallest uniform lattice
//! scale at which spheres placed on a symmetry-expanded set of sites no longer overlap.
//!
//! ## Overview
//!
//! The engine drives two nested searches. The outer one bisects the lattice scale; for every
//! candidate scale the inner one walks a single free site coordinate and keeps the
//! configuration with the smallest maximum pairwise overlap. A scale is feasible when the inner
//! search reaches zero overlap.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Scale bracket, free-parameter target, search strategy and
//!   the species radii, assembled through a validating builder
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types
//! - **Tasks** ([`tasks`]) - Overlap metric, inner line search and outer bisection
//!
//! None of the engine code performs I/O; inputs arrive as fully parsed models.

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
