//! # Workflows Module
//!
//! High-level entry points that run a complete packing search.
//!
//! ## Overview
//!
//! A workflow takes a parsed asymmetric unit and a validated configuration, checks that the two
//! agree, drives the engine tasks with progress reporting, and returns a self-contained result
//! that front ends can persist or display.
//!
//! ## Architecture
//!
//! - **Packing Workflow** ([`pack`]) - Scale bisection with an inner search over one free site
//!   parameter, returning the densest overlap-free configuration found.

pub mod pack;
