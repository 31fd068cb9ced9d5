//! Per-site species parameters.
//!
//! - [`species`] - The radius table (with element labels) keyed by Wyckoff site, loadable
//!   from TOML or CSV
//! - [`presets`] - Compiled-in scenarios for well-known structures

pub mod presets;
pub mod species;
