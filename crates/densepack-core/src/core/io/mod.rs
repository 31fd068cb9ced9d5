//! Input/output for space-group data and packing results.
//!
//! The reader accepts the line-oriented `CUBIC.DAT` layout (constraints, reverse symmetries,
//! symmetries and Wyckoff sites per group) and the writer produces the flat result file
//! consumed by downstream visualization tools.

pub mod cubic;
pub mod report;
pub mod traits;
