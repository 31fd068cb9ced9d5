use crate::core::models::library::SpaceGroupLibrary;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading space-group symmetry data files.
///
/// Implementors handle a concrete text layout and produce a [`SpaceGroupLibrary`] holding one
/// asymmetric unit per group found in the file.
pub trait SpaceGroupFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads every group from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<SpaceGroupLibrary, Self::Error>;

    /// Reads every group from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<SpaceGroupLibrary, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
