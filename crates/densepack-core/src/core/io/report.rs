use crate::core::models::atom_set::AtomSet;
use crate::core::params::species::SpeciesTable;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Plain-text result of a packing run.
///
/// The layout is the lattice scale, the number of site classes, and then per class its
/// element, radius, atom count and one `x y z` line per atom. Classes follow the order of the
/// species table; a class with no atoms is written with a count of zero.
#[derive(Debug, Clone, Copy)]
pub struct ResultReport<'a> {
    pub scale: f64,
    pub species: &'a SpeciesTable,
    pub atoms: &'a AtomSet,
}

impl<'a> ResultReport<'a> {
    pub fn new(scale: f64, species: &'a SpeciesTable, atoms: &'a AtomSet) -> Self {
        Self {
            scale,
            species,
            atoms,
        }
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        let groups = self.atoms.by_site();

        writeln!(writer, "{}", self.scale)?;
        writeln!(writer, "{}", self.species.len())?;
        for (site, species) in self.species.iter() {
            let atoms = groups.get(site).map(Vec::as_slice).unwrap_or(&[]);
            writeln!(writer, "{}", species.element)?;
            writeln!(writer, "{}", species.radius)?;
            writeln!(writer, "{}", atoms.len())?;
            for atom in atoms {
                // Adding zero turns -0.0 into 0.0.
                let p = atom.position.map(|c| c + 0.0);
                writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
            }
        }
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()
    }
}
