use super::load_library;
use crate::cli::GroupsArgs;
use crate::error::Result;
use densepack::core::models::library::SpaceGroupLibrary;
use std::io::Write;
use tracing::info;

pub fn run(args: GroupsArgs) -> Result<()> {
    let library = load_library(&args.data)?;
    if library.is_empty() {
        println!("No space groups found in {}.", args.data.display());
        return Ok(());
    }
    info!("Listing {} space group(s).", library.len());
    write_listing(&library, &mut std::io::stdout().lock())?;
    Ok(())
}

fn write_listing(library: &SpaceGroupLibrary, out: &mut impl Write) -> std::io::Result<()> {
    for (name, unit) in library.iter() {
        writeln!(
            out,
            "{}  ({} symmetry operators, {} constraints)",
            name,
            unit.symmetries().len(),
            unit.constraints().len()
        )?;
        for site in unit.sites() {
            writeln!(
                out,
                "  {:<3} multiplicity {:>3}  free parameters {}",
                site.name,
                site.expected_atom_count,
                site.degrees_of_freedom()
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use densepack::core::io::{cubic::CubicDataFile, traits::SpaceGroupFile};

    #[test]
    fn listing_shows_every_site() {
        let data = "\
Pm3m
0
1
yzx 0 0 0 1
2
a 1 0 0 0 0 1
e 6 1 0 0 0 1 1 0 0
HALT
";
        let library = CubicDataFile::read_from(&mut data.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_listing(&library, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Pm3m  (1 symmetry operators, 0 constraints)\n\
             \x20 a   multiplicity   1  free parameters 0\n\
             \x20 e   multiplicity   6  free parameters 1\n"
        );
    }
}
