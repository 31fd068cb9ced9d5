use super::{find_group, load_library};
use crate::cli::ExpandArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use densepack::core::io::report::ResultReport;
use densepack::core::models::asymmetric_unit::AsymmetricUnit;
use densepack::core::models::atom_set::AtomSet;
use densepack::core::models::parameters::GenerationParameters;
use densepack::core::params::species::SpeciesTable;
use densepack::engine::error::EngineError;
use std::io::Write;
use tracing::{info, warn};

pub fn run(args: ExpandArgs) -> Result<()> {
    let library = load_library(&args.data)?;
    let unit = find_group(&library, &args.group)?;

    let mut parameters = GenerationParameters::new();
    for seed in &args.sites {
        let (site, values) =
            parser::parse_site_seed(seed).map_err(|e| CliError::Argument(e.to_string()))?;
        parameters.set(&site, values);
    }

    info!(
        group = %args.group,
        sites = parameters.len(),
        "Expanding symmetry orbits."
    );
    let atoms = unit
        .generate_atoms(&parameters, !args.no_count_check)
        .map_err(EngineError::from)?;

    write_summary(unit, &parameters, &atoms, &mut std::io::stdout().lock())?;

    if let Some(output) = &args.output {
        let species = match &args.species {
            Some(path) => SpeciesTable::load(path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?,
            None => placeholder_species(&parameters)?,
        };
        for site in parameters.sites() {
            if species.get(site).is_none() {
                warn!(site, "Species table has no entry for this site; its atoms are not written.");
            }
        }

        ResultReport::new(1.0, &species, &atoms).write_to_path(output)?;
        println!("✓ Expanded structure written to: {}", output.display());
    }
    Ok(())
}

/// Labels every seeded site with its own name and a zero radius.
fn placeholder_species(parameters: &GenerationParameters) -> Result<SpeciesTable> {
    let mut species = SpeciesTable::new();
    for site in parameters.sites() {
        species
            .insert(site, site, 0.0)
            .map_err(|e| CliError::Config(e.to_string()))?;
    }
    Ok(species)
}

fn write_summary(
    unit: &AsymmetricUnit,
    parameters: &GenerationParameters,
    atoms: &AtomSet,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{} atom(s) generated.", atoms.len())?;
    for site in parameters.sites() {
        let expected = unit
            .site(site)
            .map_err(EngineError::from)?
            .expected_atom_count;
        let found = atoms.count_for_site(site);
        let marker = if found == expected { "" } else { "  (!)" };
        writeln!(out, "  {:<3} {:>4} / {:<4}{}", site, found, expected, marker)?;
    }
    Ok(())
}
