use super::{find_group, load_library};
use crate::cli::FitArgs;
use crate::config::builder::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use densepack::core::io::report::ResultReport;
use densepack::engine::progress::ProgressReporter;
use densepack::workflows::{self, pack::PackingResult};
use std::io::Write;
use tracing::{info, warn};

pub fn run(args: FitArgs) -> Result<()> {
    info!("Resolving packing scenario...");
    let app = build_config(&args)?;
    let config = &app.core_config;

    let library = load_library(&app.data_path)?;
    let unit = find_group(&library, &config.group)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Packing {} site(s) on {} (scale {} to {})...",
        config.parameters.len(),
        config.group,
        config.scale.min,
        config.scale.max
    );
    info!("Invoking the core packing workflow...");
    let result = workflows::pack::run(unit, config, &reporter)?;

    if !result.feasible {
        warn!(
            overlap = result.max_overlap,
            "No overlap-free configuration was found inside the scale bracket."
        );
        println!("Warning: the best configuration found still overlaps.");
    }
    write_summary(&result, &mut std::io::stdout().lock())?;

    if let Some(output) = &app.output_path {
        info!("Writing result to {:?}", output);
        ResultReport::new(result.scale, &config.species, &result.atoms).write_to_path(output)?;
        println!("✓ Result written to: {}", output.display());
    }
    Ok(())
}

fn write_summary(result: &PackingResult, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Lattice scale: {:.6}", result.scale)?;
    writeln!(out, "Max overlap:   {:.3e}", result.max_overlap)?;
    writeln!(
        out,
        "Overlap-free:  {}",
        if result.feasible { "yes" } else { "no" }
    )?;
    writeln!(out, "Bisection steps: {}", result.iterations)?;
    writeln!(out, "Atoms: {}", result.atoms.len())?;
    for (site, values) in result.parameters.iter() {
        let values: Vec<String> = values.iter().map(|v| format!("{v:.6}")).collect();
        writeln!(
            out,
            "  {:<3} {:>4} atom(s)  [{}]",
            site,
            result.atoms.count_for_site(site),
            values.join(", ")
        )?;
    }
    Ok(())
}
