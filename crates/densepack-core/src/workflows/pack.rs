use crate::core::models::asymmetric_unit::{AsymmetricUnit, OrbitError};
use crate::core::models::atom_set::AtomSet;
use crate::core::models::parameters::GenerationParameters;
use crate::engine::config::PackingConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks;
use crate::engine::tasks::overlap::OverlapScorer;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct PackingResult {
    /// Lattice scale, the midpoint of the final bisection bracket.
    pub scale: f64,
    pub parameters: GenerationParameters,
    pub atoms: AtomSet,
    /// Maximum pairwise overlap of `atoms` at `scale`. Usually a small positive residue even
    /// for a feasible fit, since `scale` sits below the last overlap-free midpoint.
    pub max_overlap: f64,
    /// Whether some bisection midpoint was overlap-free.
    pub feasible: bool,
    pub iterations: usize,
}

#[instrument(skip_all, name = "packing_workflow", fields(group = %config.group))]
pub fn run(
    unit: &AsymmetricUnit,
    config: &PackingConfig,
    reporter: &ProgressReporter,
) -> Result<PackingResult, EngineError> {
    // === Phase 0: Validation ===
    reporter.report(Progress::PhaseStart { name: "Validation" });
    validate(unit, config)?;
    let expected = unit.expected_atom_count(&config.parameters)?;
    info!(
        sites = config.parameters.len(),
        expected_atoms = expected,
        target = %config.search.target_site,
        "Configuration validated."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 1: Scale bisection ===
    reporter.report(Progress::PhaseStart {
        name: "Scale Bisection",
    });
    let outcome = tasks::bisection::fit(unit, config, reporter)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Final scoring ===
    let max_overlap =
        OverlapScorer::new(&config.species).max_overlap(outcome.scale, &outcome.atoms)?;
    let feasible = outcome.overlap == 0.0;
    if !feasible {
        reporter.report(Progress::Message(format!(
            "No overlap-free midpoint in [{}, {}]; best overlap {:.3e}",
            config.scale.min, config.scale.max, outcome.overlap
        )));
    }

    info!(
        scale = outcome.scale,
        max_overlap,
        feasible,
        atoms = outcome.atoms.len(),
        "Packing workflow complete."
    );
    Ok(PackingResult {
        scale: outcome.scale,
        parameters: outcome.parameters,
        atoms: outcome.atoms,
        max_overlap,
        feasible,
        iterations: outcome.iterations,
    })
}

fn validate(unit: &AsymmetricUnit, config: &PackingConfig) -> Result<(), EngineError> {
    config.validate()?;
    for (name, values) in config.parameters.iter() {
        let site = unit.site(name)?;
        if values.len() != site.degrees_of_freedom() {
            return Err(OrbitError::ParameterCountMismatch {
                site: name.to_string(),
                expected: site.degrees_of_freedom(),
                found: values.len(),
            }
            .into());
        }
        if config.species.radius(name).is_none() {
            return Err(EngineError::MissingRadius {
                site: name.to_string(),
            });
        }
    }
    Ok(())
}
