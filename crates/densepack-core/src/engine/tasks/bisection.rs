use super::line_search::{self, LineSearchOutcome};
use crate::core::models::asymmetric_unit::AsymmetricUnit;
use crate::core::models::atom_set::AtomSet;
use crate::core::models::parameters::GenerationParameters;
use crate::engine::config::{PackingConfig, ScaleConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct FitOutcome {
    /// Midpoint of the final bracket.
    pub scale: f64,
    /// Final `(lower, upper)` bracket.
    pub bracket: (f64, f64),
    /// Scale at which `parameters` and `atoms` were evaluated.
    pub evaluated_scale: f64,
    /// Overlap at `evaluated_scale`; zero when a feasible midpoint was found.
    pub overlap: f64,
    pub parameters: GenerationParameters,
    pub atoms: AtomSet,
    pub iterations: usize,
}

/// Number of halvings needed to shrink `[min, max]` to at most `tolerance`.
pub fn iteration_count(min: f64, max: f64, tolerance: f64) -> usize {
    let width = max - min;
    if width <= tolerance {
        return 0;
    }
    (width / tolerance).log2().ceil() as usize
}

struct Evaluated {
    scale: f64,
    outcome: LineSearchOutcome,
}

/// Bisects the lattice scale until the bracket is no wider than the configured tolerance.
///
/// A midpoint is feasible when the line search reaches zero overlap; the bracket's upper end
/// then moves down to it, otherwise its lower end moves up. The configuration returned is the
/// one of the last feasible midpoint, falling back to the last evaluated one.
///
/// # Errors
///
/// [`EngineError::NoValidConfiguration`] if every midpoint produced only degenerate orbits,
/// plus any error raised by the line search.
#[instrument(skip_all, name = "bisection_task")]
pub fn fit(
    unit: &AsymmetricUnit,
    config: &PackingConfig,
    reporter: &ProgressReporter,
) -> Result<FitOutcome, EngineError> {
    let ScaleConfig {
        min,
        max,
        tolerance,
    } = config.scale;
    let (mut lower, mut upper) = (min, max);

    let total_steps = iteration_count(min, max, tolerance);
    info!(min, max, tolerance, total_steps, "Starting scale bisection.");
    reporter.report(Progress::TaskStart {
        total_steps: total_steps as u64,
    });

    let mut feasible: Option<Evaluated> = None;
    let mut infeasible: Option<Evaluated> = None;
    let mut iterations = 0;

    while upper - lower > tolerance {
        let mid = (lower + upper) / 2.0;
        iterations += 1;

        match line_search::run(unit, config, mid)? {
            Some(outcome) if outcome.is_feasible() => {
                debug!(
                    scale = mid,
                    parameter = outcome.parameter,
                    "Midpoint is overlap-free."
                );
                upper = mid;
                feasible = Some(Evaluated {
                    scale: mid,
                    outcome,
                });
            }
            Some(outcome) => {
                debug!(scale = mid, overlap = outcome.overlap, "Midpoint overlaps.");
                lower = mid;
                infeasible = Some(Evaluated {
                    scale: mid,
                    outcome,
                });
            }
            None => {
                debug!(scale = mid, "Midpoint has only degenerate orbits.");
                lower = mid;
            }
        }

        reporter.report(Progress::BracketUpdate { lower, upper });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    if iterations == 0 {
        let mid = (lower + upper) / 2.0;
        if let Some(outcome) = line_search::run(unit, config, mid)? {
            let evaluated = Evaluated {
                scale: mid,
                outcome,
            };
            if evaluated.outcome.is_feasible() {
                feasible = Some(evaluated);
            } else {
                infeasible = Some(evaluated);
            }
        }
    }

    let chosen = feasible
        .or(infeasible)
        .ok_or(EngineError::NoValidConfiguration { min, max })?;
    let scale = (lower + upper) / 2.0;

    info!(
        scale,
        overlap = chosen.outcome.overlap,
        iterations,
        "Scale bisection finished."
    );

    Ok(FitOutcome {
        scale,
        bracket: (lower, upper),
        evaluated_scale: chosen.scale,
        overlap: chosen.outcome.overlap,
        parameters: chosen.outcome.parameters,
        atoms: chosen.outcome.atoms,
        iterations,
    })
}
