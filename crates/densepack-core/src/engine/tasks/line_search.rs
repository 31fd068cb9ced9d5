use super::overlap::OverlapScorer;
use crate::core::models::asymmetric_unit::{AsymmetricUnit, OrbitError};
use crate::core::models::atom_set::AtomSet;
use crate::core::models::parameters::GenerationParameters;
use crate::engine::config::{PackingConfig, SearchConfig, SearchStrategy};
use crate::engine::error::EngineError;
use tracing::{instrument, trace};

/// Best configuration found for one lattice scale.
#[derive(Debug, Clone)]
pub struct LineSearchOutcome {
    /// Maximum pairwise overlap of `atoms`; exactly zero once a trial fell below the
    /// acceptance tolerance.
    pub overlap: f64,
    /// Value of the searched parameter.
    pub parameter: f64,
    pub parameters: GenerationParameters,
    pub atoms: AtomSet,
    /// Number of orbit expansions performed, degenerate ones included.
    pub trials: usize,
}

impl LineSearchOutcome {
    pub fn is_feasible(&self) -> bool {
        self.overlap == 0.0
    }
}

enum Trial {
    Degenerate,
    Scored(f64),
}

struct Sampler<'a> {
    unit: &'a AsymmetricUnit,
    scorer: OverlapScorer<'a>,
    parameters: GenerationParameters,
    site: &'a str,
    index: usize,
    scale: f64,
    trials: usize,
    best: Option<LineSearchOutcome>,
}

impl<'a> Sampler<'a> {
    fn new(unit: &'a AsymmetricUnit, config: &'a PackingConfig, scale: f64) -> Self {
        Self {
            unit,
            scorer: OverlapScorer::new(&config.species),
            parameters: config.parameters.clone(),
            site: &config.search.target_site,
            index: config.search.target_index,
            scale,
            trials: 0,
            best: None,
        }
    }

    fn evaluate(&mut self, value: f64) -> Result<Trial, EngineError> {
        self.trials += 1;
        self.parameters.set_value(self.site, self.index, value);

        let atoms = match self.unit.generate_atoms(&self.parameters, true) {
            Ok(atoms) => atoms,
            Err(OrbitError::DegenerateOrbit { expected, found }) => {
                trace!(parameter = value, expected, found, "Degenerate trial.");
                return Ok(Trial::Degenerate);
            }
            Err(e) => return Err(e.into()),
        };

        let overlap = self.scorer.max_overlap(self.scale, &atoms)?;
        trace!(parameter = value, overlap, "Scored trial.");

        if self.best.as_ref().is_none_or(|best| overlap < best.overlap) {
            self.best = Some(LineSearchOutcome {
                overlap,
                parameter: value,
                parameters: self.parameters.clone(),
                atoms,
                trials: 0,
            });
        }
        Ok(Trial::Scored(overlap))
    }

    /// Marks the best trial as overlap-free.
    fn accept(&mut self) {
        if let Some(best) = self.best.as_mut() {
            best.overlap = 0.0;
        }
    }

    fn finish(self) -> Option<LineSearchOutcome> {
        let trials = self.trials;
        self.best.map(|mut best| {
            best.trials = trials;
            best
        })
    }
}

/// Searches the configured free parameter for the configuration with the smallest maximum
/// overlap at lattice scale `scale`.
///
/// Returns `Ok(None)` when every trial in the parameter bounds produced a degenerate orbit.
///
/// # Errors
///
/// Orbit errors other than degeneracy, a missing radius, a target that is not a free
/// parameter, or a zero-length guide under the adaptive strategy.
#[instrument(skip_all, name = "line_search_task", fields(scale = scale))]
pub fn run(
    unit: &AsymmetricUnit,
    config: &PackingConfig,
    scale: f64,
) -> Result<Option<LineSearchOutcome>, EngineError> {
    let search = &config.search;
    let guide_length = target_guide_length(unit, config)?;
    let mut sampler = Sampler::new(unit, config, scale);

    match search.strategy {
        SearchStrategy::Adaptive => {
            if guide_length == 0.0 {
                return Err(EngineError::ZeroGuide {
                    site: search.target_site.clone(),
                    index: search.target_index,
                });
            }
            adaptive(&mut sampler, search, scale * guide_length)?;
        }
        SearchStrategy::Grid { samples } => grid(&mut sampler, search, samples)?,
    }

    let outcome = sampler.finish();
    if let Some(outcome) = &outcome {
        trace!(
            parameter = outcome.parameter,
            overlap = outcome.overlap,
            trials = outcome.trials,
            "Line search finished."
        );
    }
    Ok(outcome)
}

/// Advances by half the current overlap converted to parameter units, which cannot step past
/// the first overlap-free value along a straight guide.
fn adaptive(
    sampler: &mut Sampler<'_>,
    search: &SearchConfig,
    absolute_guide_length: f64,
) -> Result<(), EngineError> {
    let mut value = search.lower;
    while value <= search.upper {
        let next = match sampler.evaluate(value)? {
            Trial::Degenerate => value + search.degenerate_offset,
            Trial::Scored(overlap) if overlap < search.overlap_tolerance => {
                sampler.accept();
                break;
            }
            Trial::Scored(overlap) => value + overlap / (2.0 * absolute_guide_length),
        };
        if next <= value {
            trace!(parameter = value, "Step vanished below float resolution.");
            break;
        }
        value = next;
    }
    Ok(())
}

fn grid(
    sampler: &mut Sampler<'_>,
    search: &SearchConfig,
    samples: usize,
) -> Result<(), EngineError> {
    let step = (search.upper - search.lower) / samples as f64;
    for i in 0..=samples {
        let value = search.lower + i as f64 * step;
        if let Trial::Scored(overlap) = sampler.evaluate(value)? {
            if overlap == 0.0 {
                break;
            }
        }
    }
    Ok(())
}

fn target_guide_length(unit: &AsymmetricUnit, config: &PackingConfig) -> Result<f64, EngineError> {
    let search = &config.search;
    let invalid = || EngineError::InvalidTarget {
        site: search.target_site.clone(),
        index: search.target_index,
    };

    let seeded = config
        .parameters
        .get(&search.target_site)
        .ok_or_else(invalid)?;
    if search.target_index >= seeded.len() {
        return Err(invalid());
    }
    let guide = unit
        .site(&search.target_site)?
        .guide(search.target_index)
        .ok_or_else(invalid)?;
    Ok(guide.norm())
}
