use crate::core::models::parameters::GenerationParameters;
use crate::core::params::presets::Preset;
use crate::core::params::species::SpeciesTable;
use thiserror::Error;

pub const DEFAULT_PARAMETER_BOUNDS: (f64, f64) = (0.0, 1.0);
pub const DEFAULT_DEGENERATE_OFFSET: f64 = 1e-3;
pub const DEFAULT_OVERLAP_TOLERANCE: f64 = 1e-5;
pub const DEFAULT_GRID_SAMPLES: usize = 1000;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SearchStrategy {
    /// Step the parameter by an amount proportional to the current overlap.
    #[default]
    Adaptive,
    /// Evaluate `samples + 1` evenly spaced parameter values.
    Grid { samples: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleConfig {
    pub min: f64,
    pub max: f64,
    pub tolerance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub target_site: String,
    pub target_index: usize,
    pub lower: f64,
    pub upper: f64,
    pub degenerate_offset: f64,
    pub overlap_tolerance: f64,
    pub strategy: SearchStrategy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackingConfig {
    pub group: String,
    pub scale: ScaleConfig,
    pub search: SearchConfig,
    pub parameters: GenerationParameters,
    pub species: SpeciesTable,
}

impl PackingConfig {
    /// Checks the numeric ranges and that the search target is one of the seeded parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ScaleConfig {
            min,
            max,
            tolerance,
        } = self.scale;
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min >= max {
            return Err(invalid(
                "scale",
                format!("bracket [{min}, {max}] must be finite, non-negative and non-empty"),
            ));
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(invalid(
                "scale-tolerance",
                format!("must be a positive number, got {tolerance}"),
            ));
        }

        let search = &self.search;
        if !search.lower.is_finite() || !search.upper.is_finite() || search.lower >= search.upper
        {
            return Err(invalid(
                "parameter-bounds",
                format!("[{}, {}] must be finite and non-empty", search.lower, search.upper),
            ));
        }
        if !search.degenerate_offset.is_finite() || search.degenerate_offset <= 0.0 {
            return Err(invalid(
                "degenerate-offset",
                format!("must be a positive number, got {}", search.degenerate_offset),
            ));
        }
        if !search.overlap_tolerance.is_finite() || search.overlap_tolerance <= 0.0 {
            return Err(invalid(
                "overlap-tolerance",
                format!("must be a positive number, got {}", search.overlap_tolerance),
            ));
        }
        if let SearchStrategy::Grid { samples: 0 } = search.strategy {
            return Err(invalid("grid-samples", "must be at least 1".to_string()));
        }

        match self.parameters.get(&search.target_site) {
            None => Err(invalid(
                "target-site",
                format!("site '{}' is not seeded", search.target_site),
            )),
            Some(values) if search.target_index >= values.len() => Err(invalid(
                "target-index",
                format!(
                    "site '{}' has {} free parameter(s), index {} is out of range",
                    search.target_site,
                    values.len(),
                    search.target_index
                ),
            )),
            Some(_) => Ok(()),
        }
    }
}

fn invalid(parameter: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidValue { parameter, reason }
}

#[derive(Default)]
pub struct PackingConfigBuilder {
    group: Option<String>,
    scale_min: Option<f64>,
    scale_max: Option<f64>,
    scale_tolerance: Option<f64>,
    target_site: Option<String>,
    target_index: Option<usize>,
    parameter_bounds: Option<(f64, f64)>,
    degenerate_offset: Option<f64>,
    overlap_tolerance: Option<f64>,
    strategy: Option<SearchStrategy>,
    parameters: Option<GenerationParameters>,
    species: Option<SpeciesTable>,
}

impl PackingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-filled with every field of a compiled-in scenario.
    pub fn from_preset(preset: &Preset) -> Self {
        Self::new()
            .group(preset.group)
            .scale_range(preset.scale_range.0, preset.scale_range.1)
            .scale_tolerance(preset.scale_tolerance)
            .target(preset.target_site, preset.target_index)
            .parameters(preset.generation_parameters())
            .species(preset.species_table())
    }

    pub fn group(mut self, name: &str) -> Self {
        self.group = Some(name.to_string());
        self
    }
    pub fn scale_min(mut self, min: f64) -> Self {
        self.scale_min = Some(min);
        self
    }
    pub fn scale_max(mut self, max: f64) -> Self {
        self.scale_max = Some(max);
        self
    }
    pub fn scale_range(self, min: f64, max: f64) -> Self {
        self.scale_min(min).scale_max(max)
    }
    pub fn scale_tolerance(mut self, tolerance: f64) -> Self {
        self.scale_tolerance = Some(tolerance);
        self
    }
    pub fn target_site(mut self, site: &str) -> Self {
        self.target_site = Some(site.to_string());
        self
    }
    pub fn target_index(mut self, index: usize) -> Self {
        self.target_index = Some(index);
        self
    }
    pub fn target(self, site: &str, index: usize) -> Self {
        self.target_site(site).target_index(index)
    }
    pub fn parameter_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.parameter_bounds = Some((lower, upper));
        self
    }
    pub fn degenerate_offset(mut self, offset: f64) -> Self {
        self.degenerate_offset = Some(offset);
        self
    }
    pub fn overlap_tolerance(mut self, tolerance: f64) -> Self {
        self.overlap_tolerance = Some(tolerance);
        self
    }
    pub fn strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }
    pub fn parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
    pub fn species(mut self, species: SpeciesTable) -> Self {
        self.species = Some(species);
        self
    }

    pub fn build(self) -> Result<PackingConfig, ConfigError> {
        let scale = ScaleConfig {
            min: self
                .scale_min
                .ok_or(ConfigError::MissingParameter("scale_min"))?,
            max: self
                .scale_max
                .ok_or(ConfigError::MissingParameter("scale_max"))?,
            tolerance: self
                .scale_tolerance
                .ok_or(ConfigError::MissingParameter("scale_tolerance"))?,
        };
        let (lower, upper) = self.parameter_bounds.unwrap_or(DEFAULT_PARAMETER_BOUNDS);
        let search = SearchConfig {
            target_site: self
                .target_site
                .ok_or(ConfigError::MissingParameter("target_site"))?,
            target_index: self.target_index.unwrap_or(0),
            lower,
            upper,
            degenerate_offset: self.degenerate_offset.unwrap_or(DEFAULT_DEGENERATE_OFFSET),
            overlap_tolerance: self.overlap_tolerance.unwrap_or(DEFAULT_OVERLAP_TOLERANCE),
            strategy: self.strategy.unwrap_or_default(),
        };
        let config = PackingConfig {
            group: self.group.ok_or(ConfigError::MissingParameter("group"))?,
            scale,
            search,
            parameters: self
                .parameters
                .ok_or(ConfigError::MissingParameter("parameters"))?,
            species: self
                .species
                .ok_or(ConfigError::MissingParameter("species"))?,
        };
        config.validate()?;
        Ok(config)
    }
}
