use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::asymmetric_unit::OrbitError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Orbit expansion failed: {source}")]
    Orbit {
        #[from]
        source: OrbitError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("No radius is defined for site '{site}'")]
    MissingRadius { site: String },

    #[error("Search target {site}[{index}] is not a free parameter of the configuration")]
    InvalidTarget { site: String, index: usize },

    #[error("Guide vector {index} of site '{site}' has zero length")]
    ZeroGuide { site: String, index: usize },

    #[error("No non-degenerate configuration found for scales in [{min}, {max}]")]
    NoValidConfiguration { min: f64, max: f64 },
}
