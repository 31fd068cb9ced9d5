use crate::error::{CliError, Result};
use densepack::engine::config::SearchStrategy;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileScaleConfig {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub tolerance: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileStrategy {
    Adaptive,
    Grid,
}

impl FileStrategy {
    pub fn into_core(self, grid_samples: usize) -> SearchStrategy {
        match self {
            FileStrategy::Adaptive => SearchStrategy::Adaptive,
            FileStrategy::Grid => SearchStrategy::Grid {
                samples: grid_samples,
            },
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSearchConfig {
    pub target_site: Option<String>,
    pub target_index: Option<usize>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub strategy: Option<FileStrategy>,
    pub grid_samples: Option<usize>,
    pub degenerate_offset: Option<f64>,
    pub overlap_tolerance: Option<f64>,
}

/// One seeded Wyckoff site. `element` and `radius` fall back to the species file.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSiteConfig {
    pub element: Option<String>,
    pub radius: Option<f64>,
    pub parameters: Option<Vec<f64>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub group: Option<String>,
    pub scale: Option<FileScaleConfig>,
    pub search: Option<FileSearchConfig>,
    /// Species table (TOML or CSV), relative to the scenario file.
    pub species_file: Option<PathBuf>,
    /// When present, replaces the preset's sites entirely.
    pub sites: Option<BTreeMap<String, FileSiteConfig>>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading scenario from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: FileConfig =
            toml::from_str(&content).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?;

        if let (Some(species_file), Some(dir)) = (&config.species_file, path.parent()) {
            if species_file.is_relative() {
                config.species_file = Some(dir.join(species_file));
            }
        }
        Ok(config)
    }
}
