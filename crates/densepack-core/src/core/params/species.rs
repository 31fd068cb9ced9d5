use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// The sphere placed on one Wyckoff site.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Species {
    /// Element label written to result files (e.g., "Fe").
    pub element: String,
    /// Sphere radius, in the same length unit as the lattice scale.
    pub radius: f64,
}

/// Radius table keyed by site name, iterated in site-name order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesTable {
    entries: BTreeMap<String, Species>,
}

#[derive(Debug, Error)]
pub enum SpeciesError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Radius of site '{site}' must be a finite non-negative number, got {radius}")]
    InvalidRadius { site: String, radius: f64 },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpeciesFile {
    sites: BTreeMap<String, Species>,
}

#[derive(Debug, Deserialize)]
struct SpeciesRecord {
    site: String,
    element: String,
    radius: f64,
}

impl SpeciesTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, site: &str, element: &str, radius: f64) -> Result<(), SpeciesError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(SpeciesError::InvalidRadius {
                site: site.to_string(),
                radius,
            });
        }
        self.entries.insert(
            site.to_string(),
            Species {
                element: element.to_string(),
                radius,
            },
        );
        Ok(())
    }

    pub fn get(&self, site: &str) -> Option<&Species> {
        self.entries.get(site)
    }

    pub fn radius(&self, site: &str) -> Option<f64> {
        self.entries.get(site).map(|s| s.radius)
    }

    pub fn element(&self, site: &str) -> Option<&str> {
        self.entries.get(site).map(|s| s.element.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Species)> {
        self.entries.iter().map(|(site, s)| (site.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a table from `(site, species)` pairs, validating every radius.
    pub fn from_entries<I>(entries: I) -> Result<Self, SpeciesError>
    where
        I: IntoIterator<Item = (String, Species)>,
    {
        let mut table = Self::new();
        for (site, species) in entries {
            table.insert(&site, &species.element, species.radius)?;
        }
        Ok(table)
    }

    /// Parses a TOML document with one `[sites.<name>]` table per site.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, SpeciesError> {
        let file: SpeciesFile = toml::from_str(content).map_err(|e| SpeciesError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        Self::from_entries(file.sites)
    }

    pub fn load_toml(path: &Path) -> Result<Self, SpeciesError> {
        let content = std::fs::read_to_string(path).map_err(|e| SpeciesError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.to_string_lossy())
    }

    /// Loads a `site,element,radius` CSV file with a header row.
    pub fn load_csv(path: &Path) -> Result<Self, SpeciesError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| SpeciesError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut table = Self::new();
        for result in reader.deserialize::<SpeciesRecord>() {
            let record = result.map_err(|e| SpeciesError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            table.insert(&record.site, &record.element, record.radius)?;
        }
        Ok(table)
    }

    /// Loads by extension: `.csv` as CSV, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self, SpeciesError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::load_csv(path),
            _ => Self::load_toml(path),
        }
    }
}
