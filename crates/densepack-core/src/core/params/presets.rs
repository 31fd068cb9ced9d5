use super::species::SpeciesTable;
use crate::core::models::parameters::GenerationParameters;
use phf::phf_map;

/// A compiled-in packing scenario.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub description: &'static str,
    /// Space-group name as it appears in the data file.
    pub group: &'static str,
    /// `(site, element, radius)` triples.
    pub species: &'static [(&'static str, &'static str, f64)],
    /// Seeded sites with their starting parameter values.
    pub parameters: &'static [(&'static str, &'static [f64])],
    pub target_site: &'static str,
    pub target_index: usize,
    pub scale_range: (f64, f64),
    pub scale_tolerance: f64,
}

impl Preset {
    pub fn species_table(&self) -> SpeciesTable {
        let mut table = SpeciesTable::new();
        for &(site, element, radius) in self.species {
            table
                .insert(site, element, radius)
                .expect("Preset radii must be finite and non-negative");
        }
        table
    }

    pub fn generation_parameters(&self) -> GenerationParameters {
        self.parameters
            .iter()
            .map(|&(site, values)| (site, values.to_vec()))
            .collect()
    }
}

// Shannon crystal radii (Å): Fe²⁺ tetrahedral, Al³⁺ octahedral, O²⁻.
pub const HERCYNITE: Preset = Preset {
    description: "FeAl2O4 spinel on Fd3m (Fe on 8b, Al on 16c, O on 32e)",
    group: "Fd3m",
    species: &[("b", "Fe", 0.75), ("c", "Al", 0.675), ("e", "O", 1.26)],
    parameters: &[("b", &[]), ("c", &[]), ("e", &[0.0])],
    target_site: "e",
    target_index: 0,
    scale_range: (1.0, 15.0),
    scale_tolerance: 1e-3,
};

static PRESETS: phf::Map<&'static str, Preset> = phf_map! {
    "hercynite" => HERCYNITE,
};

pub const DEFAULT_PRESET: &str = "hercynite";

pub fn default_preset() -> &'static Preset {
    &HERCYNITE
}

pub fn get(name: &str) -> Option<&'static Preset> {
    PRESETS.get(name)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.keys().copied()
}
