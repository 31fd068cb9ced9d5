use densepack::core::params::presets::{self, Preset};
use densepack::engine::config::DEFAULT_GRID_SAMPLES;

pub struct DefaultsConfig {
    pub preset: &'static Preset,
    pub grid_samples: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            preset: presets::default_preset(),
            grid_samples: DEFAULT_GRID_SAMPLES,
        }
    }
}
