use densepack::engine::config as core_config;
use std::path::PathBuf;

pub struct AppConfig {
    pub data_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub core_config: core_config::PackingConfig,
}
