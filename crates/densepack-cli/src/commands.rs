pub mod expand;
pub mod fit;
pub mod groups;

use crate::error::{CliError, Result};
use densepack::core::io::{cubic::CubicDataFile, traits::SpaceGroupFile};
use densepack::core::models::asymmetric_unit::AsymmetricUnit;
use densepack::core::models::library::SpaceGroupLibrary;
use std::path::Path;
use tracing::info;

fn load_library(path: &Path) -> Result<SpaceGroupLibrary> {
    info!("Loading space-group data from {:?}", path);
    let library = CubicDataFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    info!(groups = library.len(), "Space-group data loaded.");
    Ok(library)
}

fn find_group<'a>(library: &'a SpaceGroupLibrary, name: &str) -> Result<&'a AsymmetricUnit> {
    library.get(name).ok_or_else(|| {
        CliError::Argument(format!(
            "Space group '{}' is not in the data file. Available: {}",
            name,
            library.names().collect::<Vec<_>>().join(", ")
        ))
    })
}
