use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileSiteConfig, FileStrategy};
use super::models::AppConfig;
use crate::cli::{FitArgs, StrategyArg};
use crate::error::{CliError, Result};
use crate::utils::parser;
use densepack::core::models::parameters::GenerationParameters;
use densepack::core::params::presets::Preset;
use densepack::core::params::species::SpeciesTable;
use densepack::engine::config::{self as core_config, DEFAULT_PARAMETER_BOUNDS};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub fn build_config(args: &FitArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let preset = defaults.preset;

    let mut file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    if file_config.sites.is_none() {
        file_config.sites = Some(preset_sites(preset));
    }

    let file_config = apply_set_values(file_config, &args.set_values)?;

    let scale_file = file_config.scale.clone().unwrap_or_default();
    let search_file = file_config.search.clone().unwrap_or_default();

    let group = args
        .group
        .clone()
        .or(file_config.group.clone())
        .unwrap_or_else(|| preset.group.to_string());

    let scale_min = args
        .scale_min
        .or(scale_file.min)
        .unwrap_or(preset.scale_range.0);
    let scale_max = args
        .scale_max
        .or(scale_file.max)
        .unwrap_or(preset.scale_range.1);
    let scale_tolerance = args
        .tolerance
        .or(scale_file.tolerance)
        .unwrap_or(preset.scale_tolerance);

    let (target_site, target_index) = match &args.target {
        Some(target) => {
            parser::parse_target(target).map_err(|e| CliError::Argument(e.to_string()))?
        }
        None => (
            search_file
                .target_site
                .clone()
                .unwrap_or_else(|| preset.target_site.to_string()),
            search_file.target_index.unwrap_or(preset.target_index),
        ),
    };

    let grid_samples = search_file.grid_samples.unwrap_or(defaults.grid_samples);
    let strategy = match args.strategy {
        Some(StrategyArg::Adaptive) => FileStrategy::Adaptive,
        Some(StrategyArg::Grid) => FileStrategy::Grid,
        None => search_file.strategy.unwrap_or(FileStrategy::Adaptive),
    }
    .into_core(grid_samples);

    let (parameters, species) = resolve_sites(&file_config)?;

    let mut builder = core_config::PackingConfigBuilder::new()
        .group(&group)
        .scale_range(scale_min, scale_max)
        .scale_tolerance(scale_tolerance)
        .target(&target_site, target_index)
        .parameter_bounds(
            search_file.lower.unwrap_or(DEFAULT_PARAMETER_BOUNDS.0),
            search_file.upper.unwrap_or(DEFAULT_PARAMETER_BOUNDS.1),
        )
        .strategy(strategy)
        .parameters(parameters)
        .species(species);
    if let Some(offset) = search_file.degenerate_offset {
        builder = builder.degenerate_offset(offset);
    }
    if let Some(tolerance) = search_file.overlap_tolerance {
        builder = builder.overlap_tolerance(tolerance);
    }

    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!(group = %core_config.group, sites = core_config.parameters.len(), "Scenario resolved.");

    Ok(AppConfig {
        data_path: args.data.clone(),
        output_path: args.output.clone(),
        core_config,
    })
}

fn preset_sites(preset: &Preset) -> BTreeMap<String, FileSiteConfig> {
    let species = preset.species_table();
    preset
        .generation_parameters()
        .iter()
        .map(|(site, values)| {
            let entry = species.get(site);
            (
                site.to_string(),
                FileSiteConfig {
                    element: entry.map(|s| s.element.clone()),
                    radius: entry.map(|s| s.radius),
                    parameters: Some(values.to_vec()),
                },
            )
        })
        .collect()
}

/// Splits the site table into seed parameters and a species table.
///
/// Sites without a radius in either the table or the species file are seeded but get no
/// species entry, so the workflow reports them as missing a radius.
fn resolve_sites(config: &FileConfig) -> Result<(GenerationParameters, SpeciesTable)> {
    let species_file = match &config.species_file {
        Some(path) => Some(load_species(path)?),
        None => None,
    };
    let mut parameters = GenerationParameters::new();
    let mut species = SpeciesTable::new();
    for (site, entry) in config.sites.iter().flatten() {
        parameters.set(site, entry.parameters.clone().unwrap_or_default());

        let known = species_file.as_ref().and_then(|table| table.get(site));
        let Some(radius) = entry.radius.or(known.map(|s| s.radius)) else {
            continue;
        };
        let element = entry
            .element
            .clone()
            .or_else(|| known.map(|s| s.element.clone()))
            .unwrap_or_else(|| site.clone());
        species
            .insert(site, &element, radius)
            .map_err(|e| CliError::Config(e.to_string()))?;
    }
    Ok((parameters, species))
}

fn load_species(path: &Path) -> Result<SpeciesTable> {
    SpeciesTable::load(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn parse_number<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "group" => config.group = Some(value_str.to_string()),
            "species-file" => config.species_file = Some(value_str.into()),
            "scale.min" => {
                config.scale.get_or_insert_with(Default::default).min =
                    Some(parse_number(key, value_str, "float")?);
            }
            "scale.max" => {
                config.scale.get_or_insert_with(Default::default).max =
                    Some(parse_number(key, value_str, "float")?);
            }
            "scale.tolerance" => {
                config.scale.get_or_insert_with(Default::default).tolerance =
                    Some(parse_number(key, value_str, "float")?);
            }
            "search.target-site" => {
                config.search.get_or_insert_with(Default::default).target_site =
                    Some(value_str.to_string());
            }
            "search.target-index" => {
                config.search.get_or_insert_with(Default::default).target_index =
                    Some(parse_number(key, value_str, "integer")?);
            }
            "search.lower" => {
                config.search.get_or_insert_with(Default::default).lower =
                    Some(parse_number(key, value_str, "float")?);
            }
            "search.upper" => {
                config.search.get_or_insert_with(Default::default).upper =
                    Some(parse_number(key, value_str, "float")?);
            }
            "search.strategy" => {
                let strategy = match value_str {
                    "adaptive" => FileStrategy::Adaptive,
                    "grid" => FileStrategy::Grid,
                    _ => {
                        return Err(CliError::Config(format!(
                            "Invalid strategy for {}: {} (expected 'adaptive' or 'grid')",
                            key, value_str
                        )));
                    }
                };
                config.search.get_or_insert_with(Default::default).strategy = Some(strategy);
            }
            "search.grid-samples" => {
                config.search.get_or_insert_with(Default::default).grid_samples =
                    Some(parse_number(key, value_str, "integer")?);
            }
            "search.degenerate-offset" => {
                config
                    .search
                    .get_or_insert_with(Default::default)
                    .degenerate_offset = Some(parse_number(key, value_str, "float")?);
            }
            "search.overlap-tolerance" => {
                config
                    .search
                    .get_or_insert_with(Default::default)
                    .overlap_tolerance = Some(parse_number(key, value_str, "float")?);
            }
            _ => {
                let Some((site, field)) = key
                    .strip_prefix("sites.")
                    .and_then(|rest| rest.rsplit_once('.'))
                else {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                };
                let entry = config
                    .sites
                    .get_or_insert_with(Default::default)
                    .entry(site.to_string())
                    .or_default();
                match field {
                    "element" => entry.element = Some(value_str.to_string()),
                    "radius" => entry.radius = Some(parse_number(key, value_str, "float")?),
                    "parameters" => {
                        entry.parameters = Some(
                            parser::parse_values(value_str)
                                .map_err(|e| CliError::Config(e.to_string()))?,
                        );
                    }
                    _ => {
                        return Err(CliError::Config(format!(
                            "Unsupported site field for --set: '{}'",
                            key
                        )));
                    }
                }
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use densepack::engine::config::SearchStrategy;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn fit_args(extra: &[&str]) -> FitArgs {
        let mut argv = vec!["densepack", "fit", "-d", "CUBIC.DAT"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Fit(args) => args,
            _ => panic!("Expected 'fit' subcommand"),
        }
    }

    #[test]
    fn build_config_without_scenario_uses_hercynite_preset() {
        let app = build_config(&fit_args(&[])).unwrap();
        let cfg = app.core_config;

        assert_eq!(app.data_path, PathBuf::from("CUBIC.DAT"));
        assert!(app.output_path.is_none());
        assert_eq!(cfg.group, "Fd3m");
        assert_eq!(cfg.scale.min, 1.0);
        assert_eq!(cfg.scale.max, 15.0);
        assert_eq!(cfg.search.target_site, "e");
        assert_eq!(cfg.search.strategy, SearchStrategy::Adaptive);
        assert_eq!(cfg.parameters.sites().collect::<Vec<_>>(), vec!["b", "c", "e"]);
        assert_eq!(cfg.species.element("b"), Some("Fe"));
        assert_eq!(cfg.species.radius("e"), Some(1.26));
    }

    #[test]
    fn scenario_sites_replace_preset_sites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pm3m.toml");
        fs::write(
            &path,
            r#"
            group = "Pm3m"
            [scale]
            min = 1.0
            max = 10.0
            tolerance = 1e-3
            [search]
            target-site = "e"
            [sites.a]
            element = "Cs"
            radius = 1.0
            [sites.e]
            element = "Cl"
            radius = 1.0
            parameters = [0.0]
            "#,
        )
        .unwrap();

        let app =
            build_config(&fit_args(&["-c", path.to_str().unwrap(), "-o", "out.dat"])).unwrap();
        let cfg = app.core_config;

        assert_eq!(app.output_path, Some(PathBuf::from("out.dat")));
        assert_eq!(cfg.group, "Pm3m");
        assert_eq!(cfg.scale.max, 10.0);
        assert_eq!(cfg.parameters.sites().collect::<Vec<_>>(), vec!["a", "e"]);
        assert_eq!(cfg.species.element("a"), Some("Cs"));
        assert!(cfg.species.get("b").is_none());
    }

    #[test]
    fn cli_flags_override_file_and_set_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        fs::write(&path, "[scale]\nmin = 2.0\nmax = 12.0\n").unwrap();

        let app = build_config(&fit_args(&[
            "-c",
            path.to_str().unwrap(),
            "-S",
            "scale.min=3.0",
            "-S",
            "scale.max=11.0",
            "--scale-max",
            "9.0",
            "--strategy",
            "grid",
        ]))
        .unwrap();
        let cfg = app.core_config;

        assert_eq!(cfg.scale.min, 3.0);
        assert_eq!(cfg.scale.max, 9.0);
        assert_eq!(
            cfg.search.strategy,
            SearchStrategy::Grid {
                samples: densepack::engine::config::DEFAULT_GRID_SAMPLES
            }
        );
    }

    #[test]
    fn set_values_edit_individual_sites_and_search() {
        let app = build_config(&fit_args(&[
            "-S",
            "sites.e.radius=1.4",
            "-S",
            "sites.e.parameters=0.25",
            "-S",
            "search.strategy=grid",
            "-S",
            "search.grid-samples=64",
            "-S",
            "search.overlap-tolerance=1e-7",
        ]))
        .unwrap();
        let cfg = app.core_config;

        assert_eq!(cfg.species.radius("e"), Some(1.4));
        assert_eq!(cfg.species.element("e"), Some("O"));
        assert_eq!(cfg.parameters.get("e"), Some(&[0.25][..]));
        assert_eq!(cfg.parameters.len(), 3);
        assert_eq!(cfg.search.strategy, SearchStrategy::Grid { samples: 64 });
        assert_eq!(cfg.search.overlap_tolerance, 1e-7);
    }

    #[test]
    fn target_flag_selects_site_and_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f.toml");
        fs::write(
            &path,
            r#"
            group = "Fd3m"
            [sites.f]
            radius = 0.5
            parameters = [0.1]
            "#,
        )
        .unwrap();

        let app = build_config(&fit_args(&["-c", path.to_str().unwrap(), "--target", "f:0"]))
            .unwrap();
        assert_eq!(app.core_config.search.target_site, "f");
        assert_eq!(app.core_config.search.target_index, 0);
        assert_eq!(app.core_config.species.element("f"), Some("f"));
    }

    #[test]
    fn species_file_supplies_missing_radii() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("radii.csv"),
            "site,element,radius\na,Cs,1.1\ne,Cl,0.9\n",
        )
        .unwrap();
        let path = dir.path().join("scenario.toml");
        fs::write(
            &path,
            r#"
            group = "Pm3m"
            species-file = "radii.csv"
            [sites.a]
            [sites.e]
            radius = 1.0
            parameters = [0.0]
            "#,
        )
        .unwrap();

        let app = build_config(&fit_args(&["-c", path.to_str().unwrap()])).unwrap();
        let species = &app.core_config.species;

        assert_eq!(species.radius("a"), Some(1.1));
        assert_eq!(species.element("a"), Some("Cs"));
        assert_eq!(species.radius("e"), Some(1.0));
        assert_eq!(species.element("e"), Some("Cl"));
    }

    #[test]
    fn invalid_set_values_are_rejected() {
        for set in [
            "scale.min",
            "scale.min=abc",
            "search.strategy=random",
            "sites.e.colour=red",
            "unknown.key=1",
            "sites.e.parameters=0.1,x",
        ] {
            let result = build_config(&fit_args(&["-S", set]));
            assert!(matches!(result, Err(CliError::Config(_))), "accepted '{set}'");
        }
    }

    #[test]
    fn invalid_target_is_an_argument_error() {
        let result = build_config(&fit_args(&["--target", "e:first"]));
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn invalid_bracket_is_a_config_error() {
        let result = build_config(&fit_args(&["--scale-min", "9", "--scale-max", "3"]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn zero_overlap_tolerance_is_a_config_error() {
        let result = build_config(&fit_args(&["-S", "search.overlap-tolerance=0"]));
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("overlap-tolerance"), "{msg}"),
            other => panic!("Expected Config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn bundled_scenarios_build() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/scenarios");

        let hercynite = dir.join("hercynite.toml");
        let app = build_config(&fit_args(&["-c", hercynite.to_str().unwrap()])).unwrap();
        assert_eq!(app.core_config, build_config(&fit_args(&[])).unwrap().core_config);

        let pm3m = dir.join("pm3m-demo.toml");
        let app = build_config(&fit_args(&["-c", pm3m.to_str().unwrap()])).unwrap();
        let cfg = app.core_config;
        assert_eq!(cfg.group, "Pm3m");
        assert_eq!(cfg.search.strategy, SearchStrategy::Grid { samples: 400 });
        assert_eq!(cfg.species.element("a"), Some("Cs"));
        assert_eq!(cfg.species.radius("e"), Some(0.5));
    }
}
