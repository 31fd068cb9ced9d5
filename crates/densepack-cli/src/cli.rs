use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "DensePack Developers",
    version,
    about = "DensePack CLI - Find the densest non-overlapping sphere packing on the Wyckoff sites of a cubic space group.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search for the smallest lattice scale at which the configured spheres do not overlap.
    Fit(FitArgs),
    /// Expand the orbits of a set of sites and report the generated atoms.
    Expand(ExpandArgs),
    /// List the space groups and Wyckoff sites of a data file.
    Groups(GroupsArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// Step the free parameter proportionally to the current overlap.
    Adaptive,
    /// Scan evenly spaced parameter values.
    Grid,
}

/// Arguments for the `fit` subcommand.
#[derive(Args, Debug)]
pub struct FitArgs {
    // --- Core Arguments ---
    /// Path to the space-group data file (CUBIC.DAT format).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub data: PathBuf,

    /// Path to a scenario file in TOML format. The built-in hercynite scenario is used
    /// for every value it does not set.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the packed structure to this result file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Scenario Overrides ---
    /// Override the space group.
    #[arg(short, long, value_name = "NAME")]
    pub group: Option<String>,

    /// Override the lower end of the lattice-scale bracket.
    #[arg(long, value_name = "FLOAT")]
    pub scale_min: Option<f64>,

    /// Override the upper end of the lattice-scale bracket.
    #[arg(long, value_name = "FLOAT")]
    pub scale_max: Option<f64>,

    /// Override the bracket width at which bisection stops.
    #[arg(short, long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Override the free parameter to search, as SITE or SITE:INDEX.
    #[arg(long, value_name = "SITE[:INDEX]")]
    pub target: Option<String>,

    /// Override the inner search strategy.
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub strategy: Option<StrategyArg>,

    /// Set a specific configuration value, overriding the scenario file.
    /// Can be used multiple times. Example: -S search.grid-samples=200
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `expand` subcommand.
#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Path to the space-group data file (CUBIC.DAT format).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub data: PathBuf,

    /// Space group to expand.
    #[arg(short, long, required = true, value_name = "NAME")]
    pub group: String,

    /// Seed a site with its free parameters, as SITE or SITE=v1,v2,...
    /// Can be used multiple times.
    #[arg(short = 'p', long = "site", value_name = "SITE=VALUES", required = true)]
    pub sites: Vec<String>,

    /// Species table (TOML or CSV) used for labels and radii in the result file.
    #[arg(long, value_name = "PATH")]
    pub species: Option<PathBuf>,

    /// Accept orbits with fewer atoms than the Wyckoff multiplicity.
    #[arg(long)]
    pub no_count_check: bool,

    /// Write the expanded structure to this result file at unit scale.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `groups` subcommand.
#[derive(Args, Debug)]
pub struct GroupsArgs {
    /// Path to the space-group data file (CUBIC.DAT format).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub data: PathBuf,
}
