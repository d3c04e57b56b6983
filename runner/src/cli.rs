use clap::{Args, Parser, Subcommand};
use lifegrid::BoundaryMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "LifeGrid - Conway's Game of Life on a fixed grid, evaluated in parallel."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding saved maps and preferences
    #[arg(long, global = true, env = "LIFEGRID_DATA_DIR", default_value = ".lifegrid", value_name = "PATH")]
    pub data_dir: PathBuf,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Number of worker threads for generation evaluation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the simulation, printing each generation.
    Run(RunArgs),
    /// List saved maps.
    Maps,
    /// Show or update stored preferences.
    Prefs(GridArgs),
}

/// Grid settings shared by `run` and `prefs`.
#[derive(Args, Debug, Default, Clone)]
pub struct GridArgs {
    /// Number of columns (1-50)
    #[arg(long, value_name = "N")]
    pub columns: Option<usize>,

    /// Number of rows (1-50)
    #[arg(long, value_name = "N")]
    pub rows: Option<usize>,

    /// Generations per second
    #[arg(long, value_name = "N")]
    pub speed: Option<u32>,

    /// Edge handling: clamped or toroidal
    #[arg(long, value_name = "MODE")]
    pub mode: Option<BoundaryMode>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub grid: GridArgs,

    /// Load this saved map instead of starting from an empty grid
    #[arg(long, value_name = "NAME", conflicts_with = "seed")]
    pub load: Option<String>,

    /// Fill the grid randomly using this seed
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Probability of a cell starting alive when seeding
    #[arg(long, default_value_t = 0.3, value_name = "FLOAT")]
    pub density: f64,

    /// Stop after this many generations. Without a limit the run continues
    /// until Enter is pressed; either way the final grid is then saved.
    /// Interrupting with Ctrl-C skips the save.
    #[arg(short = 'n', long, value_name = "N")]
    pub generations: Option<u64>,

    /// Name to save the final grid under
    #[arg(long, default_value = "Last", value_name = "NAME")]
    pub save: String,

    /// Do not save the final grid
    #[arg(long, conflicts_with = "save")]
    pub no_save: bool,

    /// Do not print generations to the terminal
    #[arg(long)]
    pub no_render: bool,
}
