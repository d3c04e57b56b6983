//! LifeGrid command-line host
//!
//! Composes the simulation, map store and terminal renderer, and drives the
//! tick loop.

mod cli;
mod commands;
mod logging;
mod state;
mod terminal;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use cli::{Cli, Commands};
use state::AppState;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;
    debug!(?cli, "Parsed arguments");

    let state = AppState::new(&cli.data_dir, cli.threads);

    match cli.command {
        Commands::Run(args) => commands::run::run(&state, args),
        Commands::Maps => commands::maps::list(&state),
        Commands::Prefs(args) => commands::prefs::show_or_update(&state, args),
    }
}
