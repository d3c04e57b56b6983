use anyhow::{Context, Result};
use lifegrid::SimulationConfig;
use tracing::info;

use super::merge_preferences;
use crate::cli::GridArgs;
use crate::state::AppState;

pub fn show_or_update(state: &AppState, args: GridArgs) -> Result<()> {
    let stored = state.load_preferences()?;
    let prefs = merge_preferences(stored.clone(), &args);

    let effective = SimulationConfig::default().with_preferences(&prefs);
    effective
        .validate()
        .context("Preferences would produce an invalid configuration")?;

    if prefs != stored {
        state.save_preferences(&prefs)?;
        info!("Preferences updated");
    }

    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(())
}
