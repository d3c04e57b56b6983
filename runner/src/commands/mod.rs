pub mod maps;
pub mod prefs;
pub mod run;

use crate::cli::GridArgs;
use lifegrid::{Preferences, SimulationConfig};

/// Command-line values win over preferences and defaults
fn apply_grid_args(mut config: SimulationConfig, args: &GridArgs) -> SimulationConfig {
    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(speed) = args.speed {
        config.steps_per_second = speed;
    }
    if let Some(mode) = args.mode {
        config.boundary_mode = mode;
    }
    config
}

fn merge_preferences(mut prefs: Preferences, args: &GridArgs) -> Preferences {
    prefs.columns = args.columns.or(prefs.columns);
    prefs.rows = args.rows.or(prefs.rows);
    prefs.speed = args.speed.or(prefs.speed);
    prefs.boundary_mode = args.mode.or(prefs.boundary_mode);
    prefs
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid::BoundaryMode;

    #[test]
    fn test_args_override_preferences() {
        let prefs = Preferences {
            columns: Some(20),
            speed: Some(8),
            ..Default::default()
        };
        let args = GridArgs {
            speed: Some(1),
            mode: Some(BoundaryMode::Toroidal),
            ..Default::default()
        };

        let config = apply_grid_args(SimulationConfig::default().with_preferences(&prefs), &args);
        assert_eq!(config.columns, 20);
        assert_eq!(config.rows, 10);
        assert_eq!(config.steps_per_second, 1);
        assert_eq!(config.boundary_mode, BoundaryMode::Toroidal);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let prefs = Preferences {
            rows: Some(12),
            ..Default::default()
        };
        let args = GridArgs {
            columns: Some(40),
            ..Default::default()
        };

        let merged = merge_preferences(prefs, &args);
        assert_eq!(merged.columns, Some(40));
        assert_eq!(merged.rows, Some(12));
        assert_eq!(merged.speed, None);
    }
}
