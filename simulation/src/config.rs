//! Simulation configuration and persisted user preferences

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::boundary::BoundaryMode;
use crate::error::{LifeError, Result};

/// Largest accepted column/row count
pub const MAX_DIMENSION: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub columns: usize,
    pub rows: usize,
    pub steps_per_second: u32,
    pub boundary_mode: BoundaryMode,
    /// `None` uses rayon's global pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_threads: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 10,
            steps_per_second: 2,
            boundary_mode: BoundaryMode::Clamped,
            worker_threads: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        let in_range = |n: usize| (1..=MAX_DIMENSION).contains(&n);
        if !in_range(self.columns) || !in_range(self.rows) {
            return Err(LifeError::InvalidDimension {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.steps_per_second == 0 {
            return Err(LifeError::InvalidSpeed(self.steps_per_second));
        }
        Ok(())
    }

    /// Overlay stored preferences onto this config
    pub fn with_preferences(mut self, prefs: &Preferences) -> Self {
        if let Some(columns) = prefs.columns {
            self.columns = columns;
        }
        if let Some(rows) = prefs.rows {
            self.rows = rows;
        }
        if let Some(speed) = prefs.speed {
            self.steps_per_second = speed;
        }
        if let Some(mode) = prefs.boundary_mode {
            self.boundary_mode = mode;
        }
        self
    }

    /// Time between steps. Only meaningful for a validated config.
    pub fn step_interval(&self) -> Duration {
        Duration::from_secs(1) / self.steps_per_second.max(1)
    }
}

/// User preferences; absent fields fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary_mode: Option<BoundaryMode>,
}

impl Preferences {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
