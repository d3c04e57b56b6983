//! Persistence module for encoding/decoding grid maps
//!
//! A map is a textual JSON record of the grid's dimensions and every cell's
//! alive flag. Coordinates are written for readability but recomputed on
//! decode; any that disagree with the row-major position reject the map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LifeError, Result};
use crate::grid::Grid;

/// Current schema version
pub const MAP_VERSION: u8 = 1;

fn default_version() -> u8 {
    MAP_VERSION
}

// ============================================================================
// Map Data Structures
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedMap {
    #[serde(default = "default_version")]
    pub version: u8,
    pub name: String,
    pub columns: usize,
    pub rows: usize,
    pub cells: Vec<SerializedCell>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedCell {
    pub x: usize,
    pub y: usize,
    pub alive: bool,
}

// ============================================================================
// Codec
// ============================================================================

/// Snapshot a grid under `name`
pub fn encode(grid: &Grid, name: &str) -> SerializedMap {
    SerializedMap {
        version: MAP_VERSION,
        name: name.to_string(),
        columns: grid.columns(),
        rows: grid.rows(),
        cells: grid
            .cells()
            .iter()
            .map(|c| SerializedCell {
                x: c.x,
                y: c.y,
                alive: c.alive,
            })
            .collect(),
        saved_at: Some(Utc::now()),
    }
}

/// Rebuild a grid from a map record
pub fn decode(map: &SerializedMap) -> Result<Grid> {
    if map.version != MAP_VERSION {
        return Err(LifeError::CorruptMap(format!(
            "unsupported map version {}",
            map.version
        )));
    }

    let expected = map.columns.checked_mul(map.rows).ok_or_else(|| {
        LifeError::CorruptMap(format!("dimensions {}x{} overflow", map.columns, map.rows))
    })?;
    if map.cells.len() != expected {
        return Err(LifeError::CorruptMap(format!(
            "{}x{} map holds {} cells, expected {}",
            map.columns,
            map.rows,
            map.cells.len(),
            expected
        )));
    }

    for (index, cell) in map.cells.iter().enumerate() {
        let (x, y) = (index % map.columns, index / map.columns);
        if cell.x != x || cell.y != y {
            return Err(LifeError::CorruptMap(format!(
                "cell {} claims ({}, {}) but sits at ({}, {})",
                index, cell.x, cell.y, x, y
            )));
        }
    }

    let alive: Vec<bool> = map.cells.iter().map(|c| c.alive).collect();
    Grid::from_state(map.columns, map.rows, &alive)
}

pub fn to_json(map: &SerializedMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(map)?)
}

pub fn from_json(json: &str) -> Result<SerializedMap> {
    serde_json::from_str(json).map_err(|e| LifeError::CorruptMap(format!("JSON parse error: {}", e)))
}
