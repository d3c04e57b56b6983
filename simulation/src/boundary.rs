//! Boundary handling for neighbor lookups at the grid edges

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a lookup outside `[0, columns) x [0, rows)` is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Everything past the edge is dead.
    #[default]
    Clamped,
    /// Edges wrap around to the opposite side (torus).
    Toroidal,
}

impl BoundaryMode {
    /// Resolve `(x, y)` to a cell state, calling `lookup` with in-range
    /// coordinates only. `columns` and `rows` must be non-zero.
    ///
    /// Toroidal wrapping reduces each axis modulo its own dimension, so any
    /// offset lands on the grid.
    pub fn resolve<F>(self, x: i64, y: i64, columns: usize, rows: usize, lookup: F) -> bool
    where
        F: FnOnce(usize, usize) -> bool,
    {
        let (columns, rows) = (columns as i64, rows as i64);

        match self {
            BoundaryMode::Clamped => {
                if x < 0 || x >= columns || y < 0 || y >= rows {
                    return false;
                }
                lookup(x as usize, y as usize)
            }
            BoundaryMode::Toroidal => {
                lookup(x.rem_euclid(columns) as usize, y.rem_euclid(rows) as usize)
            }
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryMode::Clamped => f.write_str("clamped"),
            BoundaryMode::Toroidal => f.write_str("toroidal"),
        }
    }
}

impl FromStr for BoundaryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clamped" => Ok(BoundaryMode::Clamped),
            "toroidal" => Ok(BoundaryMode::Toroidal),
            other => Err(format!(
                "unknown boundary mode '{}' (expected 'clamped' or 'toroidal')",
                other
            )),
        }
    }
}
