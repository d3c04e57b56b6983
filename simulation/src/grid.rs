//! Grid - the cell data model
//!
//! Cells are stored row-major: `index = y * columns + x`. The only bulk
//! mutation path is [`Grid::apply`]; `toggle`/`set_alive` exist for manual
//! editing between runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{LifeError, Result};

// ============================================================================
// Cell
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub alive: bool,
}

// ============================================================================
// Generation Delta
// ============================================================================

/// Set of cell indices whose state flips in one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationDelta {
    indices: BTreeSet<usize>,
}

impl GenerationDelta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the index was already present.
    pub fn insert(&mut self, index: usize) -> bool {
        self.indices.insert(index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }
}

impl FromIterator<usize> for GenerationDelta {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

impl Extend<usize> for GenerationDelta {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        self.indices.extend(iter);
    }
}

// ============================================================================
// Grid
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid with every cell dead
    pub fn new(columns: usize, rows: usize) -> Result<Self> {
        Self::build(columns, rows, |_| false)
    }

    /// Rebuild a grid from row-major alive flags
    pub fn from_state(columns: usize, rows: usize, alive: &[bool]) -> Result<Self> {
        check_dimensions(columns, rows)?;
        let expected = columns * rows;
        if alive.len() != expected {
            return Err(LifeError::DimensionMismatch {
                expected,
                actual: alive.len(),
            });
        }
        Self::build(columns, rows, |index| alive[index])
    }

    /// Seeded random fill; `density` is the probability of a cell starting alive.
    pub fn random(columns: usize, rows: usize, density: f64, seed: u64) -> Result<Self> {
        let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        let mut rng = StdRng::seed_from_u64(seed);
        Self::build(columns, rows, |_| rng.gen_bool(density))
    }

    fn build<F>(columns: usize, rows: usize, mut alive: F) -> Result<Self>
    where
        F: FnMut(usize) -> bool,
    {
        check_dimensions(columns, rows)?;

        let mut cells = Vec::with_capacity(columns * rows);
        for y in 0..rows {
            for x in 0..columns {
                let index = y * columns + x;
                cells.push(Cell {
                    x,
                    y,
                    alive: alive(index),
                });
            }
        }

        Ok(Self { columns, rows, cells })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Row-major index for a coordinate, `None` when outside the grid
    pub fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.columns || y >= self.rows {
            return None;
        }
        Some(y * self.columns + x)
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        x < self.columns && y < self.rows && self.cells[y * self.columns + x].alive
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.alive).count()
    }

    pub fn alive_flags(&self) -> Vec<bool> {
        self.cells.iter().map(|c| c.alive).collect()
    }

    /// Flip every cell in the delta. Indices are validated first, so a bad
    /// delta leaves the grid untouched.
    pub fn apply(&mut self, delta: &GenerationDelta) -> Result<()> {
        let len = self.cells.len();
        if let Some(index) = delta.iter().find(|&i| i >= len) {
            return Err(LifeError::IndexOutOfRange { index, len });
        }

        for index in delta.iter() {
            let cell = &mut self.cells[index];
            cell.alive = !cell.alive;
        }
        Ok(())
    }

    /// Toggle one cell, returning its new state
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(LifeError::IndexOutOfRange { index, len })?;
        cell.alive = !cell.alive;
        Ok(cell.alive)
    }

    /// Set one cell, returning whether its state changed
    pub fn set_alive(&mut self, index: usize, alive: bool) -> Result<bool> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(LifeError::IndexOutOfRange { index, len })?;
        let changed = cell.alive != alive;
        cell.alive = alive;
        Ok(changed)
    }
}

fn check_dimensions(columns: usize, rows: usize) -> Result<()> {
    if columns < 1 || rows < 1 {
        return Err(LifeError::InvalidDimension { columns, rows });
    }
    Ok(())
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.columns) {
            for cell in row {
                f.write_str(if cell.alive { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_dead_and_row_major() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.population(), 0);

        for (index, cell) in grid.cells().iter().enumerate() {
            assert_eq!(index, cell.y * 4 + cell.x);
        }
        assert_eq!(grid.cell(5), Some(&Cell { x: 1, y: 1, alive: false }));
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(LifeError::InvalidDimension { columns: 0, rows: 5 })
        ));
        assert!(matches!(Grid::new(3, 0), Err(LifeError::InvalidDimension { .. })));
    }

    #[test]
    fn test_from_state_length_mismatch() {
        let result = Grid::from_state(3, 3, &[true; 8]);
        assert!(matches!(
            result,
            Err(LifeError::DimensionMismatch { expected: 9, actual: 8 })
        ));
    }

    #[test]
    fn test_apply_deduplicates_and_flips_once() {
        let mut grid = Grid::new(3, 3).unwrap();
        let delta: GenerationDelta = [4, 4, 0, 4].into_iter().collect();
        assert_eq!(delta.len(), 2);

        grid.apply(&delta).unwrap();
        assert!(grid.is_alive(1, 1));
        assert!(grid.is_alive(0, 0));
        assert_eq!(grid.population(), 2);
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let mut grid = Grid::new(2, 2).unwrap();
        let delta: GenerationDelta = [0, 1, 9].into_iter().collect();

        let result = grid.apply(&delta);
        assert!(matches!(result, Err(LifeError::IndexOutOfRange { index: 9, len: 4 })));
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn test_toggle_and_set_alive() {
        let mut grid = Grid::new(2, 2).unwrap();
        assert!(grid.toggle(3).unwrap());
        assert!(!grid.set_alive(3, true).unwrap());
        assert!(grid.set_alive(3, false).unwrap());
        assert!(matches!(grid.toggle(4), Err(LifeError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_index_of_bounds() {
        let grid = Grid::new(5, 2).unwrap();
        assert_eq!(grid.index_of(4, 1), Some(9));
        assert_eq!(grid.index_of(5, 0), None);
        assert_eq!(grid.index_of(0, 2), None);
        assert_eq!(grid.index_of(-1, 0), None);
    }

    #[test]
    fn test_random_is_seeded() {
        let a = Grid::random(10, 10, 0.4, 7).unwrap();
        let b = Grid::random(10, 10, 0.4, 7).unwrap();
        assert_eq!(a, b);

        assert_eq!(Grid::random(4, 4, 0.0, 1).unwrap().population(), 0);
        assert_eq!(Grid::random(4, 4, 1.0, 1).unwrap().population(), 16);
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_state(3, 2, &[true, false, false, false, false, true]).unwrap();
        assert_eq!(grid.to_string(), "#..\n..#\n");
    }
}
