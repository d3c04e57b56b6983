//! Conway transition rule (B3/S23)

use crate::boundary::BoundaryMode;
use crate::grid::Grid;

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Next state of a cell given its current state and live neighbor count
pub fn next_alive(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Count live cells among the 8 neighbors of `(x, y)`
pub fn live_neighbors(grid: &Grid, mode: BoundaryMode, x: usize, y: usize) -> u8 {
    let (columns, rows) = (grid.columns(), grid.rows());

    NEIGHBOR_OFFSETS
        .iter()
        .filter(|(dx, dy)| {
            mode.resolve(x as i64 + dx, y as i64 + dy, columns, rows, |nx, ny| {
                grid.is_alive(nx, ny)
            })
        })
        .count() as u8
}

/// Decide one cell: `Some(index)` when it flips this generation.
pub fn cell_transition(grid: &Grid, mode: BoundaryMode, index: usize) -> Option<usize> {
    let cell = grid.cell(index)?;
    let neighbors = live_neighbors(grid, mode, cell.x, cell.y);

    if next_alive(cell.alive, neighbors) != cell.alive {
        Some(index)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birth_and_survival() {
        assert!(next_alive(false, 3));
        assert!(!next_alive(false, 2));
        assert!(!next_alive(false, 4));
        assert!(next_alive(true, 2));
        assert!(next_alive(true, 3));
    }

    #[test]
    fn test_under_and_over_population() {
        assert!(!next_alive(true, 0));
        assert!(!next_alive(true, 1));
        assert!(!next_alive(true, 4));
        assert!(!next_alive(true, 8));
    }

    #[test]
    fn test_lone_cell_dies() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set_alive(4, true).unwrap();

        assert_eq!(live_neighbors(&grid, BoundaryMode::Clamped, 1, 1), 0);
        assert_eq!(cell_transition(&grid, BoundaryMode::Clamped, 4), Some(4));

        for index in (0..9).filter(|&i| i != 4) {
            assert_eq!(cell_transition(&grid, BoundaryMode::Clamped, index), None);
        }
    }

    #[test]
    fn test_corner_neighbors_depend_on_mode() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set_alive(0, true).unwrap();
        grid.set_alive(24, true).unwrap();

        assert_eq!(live_neighbors(&grid, BoundaryMode::Toroidal, 0, 0), 1);
        assert_eq!(live_neighbors(&grid, BoundaryMode::Toroidal, 4, 4), 1);
        assert_eq!(live_neighbors(&grid, BoundaryMode::Clamped, 0, 0), 0);
        assert_eq!(live_neighbors(&grid, BoundaryMode::Clamped, 4, 4), 0);
    }

    #[test]
    fn test_out_of_range_index_has_no_transition() {
        let grid = Grid::new(2, 2).unwrap();
        assert_eq!(cell_transition(&grid, BoundaryMode::Clamped, 4), None);
    }
}
