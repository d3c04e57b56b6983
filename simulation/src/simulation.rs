//! Simulation - stepping driver and editing surface
//!
//! Owns the active grid. A step evaluates the whole grid against the
//! boundary mode, waits for every cell, then applies the flip-set in one go.
//! Manual edits are only accepted while idle.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::boundary::BoundaryMode;
use crate::config::SimulationConfig;
use crate::error::{LifeError, Result};
use crate::evaluator::{CancelToken, Evaluator};
use crate::grid::{GenerationDelta, Grid};
use crate::persistence;
use crate::render::{CellRenderer, NullRenderer};
use crate::storage::MapStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Outcome of one generation step
#[derive(Debug, Clone)]
pub struct StepReport {
    pub generation: u64,
    pub delta: GenerationDelta,
    pub population: usize,
}

pub struct Simulation {
    grid: Grid,
    evaluator: Evaluator,
    boundary: BoundaryMode,
    step_interval: Duration,
    accumulated: Duration,
    state: RunState,
    generation: u64,
    stroke_alive: bool,
    cancel: CancelToken,
    renderer: Box<dyn CellRenderer>,
}

impl Simulation {
    /// Build a simulation with an all-dead grid sized by `config`
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.columns, config.rows)?;
        Self::with_grid(config, grid)
    }

    /// Build a simulation around an existing grid; the grid's own
    /// dimensions win over `config.columns`/`config.rows`.
    pub fn with_grid(config: &SimulationConfig, grid: Grid) -> Result<Self> {
        if config.steps_per_second == 0 {
            return Err(LifeError::InvalidSpeed(0));
        }
        let evaluator = match config.worker_threads {
            Some(threads) => Evaluator::with_threads(threads)?,
            None => Evaluator::new(),
        };

        Ok(Self {
            grid,
            evaluator,
            boundary: config.boundary_mode,
            step_interval: config.step_interval(),
            accumulated: Duration::ZERO,
            state: RunState::Idle,
            generation: 0,
            stroke_alive: false,
            cancel: CancelToken::new(),
            renderer: Box::new(NullRenderer),
        })
    }

    /// Attach a renderer and paint the current grid into it
    pub fn set_renderer(&mut self, renderer: Box<dyn CellRenderer>) {
        self.renderer = renderer;
        self.repaint();
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    pub fn set_boundary(&mut self, mode: BoundaryMode) {
        self.boundary = mode;
    }

    pub fn step_interval(&self) -> Duration {
        self.step_interval
    }

    /// Handle for aborting an in-flight step from another thread
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    // ------------------------------------------------------------------------
    // Run state
    // ------------------------------------------------------------------------

    pub fn start(&mut self) {
        if self.is_running() {
            warn!("Simulation already running");
            return;
        }
        info!(generation = self.generation, "Simulation started");
        self.accumulated = Duration::ZERO;
        self.state = RunState::Running;
    }

    pub fn pause(&mut self) {
        if !self.is_running() {
            return;
        }
        info!(generation = self.generation, "Simulation paused");
        self.state = RunState::Idle;
    }

    /// Advance the tick clock by `elapsed`. Performs at most one step per
    /// call; the accumulator resets on every step rather than carrying the
    /// remainder.
    pub fn poll(&mut self, elapsed: Duration) -> Result<Option<StepReport>> {
        if !self.is_running() {
            return Ok(None);
        }

        self.accumulated += elapsed;
        if self.accumulated < self.step_interval {
            return Ok(None);
        }
        self.accumulated = Duration::ZERO;

        self.step().map(Some)
    }

    /// Compute and apply one generation. The cancel token only covers the
    /// pass it is raised during; a flag left over from before the step is
    /// cleared.
    pub fn step(&mut self) -> Result<StepReport> {
        let next = self.generation + 1;
        self.cancel.reset();

        let delta = match self.evaluator.evaluate(&self.grid, self.boundary, &self.cancel) {
            Ok(delta) => delta,
            Err(LifeError::StepAborted { .. }) => {
                warn!(generation = next, "Step aborted; grid left unchanged");
                self.state = RunState::Idle;
                return Err(LifeError::StepAborted { generation: next });
            }
            Err(e) => return Err(e),
        };

        self.grid.apply(&delta)?;
        self.generation = next;

        for index in delta.iter() {
            if let Some(cell) = self.grid.cell(index) {
                self.renderer.set_cell_visual(index, cell.alive);
            }
        }

        let population = self.grid.population();
        debug!(
            generation = next,
            flipped = delta.len(),
            population,
            "Generation applied"
        );

        Ok(StepReport {
            generation: next,
            delta,
            population,
        })
    }

    // ------------------------------------------------------------------------
    // Manual editing
    // ------------------------------------------------------------------------

    /// Toggle the cell under a fresh press; its new state becomes the paint
    /// value for following drags. `None` when running or off-grid.
    pub fn press(&mut self, x: i64, y: i64) -> Option<bool> {
        if self.is_running() {
            return None;
        }
        let index = self.grid.index_of(x, y)?;
        let alive = self.grid.toggle(index).ok()?;

        self.stroke_alive = alive;
        self.renderer.set_cell_visual(index, alive);
        Some(alive)
    }

    /// Paint the stroke value onto the cell under a held press. Returns
    /// whether the cell changed.
    pub fn drag(&mut self, x: i64, y: i64) -> bool {
        if self.is_running() {
            return false;
        }
        let Some(index) = self.grid.index_of(x, y) else {
            return false;
        };

        let changed = self.grid.set_alive(index, self.stroke_alive).unwrap_or(false);
        if changed {
            self.renderer.set_cell_visual(index, self.stroke_alive);
        }
        changed
    }

    // ------------------------------------------------------------------------
    // Grid replacement & persistence
    // ------------------------------------------------------------------------

    /// Swap in a new grid. Pauses, resets the generation counter and
    /// repaints every cell.
    pub fn replace_grid(&mut self, grid: Grid) {
        self.pause();
        self.grid = grid;
        self.generation = 0;
        self.accumulated = Duration::ZERO;
        self.repaint();
    }

    pub fn save(&self, store: &dyn MapStore, name: &str) -> Result<()> {
        let map = persistence::encode(&self.grid, name);
        let json = persistence::to_json(&map)?;
        store.write_all(name, json.as_bytes())?;

        info!(
            map = name,
            columns = map.columns,
            rows = map.rows,
            population = self.grid.population(),
            "Map saved"
        );
        Ok(())
    }

    /// Load a map into a fresh grid; the active grid is only replaced when
    /// decoding succeeds.
    pub fn load(&mut self, store: &dyn MapStore, name: &str) -> Result<()> {
        let bytes = store.read_all(name)?;
        let json = String::from_utf8(bytes)
            .map_err(|e| LifeError::CorruptMap(format!("map is not UTF-8: {}", e)))?;
        let grid = persistence::decode(&persistence::from_json(&json)?)?;

        info!(
            map = name,
            columns = grid.columns(),
            rows = grid.rows(),
            population = grid.population(),
            "Map loaded"
        );
        self.replace_grid(grid);
        Ok(())
    }

    fn repaint(&mut self) {
        for (index, cell) in self.grid.cells().iter().enumerate() {
            self.renderer.set_cell_visual(index, cell.alive);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Instant;

    fn config(steps_per_second: u32) -> SimulationConfig {
        SimulationConfig {
            columns: 5,
            rows: 5,
            steps_per_second,
            ..Default::default()
        }
    }

    #[test]
    fn test_poll_ignored_while_idle() {
        let mut sim = Simulation::new(&config(2)).unwrap();
        assert!(sim.poll(Duration::from_secs(10)).unwrap().is_none());
        assert_eq!(sim.generation(), 0);
    }

    #[test]
    fn test_poll_steps_exactly_on_threshold() {
        let mut sim = Simulation::new(&config(4)).unwrap();
        sim.start();

        let mut steps = 0;
        for _ in 0..4 {
            // 4 x 125ms = 2 intervals of 250ms
            if sim.poll(Duration::from_millis(125)).unwrap().is_some() {
                steps += 1;
            }
        }
        assert_eq!(steps, 2);
        assert_eq!(sim.generation(), 2);
    }

    #[test]
    fn test_long_poll_is_not_batched() {
        let mut sim = Simulation::new(&config(2)).unwrap();
        sim.start();

        assert!(sim.poll(Duration::from_secs(5)).unwrap().is_some());
        assert_eq!(sim.generation(), 1);

        // the remainder is discarded, not carried over
        assert!(sim.poll(Duration::from_millis(499)).unwrap().is_none());
        assert!(sim.poll(Duration::from_millis(1)).unwrap().is_some());
    }

    #[test]
    fn test_edits_blocked_while_running() {
        let mut sim = Simulation::new(&config(2)).unwrap();
        assert_eq!(sim.press(1, 1), Some(true));

        sim.start();
        let before = sim.grid().clone();
        assert_eq!(sim.press(2, 2), None);
        assert!(!sim.drag(3, 3));
        assert_eq!(sim.grid(), &before);

        sim.pause();
        assert_eq!(sim.press(2, 2), Some(true));
    }

    #[test]
    fn test_press_and_drag_paint_stroke_value() {
        let mut sim = Simulation::new(&config(2)).unwrap();

        assert_eq!(sim.press(0, 0), Some(true));
        assert!(sim.drag(1, 0));
        assert!(!sim.drag(1, 0));

        // pressing a live cell starts an erasing stroke
        assert_eq!(sim.press(0, 0), Some(false));
        assert!(sim.drag(1, 0));
        assert_eq!(sim.grid().population(), 0);

        assert_eq!(sim.press(9, 0), None);
        assert!(!sim.drag(-1, 0));
    }

    #[test]
    fn test_renderer_receives_flips() {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&updates);

        let mut sim = Simulation::new(&config(2)).unwrap();
        sim.press(2, 2);
        sim.set_renderer(Box::new(move |index: usize, alive: bool| {
            sink.lock().unwrap().push((index, alive));
        }));
        assert_eq!(updates.lock().unwrap().len(), 25);

        updates.lock().unwrap().clear();
        sim.step().unwrap();
        assert_eq!(*updates.lock().unwrap(), vec![(12, false)]);
    }

    #[test]
    fn test_cancel_while_idle_does_not_abort_next_step() {
        let mut sim = Simulation::new(&config(2)).unwrap();
        sim.press(2, 2);

        sim.cancel_token().cancel();
        assert_eq!(sim.step().unwrap().generation, 1);

        sim.cancel_token().cancel();
        sim.start();
        assert!(sim.poll(Duration::from_secs(1)).unwrap().is_some());
        assert!(sim.is_running());
    }

    #[test]
    fn test_cancelled_step_leaves_grid() {
        let config = SimulationConfig {
            columns: 50,
            rows: 50,
            ..Default::default()
        };
        let grid = Grid::random(50, 50, 0.4, 17).unwrap();
        let mut sim = Simulation::with_grid(&config, grid).unwrap();
        sim.start();

        let token = sim.cancel_token();
        let done = Arc::new(AtomicBool::new(false));
        let raiser = {
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    token.cancel();
                    thread::yield_now();
                }
            })
        };

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut aborted = false;
        while Instant::now() < deadline {
            let before = sim.grid().clone();
            let generation = sim.generation();
            match sim.step() {
                Err(LifeError::StepAborted { generation: failed }) => {
                    assert_eq!(failed, generation + 1);
                    assert_eq!(sim.grid(), &before);
                    assert_eq!(sim.generation(), generation);
                    assert_eq!(sim.state(), RunState::Idle);
                    aborted = true;
                    break;
                }
                Ok(_) => {}
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        done.store(true, Ordering::Release);
        raiser.join().unwrap();
        assert!(aborted, "no step observed the raised token");

        // nothing is left raised for the next step
        assert!(sim.step().is_ok());
    }

    #[test]
    fn test_failed_load_keeps_active_grid() {
        let store = MemoryStore::new();
        store.write_all("Broken", b"{ \"name\": 1 }").unwrap();

        let mut sim = Simulation::new(&config(2)).unwrap();
        sim.press(1, 1);
        let before = sim.grid().clone();

        assert!(sim.load(&store, "Broken").is_err());
        assert!(matches!(sim.load(&store, "Missing"), Err(LifeError::MapNotFound(_))));
        assert_eq!(sim.grid(), &before);
    }

    #[test]
    fn test_save_then_load_swaps_grid() {
        let store = MemoryStore::new();
        let mut saved = Simulation::new(&config(2)).unwrap();
        saved.press(0, 4);
        saved.press(3, 1);
        saved.save(&store, "Last").unwrap();

        let mut sim = Simulation::new(&SimulationConfig::default()).unwrap();
        sim.start();
        sim.load(&store, "Last").unwrap();

        assert_eq!(sim.grid(), saved.grid());
        assert_eq!(sim.grid().columns(), 5);
        assert!(!sim.is_running());
        assert_eq!(sim.generation(), 0);
    }
}
