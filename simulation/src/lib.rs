//! LifeGrid Simulation Engine
//!
//! Conway's Game of Life on a fixed-size grid with clamped or toroidal
//! edges. Each generation is evaluated concurrently per cell against an
//! immutable snapshot and applied as a single flip-set.

pub mod boundary;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod grid;
pub mod persistence;
pub mod render;
pub mod rules;
pub mod simulation;
pub mod storage;
pub mod tick_loop;

pub use boundary::BoundaryMode;
pub use config::{Preferences, SimulationConfig, MAX_DIMENSION};
pub use error::{LifeError, Result};
pub use evaluator::{CancelToken, Evaluator};
pub use grid::{Cell, GenerationDelta, Grid};
pub use persistence::SerializedMap;
pub use render::{CellRenderer, NullRenderer};
pub use simulation::{RunState, Simulation, StepReport};
pub use storage::{DirectoryStore, MapStore, MemoryStore};
pub use tick_loop::TickLoop;
