//! LifeGrid Simulation Benchmark
//!
//! Standalone benchmark for the generation evaluator.

use lifegrid::{BoundaryMode, Grid, Simulation, SimulationConfig, MAX_DIMENSION};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const GENERATIONS: u64 = 1_000;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("LifeGrid benchmark starting...");

    for mode in [BoundaryMode::Clamped, BoundaryMode::Toroidal] {
        let config = SimulationConfig {
            columns: MAX_DIMENSION,
            rows: MAX_DIMENSION,
            boundary_mode: mode,
            ..Default::default()
        };
        let grid = Grid::random(config.columns, config.rows, 0.3, 42)?;
        let mut sim = Simulation::with_grid(&config, grid)?;

        info!(
            %mode,
            cells = sim.grid().len(),
            population = sim.grid().population(),
            "Running {} generations",
            GENERATIONS
        );

        let start = std::time::Instant::now();
        for _ in 0..GENERATIONS {
            sim.step()?;
        }
        let elapsed = start.elapsed();

        info!(
            "Benchmark complete: {:?} total, {:?} per generation, {} final population",
            elapsed,
            elapsed / GENERATIONS as u32,
            sim.grid().population()
        );
    }

    Ok(())
}
