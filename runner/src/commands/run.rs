use anyhow::{Context, Result};
use lifegrid::{CellRenderer, Grid, Simulation, SimulationConfig, TickLoop};
use std::io::BufRead;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::apply_grid_args;
use crate::cli::RunArgs;
use crate::state::AppState;
use crate::terminal::TerminalRenderer;

/// Upper bound on the sleep between polls
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub fn run(state: &AppState, args: RunArgs) -> Result<()> {
    let prefs = state.load_preferences()?;
    let mut config = apply_grid_args(SimulationConfig::default().with_preferences(&prefs), &args.grid);
    config.worker_threads = state.threads;
    config.validate().context("Invalid simulation settings")?;

    let mut sim = build_simulation(state, &config, &args)?;

    let frame = Arc::new(Mutex::new(TerminalRenderer::new(
        sim.grid().columns(),
        sim.grid().rows(),
    )));
    if !args.no_render {
        let sink = Arc::clone(&frame);
        sim.set_renderer(Box::new(move |index: usize, alive: bool| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .set_cell_visual(index, alive);
        }));
        print_frame(&frame, 0, sim.grid().population());
    }

    info!(
        columns = sim.grid().columns(),
        rows = sim.grid().rows(),
        speed = config.steps_per_second,
        mode = %sim.boundary(),
        "Simulation ready"
    );

    let poll_interval = (sim.step_interval() / 10).min(MAX_POLL_INTERVAL);
    let sim = Arc::new(Mutex::new(sim));

    let mut tick_loop = TickLoop::new();
    let render = !args.no_render;
    let printer = Arc::clone(&frame);
    tick_loop.start(Arc::clone(&sim), poll_interval, args.generations, move |report| {
        if render {
            print_frame(&printer, report.generation, report.population);
        }
    });
    if args.generations.is_none() {
        println!("Running until Enter is pressed");
    }
    pause_on_enter(&sim);
    tick_loop.wait();

    let sim = sim.lock().unwrap_or_else(PoisonError::into_inner);
    if !args.no_save {
        sim.save(&state.maps, &args.save)
            .with_context(|| format!("Failed to save map '{}'", args.save))?;
    }

    println!(
        "Finished at generation {} with population {}",
        sim.generation(),
        sim.grid().population()
    );
    Ok(())
}

fn build_simulation(state: &AppState, config: &SimulationConfig, args: &RunArgs) -> Result<Simulation> {
    if let Some(name) = &args.load {
        let mut sim = Simulation::new(config)?;
        sim.load(&state.maps, name)
            .with_context(|| format!("Failed to load map '{}'", name))?;
        return Ok(sim);
    }

    let grid = match args.seed {
        Some(seed) => Grid::random(config.columns, config.rows, args.density, seed)?,
        None => {
            warn!("Starting from an empty grid; pass --seed or --load for a pattern");
            Grid::new(config.columns, config.rows)?
        }
    };
    Ok(Simulation::with_grid(config, grid)?)
}

/// Pause the simulation once a line arrives on stdin. The tick loop exits on
/// the pause, so the run falls through to the final save.
fn pause_on_enter(sim: &Arc<Mutex<Simulation>>) {
    let sim = Arc::clone(sim);
    thread::spawn(move || pause_on_line(std::io::stdin().lock(), &sim));
}

fn pause_on_line<R: BufRead>(mut reader: R, sim: &Mutex<Simulation>) {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => debug!("Input closed; stop on Enter unavailable"),
        Ok(_) => {
            info!("Stop requested");
            sim.lock().unwrap_or_else(PoisonError::into_inner).pause();
        }
        Err(e) => warn!(error = %e, "Failed to read stop request"),
    }
}

fn print_frame(frame: &Mutex<TerminalRenderer>, generation: u64, population: usize) {
    let renderer = frame.lock().unwrap_or_else(PoisonError::into_inner);
    let header = format!("Generation {} (population {})", generation, population);
    if let Err(e) = renderer.print(&header) {
        warn!(error = %e, "Failed to print generation");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifegrid::{MapStore, MemoryStore};

    fn running_loop(sim: &Arc<Mutex<Simulation>>) -> TickLoop {
        let mut tick_loop = TickLoop::new();
        tick_loop.start(Arc::clone(sim), Duration::from_millis(2), None, |_| {});
        tick_loop
    }

    #[test]
    fn test_enter_ends_unbounded_run_and_save_follows() {
        let config = SimulationConfig {
            steps_per_second: 50,
            ..Default::default()
        };
        let grid = Grid::random(10, 10, 0.3, 8).unwrap();
        let sim = Arc::new(Mutex::new(Simulation::with_grid(&config, grid).unwrap()));
        let mut tick_loop = running_loop(&sim);

        thread::sleep(Duration::from_millis(30));
        pause_on_line(&b"\n"[..], &sim);
        tick_loop.wait();
        assert!(!tick_loop.is_running());

        let store = MemoryStore::new();
        let sim = sim.lock().unwrap();
        assert!(!sim.is_running());
        sim.save(&store, "Last").unwrap();
        assert_eq!(store.list().unwrap(), vec!["Last".to_string()]);
    }

    #[test]
    fn test_closed_input_keeps_running() {
        let sim = Arc::new(Mutex::new(Simulation::new(&SimulationConfig::default()).unwrap()));
        let mut tick_loop = running_loop(&sim);

        pause_on_line(&b""[..], &sim);
        assert!(sim.lock().unwrap().is_running());

        tick_loop.stop();
        assert!(!sim.lock().unwrap().is_running());
    }
}
