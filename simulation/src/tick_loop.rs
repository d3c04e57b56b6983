//! Tick Loop - Background thread that polls the simulation at regular intervals

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, atomic::{AtomicBool, Ordering}};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::error::LifeError;
use crate::evaluator::CancelToken;
use crate::simulation::{Simulation, StepReport};

fn lock(sim: &Mutex<Simulation>) -> MutexGuard<'_, Simulation> {
    sim.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives `Simulation::poll` from a background thread
pub struct TickLoop {
    is_running: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
    cancel: Option<CancelToken>,
    sim: Option<Arc<Mutex<Simulation>>>,
}

impl TickLoop {
    pub fn new() -> Self {
        Self {
            is_running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            cancel: None,
            sim: None,
        }
    }

    /// Start the simulation and poll it every `poll_interval`
    ///
    /// # Arguments
    /// * `sim` - Shared simulation; locked only for the duration of each poll
    /// * `poll_interval` - Sleep between polls; should be well under the step interval
    /// * `max_steps` - Stop after this many steps (`None` runs until stopped)
    /// * `callback` - Receives every step report
    pub fn start<F>(
        &mut self,
        sim: Arc<Mutex<Simulation>>,
        poll_interval: Duration,
        max_steps: Option<u64>,
        mut callback: F,
    ) where
        F: FnMut(StepReport) + Send + 'static,
    {
        if self.is_running.load(Ordering::Acquire) {
            warn!("Tick loop already running");
            return;
        }
        // Reap a thread that ended on its own
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }

        {
            let mut s = lock(&sim);
            self.cancel = Some(s.cancel_token());
            s.start();
        }
        self.sim = Some(Arc::clone(&sim));

        info!(?poll_interval, ?max_steps, "Starting tick loop");
        self.is_running.store(true, Ordering::Release);
        let running = Arc::clone(&self.is_running);

        let handle = thread::spawn(move || {
            let mut last = Instant::now();
            let mut steps = 0u64;

            while running.load(Ordering::Acquire) {
                thread::sleep(poll_interval);
                let now = Instant::now();
                let elapsed = now - last;
                last = now;

                let (outcome, sim_running) = {
                    let mut s = lock(&sim);
                    let outcome = s.poll(elapsed);
                    (outcome, s.is_running())
                };
                match outcome {
                    Ok(Some(report)) => {
                        steps += 1;
                        callback(report);
                        if max_steps.is_some_and(|max| steps >= max) {
                            lock(&sim).pause();
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(LifeError::StepAborted { generation }) => {
                        info!(generation, "Tick loop step aborted");
                        break;
                    }
                    Err(e) => {
                        error!(error = %e, "Tick loop step failed");
                        lock(&sim).pause();
                        break;
                    }
                }

                // Paused elsewhere (pause, load)
                if !sim_running {
                    info!(steps, "Simulation paused; tick loop exiting");
                    break;
                }
            }

            running.store(false, Ordering::Release);
            info!(steps, "Tick loop thread stopped");
        });

        self.thread_handle = Some(handle);
    }

    /// Block until the loop ends on its own (step limit, failure, or the
    /// simulation being paused)
    pub fn wait(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join(); // Thread panic result intentionally ignored
        }
    }

    /// Stop the loop, aborting any in-flight step
    pub fn stop(&mut self) {
        if self.thread_handle.is_none() {
            return;
        }

        info!("Stopping tick loop...");
        self.is_running.store(false, Ordering::Release);
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }

        self.wait();

        self.cancel = None;
        if let Some(sim) = self.sim.take() {
            lock(&sim).pause();
        }
    }

    /// Check if the loop is currently running
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Acquire)
    }
}

impl Default for TickLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TickLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
