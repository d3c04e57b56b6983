//! Evaluator - computes the flip-set for one generation
//!
//! Every cell is decided by an independent task reading the same borrowed
//! grid snapshot. Tasks run on a rayon pool; each worker accumulates its own
//! changed indices and the partial lists are merged at the join. The grid is
//! only borrowed immutably here, so nothing can mutate it mid-pass.

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{trace, warn};

use crate::boundary::BoundaryMode;
use crate::error::{LifeError, Result};
use crate::grid::{GenerationDelta, Grid};
use crate::rules::cell_transition;

/// Shared flag used to abort an in-flight generation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}

pub struct Evaluator {
    pool: Option<rayon::ThreadPool>,
}

impl Evaluator {
    /// Evaluate on rayon's global pool
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Evaluate on a dedicated pool of `threads` workers
    pub fn with_threads(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("lifegrid-worker-{}", i))
            .build()
            .map_err(|e| LifeError::WorkerPool(e.to_string()))?;
        Ok(Self { pool: Some(pool) })
    }

    pub fn worker_count(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Run one full pass. Returns `StepAborted` (generation 0; the caller
    /// fills in its own counter) if `cancel` is raised before the join.
    pub fn evaluate(
        &self,
        grid: &Grid,
        mode: BoundaryMode,
        cancel: &CancelToken,
    ) -> Result<GenerationDelta> {
        self.evaluate_in_order(grid, mode, cancel, 0..grid.len())
    }

    /// Run one pass over an explicit index source. `order` should cover each
    /// index of `grid` once; indices past the end are skipped.
    pub fn evaluate_in_order<I>(
        &self,
        grid: &Grid,
        mode: BoundaryMode,
        cancel: &CancelToken,
        order: I,
    ) -> Result<GenerationDelta>
    where
        I: IntoParallelIterator<Item = usize> + Send,
    {
        let fan_out = move || {
            order
                .into_par_iter()
                .fold(Vec::new, |mut changed, index| {
                    if !cancel.is_cancelled() {
                        if let Some(index) = cell_transition(grid, mode, index) {
                            changed.push(index);
                        }
                    }
                    changed
                })
                .reduce(Vec::new, |mut left, mut right| {
                    left.append(&mut right);
                    left
                })
        };

        let changed = match &self.pool {
            Some(pool) => pool.install(fan_out),
            None => fan_out(),
        };

        if cancel.is_cancelled() {
            warn!(cells = grid.len(), "Generation pass cancelled at barrier");
            return Err(LifeError::StepAborted { generation: 0 });
        }

        trace!(cells = grid.len(), changed = changed.len(), "Generation pass joined");
        Ok(changed.into_iter().collect())
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
