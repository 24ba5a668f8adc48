//! Single-shot completion cell for one request/response cycle.
//!
//! # Design
//! A `CompletionHandle` is settled exactly once, by whichever of `resolve` or
//! `reject` runs first; later attempts are no-ops. The cell is guarded by a
//! mutex so the single-settlement invariant also holds when transport events
//! arrive from another thread. Clones share the cell, splitting the producer
//! (executor) from the consumer (caller).

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::FetchError;
use crate::http::ResponseResult;

/// Final outcome of a call: a normalized response or a rejection.
pub type Outcome = Result<ResponseResult, FetchError>;

#[derive(Debug, Default)]
struct Cell {
    settled: bool,
    outcome: Option<Outcome>,
}

/// Write-once future-like handle, resolved or rejected exactly once.
#[derive(Debug, Clone, Default)]
pub struct CompletionHandle {
    cell: Arc<Mutex<Cell>>,
}

impl CompletionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settle with a success value. Returns `false` if already settled.
    pub fn resolve(&self, value: ResponseResult) -> bool {
        self.settle(Ok(value))
    }

    /// Settle with an error. Returns `false` if already settled.
    pub fn reject(&self, error: FetchError) -> bool {
        self.settle(Err(error))
    }

    pub fn is_settled(&self) -> bool {
        self.lock().settled
    }

    /// Consume the outcome. Returns `None` if the handle is unsettled or the
    /// outcome was already taken; the settled flag stays set either way.
    pub fn take(&self) -> Option<Outcome> {
        self.lock().outcome.take()
    }

    fn settle(&self, outcome: Outcome) -> bool {
        let mut cell = self.lock();
        if cell.settled {
            return false;
        }
        cell.settled = true;
        cell.outcome = Some(outcome);
        true
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Cell> {
        // The cell is a flag and an option; a panicked writer cannot leave it
        // in a state worth refusing to read.
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
