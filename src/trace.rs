//! Instrumentation for the execution engine. An `Observer` sees the run after every step; the
//! `Trace` observer keeps the snapshots a space-time diagram is drawn from.

use serde::{Deserialize, Serialize};

use crate::engine::{self, Run};
use crate::machine::Machine;
use crate::types::{Limits, RunResult, Symbol};

/// Receives the state of a run after each step.
pub trait Observer {
    fn observe(&mut self, run: &Run);
}

/// Observer that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl Observer for NoTrace {
    fn observe(&mut self, _run: &Run) {}
}

/// The tape as it stood after one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Materialized cells, leftmost first.
    pub tape: Vec<Symbol>,
    /// Head index into `tape`.
    pub head: usize,
    /// Number of distinct cells visited so far.
    pub visited: usize,
}

/// Collects up to `max_iter` post-step snapshots.
#[derive(Debug, Clone)]
pub struct Trace {
    max_iter: usize,
    snapshots: Vec<Snapshot>,
}

impl Trace {
    pub fn new(max_iter: usize) -> Self {
        Self {
            max_iter,
            snapshots: Vec::new(),
        }
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.snapshots
    }

    pub fn is_full(&self) -> bool {
        self.snapshots.len() >= self.max_iter
    }

    /// Serializes the snapshots for an external renderer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshots)
    }
}

impl Observer for Trace {
    fn observe(&mut self, run: &Run) {
        if self.is_full() {
            return;
        }

        let tape = run.tape();
        self.snapshots.push(Snapshot {
            tape: tape.cells(),
            head: tape.head(),
            visited: tape.visited(),
        });
    }
}

/// Runs `machine` and returns its result along with at most `max_iter` snapshots.
pub fn run_traced(
    machine: &Machine,
    limits: &Limits,
    max_iter: usize,
) -> (RunResult, Vec<Snapshot>) {
    let mut trace = Trace::new(max_iter);
    let result = engine::run_with(machine, limits, &mut trace);
    (result, trace.into_snapshots())
}
