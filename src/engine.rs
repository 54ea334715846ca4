//! This module defines the execution engine: a `Run` owns the tape, state and step counter of a
//! single execution of a `Machine`, and `run` drives it until the machine halts or a resource
//! ceiling is reached.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::machine::Machine;
use crate::tape::Tape;
use crate::trace::{NoTrace, Observer};
use crate::types::{
    Limit, Limits, RunError, RunResult, StateIndex, Symbol, HALT_STATE, START_STATE,
};

/// Represents the outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine took a transition.
    Continue,
    /// The machine is in the HALT state; nothing was done.
    Halted,
}

/// The transient state of one execution. Created fresh for every run and never shared.
#[derive(Debug, Clone)]
pub struct Run<'m> {
    machine: &'m Machine,
    state: StateIndex,
    tape: Tape,
    steps: u64,
}

impl<'m> Run<'m> {
    /// Starts in the first declared state on a single `all_tape` cell.
    pub fn new(machine: &'m Machine) -> Self {
        Self {
            machine,
            state: START_STATE,
            tape: Tape::new(machine.all_tape()),
            steps: 0,
        }
    }

    /// Executes a single transition: write, move, then switch state.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if a transition was taken.
    /// * `Ok(Step::Halted)` if the machine had already halted.
    /// * `Err(RunError)` if the current state or the symbol under the head has no table entry.
    pub fn step(&mut self) -> Result<Step, RunError> {
        if self.is_halted() {
            return Ok(Step::Halted);
        }

        let symbol = self.tape.read();
        let transition = *self
            .machine
            .table()
            .get(self.state, symbol)
            .ok_or_else(|| self.lookup_error(symbol))?;

        self.tape.write(transition.write);
        self.tape.shift(transition.shift);
        self.steps += 1;
        self.state = transition.next;

        Ok(Step::Continue)
    }

    fn lookup_error(&self, symbol: Symbol) -> RunError {
        if self.state > self.machine.states() {
            RunError::InvalidState(self.state)
        } else {
            RunError::SymbolOutOfRange {
                state: self.state,
                symbol,
                symbols: self.machine.symbols(),
            }
        }
    }

    pub fn machine(&self) -> &Machine {
        self.machine
    }

    /// Current state, `HALT_STATE` once halted.
    pub fn state(&self) -> StateIndex {
        self.state
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Number of transitions taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.state == HALT_STATE
    }
}

/// A cooperative wall-clock deadline, polled once per step.
#[derive(Debug, Clone, Copy)]
struct Deadline(Option<Instant>);

impl Deadline {
    /// A budget too large to represent behaves as no deadline.
    fn after(budget: Option<Duration>) -> Self {
        Self(budget.and_then(|d| Instant::now().checked_add(d)))
    }

    fn expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}

/// Runs `machine` from a fresh tape until it halts or a limit in `limits` trips.
///
/// Repeated runs with the same machine and limits give identical results unless the wall-clock
/// deadline interferes.
pub fn run(machine: &Machine, limits: &Limits) -> RunResult {
    run_with(machine, limits, &mut NoTrace)
}

/// Runs `machine` like [`run`], handing the state after every step to `observer`.
pub fn run_with<O: Observer + ?Sized>(
    machine: &Machine,
    limits: &Limits,
    observer: &mut O,
) -> RunResult {
    let mut run = Run::new(machine);
    let result = execute(&mut run, limits, observer);

    debug!(
        code = machine.code(),
        steps = run.steps(),
        visited = run.tape().visited(),
        "{result}"
    );

    result
}

/// The run loop. Each iteration checks, in order: space, halt, deadline, step budget.
///
/// The tape may reach exactly `limits.space` cells; the cell that exceeds it is caught by the
/// next iteration's guard before anything else happens.
fn execute<O: Observer + ?Sized>(run: &mut Run, limits: &Limits, observer: &mut O) -> RunResult {
    let deadline = Deadline::after(limits.time);

    while run.tape().visited() <= limits.space {
        if run.is_halted() {
            return RunResult::Halted {
                score: run.tape().score(),
                steps: run.steps(),
            };
        }

        if deadline.expired() {
            return RunResult::ResourceLimitExceeded(Limit::Time);
        }

        if limits.steps.is_some_and(|max| run.steps() >= max) {
            return RunResult::ResourceLimitExceeded(Limit::Steps);
        }

        if let Err(e) = run.step() {
            return RunResult::Error(e);
        }

        observer.observe(run);
    }

    RunResult::ResourceLimitExceeded(Limit::Space)
}
