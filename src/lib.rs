//! This crate decodes Busy Beaver style machine codes (`1RB1LB_1LA1RZ`) into transition tables and
//! runs the resulting single-tape Turing machines under space and time ceilings, reporting
//! whether they halt (with score and step count) or hold out.

pub mod analyzer;
pub mod encoder;
pub mod engine;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod tape;
pub mod trace;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the static analysis entry points.
pub use analyzer::{analyze, check_state_order, Analysis};
/// Re-exports the machine code encoder.
pub use encoder::encode;
/// Re-exports the execution engine.
pub use engine::{run, run_with, Run, Step};
/// Re-exports the batch loader.
pub use loader::{MachineEntry, ProgramLoader};
/// Re-exports the decoded machine and its transition table.
pub use machine::{Machine, TransitionTable};
/// Re-exports the decoder.
pub use parser::{decode, decode_with_blank};
/// Re-exports the catalog of known machines.
pub use programs::{KnownMachines, KNOWN_MACHINES};
/// Re-exports the tape.
pub use tape::Tape;
/// Re-exports the instrumentation types.
pub use trace::{run_traced, NoTrace, Observer, Snapshot, Trace};
/// Re-exports the shared data model and error types.
pub use types::{
    DecodeError, Direction, Limit, Limits, RunError, RunResult, StateIndex, Symbol, Transition,
    TuringMachineError,
};
