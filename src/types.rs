//! This module defines the core data structures and types used throughout the decoder and the
//! execution engine, including transitions, resource limits, run results, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::Rule;

/// A tape symbol. Valid symbols of a machine lie in `0..m`.
pub type Symbol = u8;
/// Index of a state in the transition table. `0` is HALT, working states are `1..=n`.
pub type StateIndex = usize;

/// The reserved terminal state.
pub const HALT_STATE: StateIndex = 0;
/// Every run starts in the first declared state ('A').
pub const START_STATE: StateIndex = 1;
/// Jump letter that always means HALT, whatever the number of states.
pub const HALT_LETTER: char = 'Z';
/// Separates the per-state blocks of a machine code.
pub const STATE_SEPARATOR: char = '_';
/// Placeholder for an undefined transition.
pub const UNDEFINED_SPEC: &str = "---";
/// A write instruction is a single decimal digit.
pub const MAX_SYMBOLS: usize = 10;

/// Value held by every not-yet-visited cell unless the caller picks another one.
pub const DEFAULT_ALL_TAPE: Symbol = 0;
/// Symbol written by an undefined (`---`) transition.
pub const UNDEFINED_WRITE: Symbol = 0;

/// Default maximum number of distinct cells a run may materialize.
pub const DEFAULT_SPACE_LIMIT: usize = 10_000;
/// Default wall-clock budget of a run.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(1);

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

impl Direction {
    /// Numeric code used by the table dump: Right is 0, Left is 1.
    pub fn code(self) -> u8 {
        match self {
            Direction::Right => 0,
            Direction::Left => 1,
        }
    }

    /// The letter used in machine code.
    pub fn letter(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

/// A single transition rule: what to write, where to move, and which state comes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// Symbol written into the current cell.
    pub write: Symbol,
    /// Direction the head moves after writing.
    pub shift: Direction,
    /// Next state, `HALT_STATE` to stop.
    pub next: StateIndex,
}

impl Transition {
    /// The representation of `---`. It is indistinguishable from an explicit `0RZ`.
    pub const UNDEFINED: Transition = Transition {
        write: UNDEFINED_WRITE,
        shift: Direction::Right,
        next: HALT_STATE,
    };

    /// Returns `true` if taking this transition stops the machine.
    pub fn is_halt(&self) -> bool {
        self.next == HALT_STATE
    }

    /// Returns `true` if this transition is the undefined-transition convention.
    pub fn is_undefined(&self) -> bool {
        *self == Self::UNDEFINED
    }
}

/// Returns the letter naming a state in machine code (`1` is 'A', `0` is 'Z').
pub fn state_name(state: &StateIndex) -> char {
    match *state {
        HALT_STATE => HALT_LETTER,
        s if s <= 25 => (b'A' + (s - 1) as u8) as char,
        _ => '?',
    }
}

/// Resource ceilings applied to a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum number of distinct cells the tape may materialize.
    pub space: usize,
    /// Wall-clock budget. `None` disables the deadline.
    pub time: Option<Duration>,
    /// Step budget, a deterministic stand-in for the wall-clock deadline.
    pub steps: Option<u64>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            space: DEFAULT_SPACE_LIMIT,
            time: Some(DEFAULT_TIME_LIMIT),
            steps: None,
        }
    }
}

impl Limits {
    pub fn new(space: usize, time: Option<Duration>) -> Self {
        Self {
            space,
            time,
            steps: None,
        }
    }

    pub fn with_steps(mut self, steps: u64) -> Self {
        self.steps = Some(steps);
        self
    }
}

/// Which resource ceiling ended a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Limit {
    /// The tape needed more cells than allowed.
    Space,
    /// The wall-clock deadline passed.
    Time,
    /// The step budget was exhausted.
    Steps,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Limit::Space => "space",
            Limit::Time => "time",
            Limit::Steps => "steps",
        };
        f.write_str(name)
    }
}

/// Represents the terminal outcome of a run. Produced exactly once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunResult {
    /// The machine reached the HALT state.
    Halted {
        /// Sum of all symbol values on the tape.
        score: u64,
        /// Number of transitions taken.
        steps: u64,
    },
    /// A holdout: the run was stopped by a resource ceiling.
    ResourceLimitExceeded(Limit),
    /// An internal invariant was violated.
    Error(RunError),
}

impl RunResult {
    /// Short status name used in summaries: `HALT`, `HOLDOUT` or `ERROR`.
    pub fn status(&self) -> &'static str {
        match self {
            RunResult::Halted { .. } => "HALT",
            RunResult::ResourceLimitExceeded(_) => "HOLDOUT",
            RunResult::Error(_) => "ERROR",
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, RunResult::Halted { .. })
    }

    pub fn is_holdout(&self) -> bool {
        matches!(self, RunResult::ResourceLimitExceeded(_))
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunResult::Halted { score, steps } => {
                write!(f, "HALT score={score} steps={steps}")
            }
            RunResult::ResourceLimitExceeded(limit) => write!(f, "HOLDOUT ({limit})"),
            RunResult::Error(e) => write!(f, "ERROR {e}"),
        }
    }
}

/// Errors raised while decoding a machine code. No `Machine` exists when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The code does not follow the block/spec layout.
    #[error("Machine code syntax error: {0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    /// The alphabet size cannot be expressed in the notation.
    #[error("Alphabet size must be between 1 and {max}, got {0}", max = MAX_SYMBOLS)]
    AlphabetSize(usize),
    /// A state block does not hold one spec per symbol.
    #[error("State {} declares {found} transitions, expected {expected}", state_name(.state))]
    BlockWidth {
        state: StateIndex,
        found: usize,
        expected: usize,
    },
    #[error("Incorrect machine code format: wrong write instruction {found:?} in state {}", state_name(.state))]
    InvalidWrite { state: StateIndex, found: char },
    #[error("Incorrect machine code format: wrong moving instruction {found:?} in state {}", state_name(.state))]
    InvalidMove { state: StateIndex, found: char },
    #[error("Incorrect machine code format: wrong jump instruction {found:?} in state {}, not a capital letter", state_name(.state))]
    InvalidJump { state: StateIndex, found: char },
    /// A jump names a state beyond the declared blocks.
    #[error("States must be named in alphabetical order: jump to {letter:?} but only {states} states are declared")]
    StateOrder { letter: char, states: usize },
    /// The tape blank is not a symbol of the alphabet.
    #[error("Tape symbol {blank} is outside an alphabet of {symbols} symbols")]
    InvalidBlank { blank: Symbol, symbols: usize },
}

/// Invariant violations detected during a run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RunError {
    #[error("Symbol {symbol} read in state {} is outside an alphabet of {symbols} symbols", state_name(.state))]
    SymbolOutOfRange {
        state: StateIndex,
        symbol: Symbol,
        symbols: usize,
    },
    #[error("State {0} is not part of the transition table")]
    InvalidState(StateIndex),
}

/// Represents the errors surfaced by the crate's outer layers (loading, catalog lookup).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        let right_json = serde_json::to_string(&Direction::Right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, Direction::Left);
    }

    #[test]
    fn test_undefined_transition_is_halt_writing_zero_right() {
        let undefined = Transition::UNDEFINED;
        assert_eq!(undefined.write, 0);
        assert_eq!(undefined.shift, Direction::Right);
        assert!(undefined.is_halt());

        let explicit = Transition {
            write: 0,
            shift: Direction::Right,
            next: HALT_STATE,
        };
        assert!(explicit.is_undefined());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(state_name(&0), 'Z');
        assert_eq!(state_name(&1), 'A');
        assert_eq!(state_name(&5), 'E');
        assert_eq!(state_name(&25), 'Y');
    }

    #[test]
    fn test_run_result_summary() {
        let halted = RunResult::Halted { score: 4, steps: 6 };
        assert_eq!(halted.status(), "HALT");
        assert_eq!(halted.to_string(), "HALT score=4 steps=6");

        let holdout = RunResult::ResourceLimitExceeded(Limit::Space);
        assert_eq!(holdout.status(), "HOLDOUT");
        assert_eq!(holdout.to_string(), "HOLDOUT (space)");
        assert!(holdout.is_holdout());

        let error = RunResult::Error(RunError::InvalidState(7));
        assert_eq!(error.status(), "ERROR");
        assert!(!error.is_holdout());
    }

    #[test]
    fn test_error_display() {
        let error = DecodeError::InvalidMove {
            state: 2,
            found: 'X',
        };

        let msg = error.to_string();
        assert!(msg.contains("moving instruction"));
        assert!(msg.contains("state B"));
    }

    #[test]
    fn test_limits_serialization() {
        let limits = Limits::new(50, None).with_steps(1_000);
        let json = serde_json::to_string(&limits).unwrap();
        let back: Limits = serde_json::from_str(&json).unwrap();
        assert_eq!(back, limits);
    }
}
