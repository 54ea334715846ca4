//! This module provides static checks on machine codes and decoded machines: the state-naming
//! rule enforced while decoding, and an informational analysis of the transition table.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::machine::Machine;
use crate::types::{
    state_name, DecodeError, Direction, StateIndex, HALT_LETTER, HALT_STATE, START_STATE,
};

/// Checks that no jump names a state beyond the `states` declared blocks.
///
/// States must be introduced in alphabetical order without gaps, so the highest jump letter
/// (ignoring `HALT_LETTER`) may be at most the `states`-th letter. Characters that are not capital
/// letters are ignored here; the decoder reports them per transition.
///
/// # Arguments
///
/// * `jumps` - Every jump character of the code.
/// * `states` - The number of state blocks.
///
/// # Returns
///
/// * `Ok(())` if the naming is consistent.
/// * `Err(DecodeError::StateOrder)` naming the offending letter otherwise.
pub fn check_state_order<I>(jumps: I, states: usize) -> Result<(), DecodeError>
where
    I: IntoIterator<Item = char>,
{
    let last = jumps
        .into_iter()
        .filter(|c| c.is_ascii_uppercase() && *c != HALT_LETTER)
        .max();

    match last {
        Some(letter) if (letter as u8 - b'A') as usize + 1 > states => {
            Err(DecodeError::StateOrder { letter, states })
        }
        _ => Ok(()),
    }
}

/// Facts about a decoded machine that can be read off its table without running it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Entries that jump to HALT, explicit or undefined.
    pub halt_transitions: usize,
    /// Entries written as `---` (or the identical `0RZ`).
    pub undefined_transitions: usize,
    /// States that no path from the start state reaches, by letter.
    pub unreachable_states: Vec<char>,
    /// Set when every transition moves the head the same way.
    pub single_direction: Option<Direction>,
}

impl Analysis {
    /// A machine without any halting transition can only end as a holdout.
    pub fn can_halt(&self) -> bool {
        self.halt_transitions > 0
    }
}

/// Analyzes the transition table of `machine`.
pub fn analyze(machine: &Machine) -> Analysis {
    let table = machine.table();

    let halt_transitions = table.iter().filter(|(_, _, t)| t.is_halt()).count();
    let undefined_transitions = table.iter().filter(|(_, _, t)| t.is_undefined()).count();

    let mut shifts = table.iter().map(|(_, _, t)| t.shift);
    let single_direction = match shifts.next() {
        Some(first) if shifts.all(|d| d == first) => Some(first),
        _ => None,
    };

    Analysis {
        halt_transitions,
        undefined_transitions,
        unreachable_states: unreachable_states(machine),
        single_direction,
    }
}

/// Finds states that cannot be reached from the start state by a depth-first traversal.
fn unreachable_states(machine: &Machine) -> Vec<char> {
    let table = machine.table();
    let mut visited = BTreeSet::new();
    let mut queue: Vec<StateIndex> = vec![START_STATE];

    while let Some(state) = queue.pop() {
        if state == HALT_STATE || !visited.insert(state) {
            continue;
        }

        if let Some(row) = table.row(state) {
            queue.extend(row.iter().map(|t| t.next).filter(|s| !visited.contains(s)));
        }
    }

    (1..=table.states())
        .filter(|s| !visited.contains(s))
        .map(|s| state_name(&s))
        .collect()
}
