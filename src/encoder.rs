//! This module writes transition tables back into machine code notation.

use crate::machine::TransitionTable;
use crate::types::{state_name, Transition, STATE_SEPARATOR, UNDEFINED_SPEC};

/// Encodes a transition table as machine code.
///
/// Format: one block per state, joined by `_`; each block holds one 3-character spec per symbol.
/// Entries equal to `Transition::UNDEFINED` are written as `---`, so an explicit `0RZ` comes back
/// as `---`; the two are the same transition.
///
/// # Arguments
///
/// * `table` - The table to encode.
///
/// # Returns
///
/// * `String` - The canonical machine code.
pub fn encode(table: &TransitionTable) -> String {
    let separator = STATE_SEPARATOR.to_string();

    table
        .rows()
        .map(|(_, row)| row.iter().map(encode_transition).collect::<String>())
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

/// Encodes a single transition as `<write><move><jump>`.
fn encode_transition(transition: &Transition) -> String {
    if transition.is_undefined() {
        return UNDEFINED_SPEC.to_string();
    }

    format!(
        "{}{}{}",
        transition.write,
        transition.shift.letter(),
        state_name(&transition.next)
    )
}
