//! This module defines the decoded, immutable side of a Turing machine: the dense
//! `TransitionTable` and the `Machine` that owns it together with the tape's initial symbol.

use std::fmt;

use crate::engine;
use crate::parser;
use crate::types::{DecodeError, Limits, RunResult, StateIndex, Symbol, Transition};

/// A dense `n x m` table of transitions, indexed by working state `1..=n` and read symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    symbols: usize,
    transitions: Vec<Transition>,
}

impl TransitionTable {
    /// Builds a table from transitions laid out state by state, in symbol order.
    /// A trailing partial row is filled with `Transition::UNDEFINED`.
    pub fn new(symbols: usize, mut transitions: Vec<Transition>) -> Self {
        let symbols = symbols.max(1);
        let partial = transitions.len() % symbols;
        if partial != 0 {
            transitions.resize(transitions.len() + symbols - partial, Transition::UNDEFINED);
        }

        Self {
            symbols,
            transitions,
        }
    }

    /// Number of working states `n`.
    pub fn states(&self) -> usize {
        self.transitions.len() / self.symbols
    }

    /// Alphabet size `m`.
    pub fn symbols(&self) -> usize {
        self.symbols
    }

    /// Total number of entries, always `n * m`.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Looks up the transition taken by `state` when reading `symbol`.
    ///
    /// Returns `None` for the HALT state, for states beyond `n`, and for symbols outside the alphabet.
    pub fn get(&self, state: StateIndex, symbol: Symbol) -> Option<&Transition> {
        let symbol = symbol as usize;
        if state == 0 || state > self.states() || symbol >= self.symbols {
            return None;
        }

        self.transitions.get((state - 1) * self.symbols + symbol)
    }

    /// Returns the transitions of one state, in symbol order.
    pub fn row(&self, state: StateIndex) -> Option<&[Transition]> {
        if state == 0 || state > self.states() {
            return None;
        }

        let start = (state - 1) * self.symbols;
        self.transitions.get(start..start + self.symbols)
    }

    /// Iterates over the rows, yielding each state index with its transitions.
    pub fn rows(&self) -> impl Iterator<Item = (StateIndex, &[Transition])> {
        self.transitions
            .chunks(self.symbols)
            .enumerate()
            .map(|(i, row)| (i + 1, row))
    }

    /// Iterates over every `(state, symbol, transition)` entry.
    pub fn iter(&self) -> impl Iterator<Item = (StateIndex, Symbol, &Transition)> {
        self.rows().flat_map(|(state, row)| {
            row.iter()
                .enumerate()
                .map(move |(symbol, t)| (state, symbol as Symbol, t))
        })
    }
}

/// A decoded machine. Immutable once built; any number of runs may read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    code: String,
    table: TransitionTable,
    all_tape: Symbol,
}

impl Machine {
    /// Decodes `code` over an alphabet of `symbols` symbols, with every cell initially `all_tape`.
    pub fn new(code: &str, symbols: usize, all_tape: Symbol) -> Result<Self, DecodeError> {
        parser::decode_with_blank(code, symbols, all_tape)
    }

    /// Wraps an already decoded table.
    ///
    /// # Returns
    ///
    /// * `Err(DecodeError::InvalidBlank)` if `all_tape` is not a symbol of the table's alphabet.
    pub fn from_table(
        code: &str,
        table: TransitionTable,
        all_tape: Symbol,
    ) -> Result<Self, DecodeError> {
        if all_tape as usize >= table.symbols() {
            return Err(DecodeError::InvalidBlank {
                blank: all_tape,
                symbols: table.symbols(),
            });
        }

        Ok(Self {
            code: code.to_string(),
            table,
            all_tape,
        })
    }

    /// Returns the same machine with a different initial tape symbol.
    pub fn with_all_tape(self, all_tape: Symbol) -> Result<Self, DecodeError> {
        Self::from_table(&self.code, self.table, all_tape)
    }

    /// The machine code this machine was decoded from.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn states(&self) -> usize {
        self.table.states()
    }

    pub fn symbols(&self) -> usize {
        self.table.symbols()
    }

    /// The value every not-yet-visited cell holds.
    pub fn all_tape(&self) -> Symbol {
        self.all_tape
    }

    /// Runs the machine from a fresh tape under `limits`.
    pub fn run(&self, limits: &Limits) -> RunResult {
        engine::run(self, limits)
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TM code: {}", self.code)?;
        writeln!(f, "Computer readable TM:")?;
        for (_, row) in self.table.rows() {
            let cells = row
                .iter()
                .map(|t| format!("[{}, {}, {}]", t.write, t.shift.code(), t.next))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "[{cells}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, HALT_STATE};

    #[test]
    fn test_table_lookup_bounds() {
        let machine = Machine::new("1RB1LB_1LA1RZ", 2, 0).unwrap();
        let table = machine.table();

        assert!(table.get(0, 0).is_none());
        assert!(table.get(3, 0).is_none());
        assert!(table.get(1, 2).is_none());
        assert_eq!(
            table.get(2, 1),
            Some(&Transition {
                write: 1,
                shift: Direction::Right,
                next: HALT_STATE
            })
        );
    }

    #[test]
    fn test_rows_follow_declaration_order() {
        let machine = Machine::new("1RB1LB_1LA1RZ", 2, 0).unwrap();
        let rows: Vec<_> = machine.table().rows().map(|(state, _)| state).collect();
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(machine.table().row(2).map(|row| row.len()), Some(2));
        assert!(machine.table().row(3).is_none());
    }

    #[test]
    fn test_partial_row_is_filled_with_undefined() {
        let table = TransitionTable::new(
            2,
            vec![Transition {
                write: 1,
                shift: Direction::Left,
                next: 1,
            }],
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, 1), Some(&Transition::UNDEFINED));
    }

    #[test]
    fn test_with_all_tape_validates_symbol() {
        let machine = Machine::new("1RB1LB_1LA1RZ", 2, 0).unwrap();
        let machine = machine.with_all_tape(1).unwrap();
        assert_eq!(machine.all_tape(), 1);

        assert!(matches!(
            machine.with_all_tape(5),
            Err(DecodeError::InvalidBlank { blank: 5, .. })
        ));
    }

    #[test]
    fn test_display_lists_numeric_table() {
        let machine = Machine::new("1RB---_1LB0RB", 2, 0).unwrap();
        let text = machine.to_string();

        assert!(text.starts_with("TM code: 1RB---_1LB0RB\n"));
        assert!(text.contains("[[1, 0, 2], [0, 0, 0]]"));
        assert!(text.contains("[[1, 1, 2], [0, 0, 2]]"));
    }
}
