//! The machine's tape: an owned sequence of symbols that grows by one default-valued cell
//! whenever the head walks off either end.

use std::collections::VecDeque;

use crate::types::{Direction, Symbol};

/// A bidirectionally growable tape with a single head.
///
/// Invariants: the tape is never empty, `head < len`, and every materialized cell counts as
/// visited, so `visited() == len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<Symbol>,
    head: usize,
    blank: Symbol,
}

impl Tape {
    /// Creates a tape holding a single `blank` cell under the head.
    pub fn new(blank: Symbol) -> Self {
        Self {
            cells: VecDeque::from([blank]),
            head: 0,
            blank,
        }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> Symbol {
        self.cells[self.head]
    }

    /// Overwrites the symbol under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell, materializing a blank cell if it walks off the tape.
    ///
    /// Walking off the left end prepends the new cell; the head index stays `0`.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.head == 0 {
                    self.cells.push_front(self.blank);
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head >= self.cells.len() {
                    self.cells.push_back(self.blank);
                }
            }
        }
    }

    /// Index of the head in the materialized cells.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Number of distinct cells ever materialized.
    pub fn visited(&self) -> usize {
        self.cells.len()
    }

    pub fn blank(&self) -> Symbol {
        self.blank
    }

    /// Sum of all symbol values on the tape.
    pub fn score(&self) -> u64 {
        self.cells.iter().map(|&s| s as u64).sum()
    }

    /// Copies the materialized cells, leftmost first.
    pub fn cells(&self) -> Vec<Symbol> {
        self.cells.iter().copied().collect()
    }
}
